use sea_orm::DatabaseConnection;

use crate::domain::clock::SystemClock;
use crate::domain::types::OtpPolicy;
use crate::infra::db::{DbOtpRepository, DbSignupRepository};
use crate::infra::mail::SmtpOtpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: SmtpOtpMailer,
    pub policy: OtpPolicy,
}

impl AppState {
    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn signup_repo(&self) -> DbSignupRepository {
        DbSignupRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> SmtpOtpMailer {
        self.mailer.clone()
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
