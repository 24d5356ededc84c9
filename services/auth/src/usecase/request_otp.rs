use chrono::{DateTime, Utc};

use crate::domain::clock::Clock;
use crate::domain::repository::{OtpMailer, OtpRepository, SignupRepository};
use crate::domain::types::{OtpPolicy, PendingSignup, Role};
use crate::error::AuthServiceError;
use crate::usecase::hashing::hash_secret;
use crate::usecase::otp::issue_and_send;

const MIN_PASSWORD_LEN: usize = 8;

/// Loose shape check, same bar as the signup form: something before the `@`,
/// a dot somewhere after it. Deliverability is proven by the OTP itself.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub struct RequestOtpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Success shape shared with the resend flow.
#[derive(Debug, Clone)]
pub struct OtpIssuedOutput {
    pub expires_at: DateTime<Utc>,
    pub resend_cooldown_seconds: i64,
}

pub struct RequestOtpUseCase<S, O, M, C>
where
    S: SignupRepository,
    O: OtpRepository,
    M: OtpMailer,
    C: Clock,
{
    pub signups: S,
    pub otps: O,
    pub mailer: M,
    pub clock: C,
    pub policy: OtpPolicy,
}

impl<S, O, M, C> RequestOtpUseCase<S, O, M, C>
where
    S: SignupRepository,
    O: OtpRepository,
    M: OtpMailer,
    C: Clock,
{
    pub async fn execute(
        &self,
        input: RequestOtpInput,
    ) -> Result<OtpIssuedOutput, AuthServiceError> {
        // 1. Validate before any state mutation.
        let role = Role::parse_signup(&input.role).ok_or(AuthServiceError::InvalidRole)?;
        if !is_valid_email(&input.email) {
            return Err(AuthServiceError::InvalidEmail);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::WeakPassword);
        }

        // 2. A durable account wins over any signup attempt.
        if self
            .signups
            .find_user_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AuthServiceError::AlreadyRegistered);
        }

        // 3. Upsert the pending signup — a repeated request overwrites.
        let now = self.clock.now();
        let pending = PendingSignup {
            email: input.email.clone(),
            name: input.name,
            password_hash: hash_secret(&input.password)?,
            role,
            created_at: now,
            updated_at: now,
        };
        self.signups.upsert_pending(&pending).await?;

        // 4. Issue the code and deliver it.
        let issued = issue_and_send(
            &self.otps,
            &self.mailer,
            &self.clock,
            &self.policy,
            &input.email,
        )
        .await?;

        Ok(OtpIssuedOutput {
            expires_at: issued.expires_at,
            resend_cooldown_seconds: self.policy.resend_cooldown_seconds,
        })
    }
}
