#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{OtpRecord, PendingSignup, User};
use crate::error::AuthServiceError;

/// Repository for one-time codes. Owns every OtpRecord mutation except the
/// in-transaction consume performed by [`SignupRepository::promote`].
pub trait OtpRepository: Send + Sync {
    /// Most recently created non-consumed record for the email, if any.
    /// Expiry and attempt-budget checks are the caller's business — they
    /// need the policy and the clock.
    async fn latest_active(&self, email: &str) -> Result<Option<OtpRecord>, AuthServiceError>;

    /// Mark every non-consumed record for the email consumed. Creates nothing.
    async fn invalidate_all(&self, email: &str) -> Result<(), AuthServiceError>;

    /// Insert a freshly issued record (attempts 0, not consumed).
    async fn create(&self, record: &OtpRecord) -> Result<(), AuthServiceError>;

    /// Bump the wrong-guess counter by one.
    async fn increment_attempts(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Terminate a single record.
    async fn mark_consumed(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for users and pending signups, including the promotion
/// transaction that turns the latter into the former.
pub trait SignupRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Insert or overwrite the pending signup for its email.
    async fn upsert_pending(&self, pending: &PendingSignup) -> Result<(), AuthServiceError>;

    async fn find_pending(&self, email: &str) -> Result<Option<PendingSignup>, AuthServiceError>;

    /// Atomically create the user from the pending signup, delete the
    /// pending row, and consume the OTP record — all three or none.
    /// Re-checks user existence inside the transaction, so a concurrent
    /// replay fails with `AlreadyRegistered` instead of duplicating the
    /// account. `NoPendingSignup` / `AlreadyRegistered` roll everything back.
    async fn promote(&self, email: &str, otp_id: Uuid) -> Result<User, AuthServiceError>;
}

/// Delivery port for one-time codes. The plaintext code passes through here
/// exactly once and must not be logged or persisted.
pub trait OtpMailer: Send + Sync {
    async fn send_code(
        &self,
        to: &str,
        code: &str,
        expires_in_minutes: i64,
    ) -> Result<(), AuthServiceError>;
}
