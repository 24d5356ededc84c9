use uuid::Uuid;

use crate::domain::clock::Clock;
use crate::domain::repository::{OtpRepository, SignupRepository};
use crate::domain::types::OtpPolicy;
use crate::error::AuthServiceError;
use crate::usecase::hashing::verify_secret;

pub struct VerifyOtpInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyOtpOutput {
    pub user_id: Uuid,
}

pub struct VerifyOtpUseCase<S, O, C>
where
    S: SignupRepository,
    O: OtpRepository,
    C: Clock,
{
    pub signups: S,
    pub otps: O,
    pub clock: C,
    pub policy: OtpPolicy,
}

impl<S, O, C> VerifyOtpUseCase<S, O, C>
where
    S: SignupRepository,
    O: OtpRepository,
    C: Clock,
{
    /// Check the candidate code against the latest active record, then hand
    /// off to the promotion transaction. Expired, exhausted, and missing
    /// codes all surface as `OtpNotFound` — a caller must not be able to
    /// tell whether a code ever existed for an email.
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<VerifyOtpOutput, AuthServiceError> {
        let record = self
            .otps
            .latest_active(&input.email)
            .await?
            .ok_or(AuthServiceError::OtpNotFound)?;

        let now = self.clock.now();
        if record.attempts_exhausted(self.policy.max_attempts) || record.is_expired(now) {
            self.otps.mark_consumed(record.id).await?;
            return Err(AuthServiceError::OtpNotFound);
        }

        if !verify_secret(&input.code, &record.code_hash)? {
            self.otps.increment_attempts(record.id).await?;
            let remaining = self.policy.max_attempts.saturating_sub(record.attempts + 1);
            if remaining == 0 {
                self.otps.mark_consumed(record.id).await?;
                return Err(AuthServiceError::TooManyAttempts);
            }
            return Err(AuthServiceError::InvalidOtp {
                remaining_attempts: remaining,
            });
        }

        // Correct code. Consumption is deliberately left to the promotion
        // transaction so verification and promotion share one failure domain.
        match self.signups.promote(&input.email, record.id).await {
            Ok(user) => Ok(VerifyOtpOutput { user_id: user.id }),
            Err(err) => {
                // The code has been disclosed and matched; it must not stay
                // replayable just because promotion rolled back. Best-effort:
                // the caller already has a definitive failure either way.
                if let Err(cleanup) = self.otps.mark_consumed(record.id).await {
                    tracing::warn!(
                        error = ?cleanup,
                        "failed to consume otp after unpromoted verification"
                    );
                }
                Err(err)
            }
        }
    }
}
