use crate::domain::clock::Clock;
use crate::domain::repository::{OtpMailer, OtpRepository, SignupRepository};
use crate::domain::types::OtpPolicy;
use crate::error::AuthServiceError;
use crate::usecase::otp::issue_and_send;
use crate::usecase::request_otp::OtpIssuedOutput;

pub struct ResendOtpInput {
    pub email: String,
}

pub struct ResendOtpUseCase<S, O, M, C>
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

impl<S, O, M, C> ResendOtpUseCase<S, O, M, C>
where
    S: SignupRepository,
    O: OtpRepository,
    M: OtpMailer,
    C: Clock,
{
    /// Ordering is contractual: pending-signup check, then cooldown, then
    /// invalidate-and-issue. Sending anything before the pending check would
    /// leak which emails have a signup in flight.
    pub async fn execute(&self, input: ResendOtpInput) -> Result<OtpIssuedOutput, AuthServiceError> {
        self.signups
            .find_pending(&input.email)
            .await?
            .ok_or(AuthServiceError::NoPendingSignup)?;

        let now = self.clock.now();
        if let Some(latest) = self.otps.latest_active(&input.email).await? {
            if latest.is_active(now, self.policy.max_attempts) {
                let elapsed = (now - latest.created_at).num_seconds();
                if elapsed < self.policy.resend_cooldown_seconds {
                    // Inside the window: no invalidation, no new record, no send.
                    return Err(AuthServiceError::TooSoon {
                        retry_after_seconds: self.policy.resend_cooldown_seconds - elapsed,
                    });
                }
            }
        }

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
