use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::clock::Clock;
use crate::domain::repository::{OtpMailer, OtpRepository};
use crate::domain::types::{OtpPolicy, OtpRecord};
use crate::error::AuthServiceError;
use crate::usecase::hashing::hash_secret;

/// Charset for generated one-time codes.
const CHARSET: &[u8] = b"0123456789";

pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// What the caller learns about a freshly issued code. The plaintext is
/// already on its way to the mailer and is not re-derivable from this.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub record_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Shared issue flow for request and resend: invalidate every active code
/// for the email, insert one fresh hashed record, then hand the plaintext
/// to the mailer. Order matters — the record is durable before the send is
/// attempted, so a failed delivery leaves a consistent store and the caller
/// simply retries the whole flow (which replaces the record).
pub async fn issue_and_send<O, M, C>(
    otps: &O,
    mailer: &M,
    clock: &C,
    policy: &OtpPolicy,
    email: &str,
) -> Result<IssuedOtp, AuthServiceError>
where
    O: OtpRepository,
    M: OtpMailer,
    C: Clock,
{
    let code = generate_code(policy.code_length);
    let code_hash = hash_secret(&code)?;
    let now = clock.now();

    otps.invalidate_all(email).await?;
    let record = OtpRecord {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code_hash,
        expires_at: now + Duration::minutes(policy.expiry_minutes),
        attempts: 0,
        consumed: false,
        created_at: now,
    };
    otps.create(&record).await?;

    mailer
        .send_code(email, &code, policy.expiry_minutes)
        .await?;

    Ok(IssuedOtp {
        record_id: record.id,
        expires_at: record.expires_at,
    })
}
