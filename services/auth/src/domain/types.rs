use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Account role. Signup may request any role except `Admin`; admin
/// accounts are provisioned out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Contractor,
    Technician,
    Supplier,
    Consultant,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contractor => "contractor",
            Self::Technician => "technician",
            Self::Supplier => "supplier",
            Self::Consultant => "consultant",
            Self::Admin => "admin",
        }
    }

    /// Parse any known role (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "contractor" => Some(Self::Contractor),
            "technician" => Some(Self::Technician),
            "supplier" => Some(Self::Supplier),
            "consultant" => Some(Self::Consultant),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Parse a role a signup request is allowed to ask for.
    pub fn parse_signup(s: &str) -> Option<Self> {
        match Self::parse(s) {
            Some(Self::Admin) | None => None,
            some => some,
        }
    }
}

/// Durable account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

/// Unconfirmed registration. At most one per email (upsert semantics);
/// removed by the promotion transaction, never garbage-collected on its own.
#[derive(Debug, Clone)]
pub struct PendingSignup {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One issued one-time code. Only the argon2 hash of the code is kept;
/// the plaintext exists once, on its way to the mailer.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: Uuid,
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Active = eligible for verification.
    pub fn is_active(&self, now: DateTime<Utc>, max_attempts: u32) -> bool {
        !self.consumed && !self.is_expired(now) && !self.attempts_exhausted(max_attempts)
    }
}

/// Operator-tunable OTP policy. Loaded from the environment once and handed
/// to the use cases at construction so tests can inject their own values.
#[derive(Debug, Clone, Copy)]
pub struct OtpPolicy {
    /// Digits in a generated code.
    pub code_length: usize,
    /// Code lifetime from issuance.
    pub expiry_minutes: i64,
    /// Minimum gap between two issuances for the same email.
    pub resend_cooldown_seconds: i64,
    /// Wrong-guess budget per code.
    pub max_attempts: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            expiry_minutes: 5,
            resend_cooldown_seconds: 60,
            max_attempts: 5,
        }
    }
}
