use crate::domain::types::OtpPolicy;

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3205). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP port (default 587).
    pub smtp_port: u16,
    /// Sender address, doubles as the SMTP auth user.
    pub smtp_email: String,
    pub smtp_password: String,
    /// OTP policy knobs — operator-tunable, never hardcoded.
    pub otp_policy: OtpPolicy,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let defaults = OtpPolicy::default();
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            auth_port: parse_or("AUTH_PORT", 3205),
            smtp_host: std::env::var("SMTP_HOST").expect("SMTP_HOST"),
            smtp_port: parse_or("SMTP_PORT", 587),
            smtp_email: std::env::var("SMTP_EMAIL").expect("SMTP_EMAIL"),
            smtp_password: std::env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD"),
            otp_policy: OtpPolicy {
                code_length: parse_or("OTP_LENGTH", defaults.code_length),
                expiry_minutes: parse_or("OTP_EXPIRY_MINUTES", defaults.expiry_minutes),
                resend_cooldown_seconds: parse_or(
                    "OTP_RESEND_COOLDOWN_SECONDS",
                    defaults.resend_cooldown_seconds,
                ),
                max_attempts: parse_or("MAX_OTP_VERIFY_ATTEMPTS", defaults.max_attempts),
            },
        }
    }
}

fn parse_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
