use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Policy errors (wrong code, cooldown, exhausted attempts) are expected
/// outcomes of the OTP state machine and are surfaced without logging;
/// infrastructure errors keep their chain server-side and reach the client
/// only as an opaque kind distinguishing delivery from storage trouble.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password too weak (min 8 chars)")]
    WeakPassword,
    #[error("invalid role")]
    InvalidRole,
    #[error("email already registered")]
    AlreadyRegistered,
    /// Covers expired, exhausted, and nonexistent codes alike so a caller
    /// cannot probe which emails have a code in flight.
    #[error("otp expired or not found")]
    OtpNotFound,
    #[error("invalid otp")]
    InvalidOtp { remaining_attempts: u32 },
    #[error("too many attempts")]
    TooManyAttempts,
    #[error("please wait before requesting another otp")]
    TooSoon { retry_after_seconds: i64 },
    #[error("no pending signup found")]
    NoPendingSignup,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account disabled")]
    AccountDisabled,
    #[error("failed to send otp email")]
    EmailSend(#[source] anyhow::Error),
    #[error("storage failure")]
    Storage(#[from] anyhow::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidRole => "INVALID_ROLE",
            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::InvalidOtp { .. } => "INVALID_OTP",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::TooSoon { .. } => "RESEND_TOO_SOON",
            Self::NoPendingSignup => "NO_PENDING_SIGNUP",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::EmailSend(_) => "EMAIL_SEND_FAILED",
            Self::Storage(_) => "DB_WRITE_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEmail
            | Self::WeakPassword
            | Self::InvalidRole
            | Self::OtpNotFound
            | Self::InvalidOtp { .. }
            | Self::NoPendingSignup => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyRegistered => StatusCode::CONFLICT,
            Self::TooManyAttempts | Self::TooSoon { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::EmailSend(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for all requests, and 4xx are expected client outcomes. 5xx need the
        // error chain logged so the root cause is traceable; the client gets
        // just the kind, never raw database or SMTP text.
        match &self {
            Self::EmailSend(e) | Self::Storage(e) | Self::Internal(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "request failed");
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match &self {
            Self::InvalidOtp { remaining_attempts } => {
                body["remaining_attempts"] = (*remaining_attempts).into();
            }
            Self::TooSoon {
                retry_after_seconds,
            } => {
                body["retry_after_seconds"] = (*retry_after_seconds).into();
            }
            _ => {}
        }
        (status, axum::Json(body)).into_response()
    }
}
