use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::request_otp::{OtpIssuedOutput, RequestOtpInput, RequestOtpUseCase};
use crate::usecase::resend_otp::{ResendOtpInput, ResendOtpUseCase};
use crate::usecase::verify_otp::{VerifyOtpInput, VerifyOtpUseCase};

#[derive(Deserialize)]
pub struct RequestOtpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct OtpIssuedResponse {
    pub message: &'static str,
    pub expires_at: DateTime<Utc>,
    pub resend_cooldown_seconds: i64,
}

impl From<OtpIssuedOutput> for OtpIssuedResponse {
    fn from(output: OtpIssuedOutput) -> Self {
        Self {
            message: "otp sent to your email",
            expires_at: output.expires_at,
            resend_cooldown_seconds: output.resend_cooldown_seconds,
        }
    }
}

pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpRequest>,
) -> Result<Json<OtpIssuedResponse>, AuthServiceError> {
    let usecase = RequestOtpUseCase {
        signups: state.signup_repo(),
        otps: state.otp_repo(),
        mailer: state.mailer(),
        clock: state.clock(),
        policy: state.policy,
    };
    let output = usecase
        .execute(RequestOtpInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;
    Ok(Json(output.into()))
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<(StatusCode, Json<VerifyOtpResponse>), AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        signups: state.signup_repo(),
        otps: state.otp_repo(),
        clock: state.clock(),
        policy: state.policy,
    };
    let output = usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.otp,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(VerifyOtpResponse {
            message: "account created successfully",
            user_id: output.user_id,
        }),
    ))
}

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub email: String,
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendOtpRequest>,
) -> Result<Json<OtpIssuedResponse>, AuthServiceError> {
    let usecase = ResendOtpUseCase {
        signups: state.signup_repo(),
        otps: state.otp_repo(),
        mailer: state.mailer(),
        clock: state.clock(),
        policy: state.policy,
    };
    let output = usecase.execute(ResendOtpInput { email: body.email }).await?;
    Ok(Json(output.into()))
}
