use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user_id: Uuid,
    pub role: &'static str,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthServiceError> {
    let usecase = LoginUseCase {
        signups: state.signup_repo(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;
    Ok(Json(LoginResponse {
        message: "login successful",
        user_id: output.user.id,
        role: output.user.role.as_str(),
    }))
}
