use axum::{Router, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use workshop_core::health::{healthz, readyz};
use workshop_core::middleware::request_id_layer;

use crate::handlers::login::login;
use crate::handlers::signup::{request_otp, resend_otp, verify_otp};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup / OTP lifecycle
        .route("/auth/request-otp", post(request_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        // Login
        .route("/auth/login", post(login))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
