use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check. Services with heavier
/// startup requirements can mount their own in place of this one.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
