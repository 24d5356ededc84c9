use sea_orm::Database;
use tracing::info;

use workshop_auth::config::AuthConfig;
use workshop_auth::infra::mail::SmtpOtpMailer;
use workshop_auth::router::build_router;
use workshop_auth::state::AppState;

#[tokio::main]
async fn main() {
    workshop_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = SmtpOtpMailer::new(&config).expect("failed to build SMTP mailer");

    let state = AppState {
        db,
        mailer,
        policy: config.otp_policy,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
