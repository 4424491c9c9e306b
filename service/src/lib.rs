mod auth;
mod error;
mod notify;
mod render;
mod service;

pub use auth::{AdminSession, CredentialVerifier, SessionStore, StaticCredentials};
pub use error::ApiError;
pub use notify::{Notifier, SmtpNotifier};

use abi::Config;
use axum::{
    routing::{delete, get, post},
    Router,
};
use reservation::ReservationManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub manager: ReservationManager,
    pub notifier: Arc<dyn Notifier>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: SessionStore,
    /// Operator address copied on every confirmation mail.
    pub operator: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/reservations", post(service::create_reservation))
        .route("/api/occupied-times", get(service::occupied_times))
        .route(
            "/admin/login",
            get(service::login_form).post(service::login),
        )
        .route("/admin/logout", get(service::logout))
        .route("/admin/reservations", get(service::list_reservations))
        .route(
            "/admin/reservations/:id",
            delete(service::delete_reservation),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let manager = ReservationManager::from_config(&config.db).await?;
    let notifier = Arc::new(SmtpNotifier::from_config(&config.mail)?);
    let state = AppState {
        manager,
        notifier,
        verifier: Arc::new(StaticCredentials::from_config(&config.admin)),
        sessions: SessionStore::default(),
        operator: config.mail.operator.clone(),
    };

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
