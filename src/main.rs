mod advisor;
mod frame;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize advisor client (non-fatal: chat answers disabled if config missing).
    let advisor = match advisor::from_env() {
        Ok(client) => {
            tracing::info!(base_url = client.base_url(), "advisor client initialized");
            Some(Arc::new(client) as Arc<dyn advisor::AdvisorApi>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "advisor client not configured; chat answers disabled");
            None
        }
    };

    let state = state::AppState::new(advisor);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "cardscout listening");
    axum::serve(listener, app).await.expect("server failed");
}
