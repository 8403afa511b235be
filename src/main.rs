use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use learnx::config::server::ServerConfig;
use learnx::router::init_router;
use learnx::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the
                // `axum::rejection` target at `TRACE` level.
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await;
    let app = init_router(state);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!("Server running on http://localhost:{}", server_config.port);
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server exited with an error");
        std::process::exit(1);
    }
}
