use asset_dashboard::{load_config, pipeline, router, AppState};
use std::{env, net::SocketAddr};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = load_config()?;
    info!(
        "dashboard configured for {} ({}), {} technicians",
        config.company.name,
        config.window.label,
        config.technicians.len()
    );

    // Publish the snapshot state immediately so the page is renderable before
    // the first fetch completes; the refresh loop replaces it right away.
    let initial = pipeline::static_state(&config);
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(config.port);

    let state = AppState::new(config, initial);
    tokio::spawn(pipeline::refresh_loop(state.clone()));

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
