use clap::Parser;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rowscope_studio::{
    config::{Args, StudioConfig},
    create_router, open_source,
    session::cleanup_task,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rowscope_studio={0},rowscope_core={0},rowscope_sqlite={0},tower_http=info",
                    log_filter
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create configuration
    let config: StudioConfig = args.into();
    let listen_addr = config.listen_addr();
    let base_url = config.base_url();

    // Open the database
    let source = open_source(&config)?;
    tracing::info!(
        database = %config.database_label(),
        demo = config.demo,
        "database opened"
    );

    // Create application state
    let state = AppState::new(config.clone(), source);

    // Start session cleanup background task
    let cleanup_manager = state.sessions.clone();
    tokio::spawn(async move {
        cleanup_task(cleanup_manager, Duration::from_secs(60)).await;
    });

    // Create router
    let app = create_router(state);

    // Bind to address
    let listener = TcpListener::bind(&listen_addr).await?;

    tracing::info!("rowscope Studio starting on {}", base_url);
    tracing::info!("API available at {}/api/session", base_url);
    tracing::info!("Health check at {}/health", base_url);

    println!();
    println!("  rowscope Studio is running");
    println!("    Local:    {}", base_url);
    println!("    Database: {}", config.database_label());
    println!("  Press Ctrl+C to stop");
    println!();

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
