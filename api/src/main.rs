use microblog_api::{
    AppState, Config, create_app, queue::LikeQueue, service::MicroBlogService, telemetry,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let log_guard = telemetry::init_tracing(&config)?;

    info!("=== Starting MicroBlog ===");

    let like_queue = Arc::new(LikeQueue::new(
        config.like_queue_capacity,
        config.like_queue_workers,
    ));
    let service = Arc::new(MicroBlogService::new(like_queue));
    service.start_like_workers()?;

    let app = create_app(AppState::new(Arc::clone(&service)), &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    info!("Server running on http://{}", config.addr);
    info!("API Endpoints:");
    info!("  GET    /health             - Health check");
    info!("  POST   /register           - Register a user");
    info!("  GET    /users/{{username}}   - Look up a user");
    info!("  POST   /posts              - Create post");
    info!("  GET    /posts              - List posts");
    info!("  POST   /posts/{{id}}/like    - Like a post (applied asynchronously)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    // In-flight requests are done; apply whatever likes are still queued
    service.shutdown().await?;
    info!("=== MicroBlog stopped ===");

    if let Some(guard) = log_guard {
        if !guard.shutdown(config.log_flush_grace) {
            eprintln!("log file not fully flushed within {:?}", config.log_flush_grace);
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
