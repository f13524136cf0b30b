use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::interval;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deepseek_gateway::{
    build_router, config::Args, metrics::TRACKED_CLIENTS, rate_limit::RateLimiter,
    state::AppState, upstream,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let client = upstream::connect(&args).await;
    let connected = client.is_some();

    let state = Arc::new(
        AppState::new(client, RateLimiter::new(args.rate_limit, args.rate_window()))
            .with_environment(args.environment.clone())
            .with_trust_forwarded_for(args.trust_forwarded_for),
    );

    // evict idle clients from the limiter
    let sweep_state = state.clone();
    let sweep_interval = args.rate_cleanup_interval();
    tokio::spawn(async move {
        let mut ticker = interval(sweep_interval);
        loop {
            ticker.tick().await;
            let evicted = sweep_state.rate_limiter.cleanup(Instant::now());
            let tracked = sweep_state.rate_limiter.tracked_clients();
            TRACKED_CLIENTS.set(tracked as f64);
            if evicted > 0 {
                tracing::debug!(evicted, tracked, "rate limiter sweep");
            }
        }
    });

    let app = build_router(state);

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway running on http://{}", addr);
    info!("Environment: {}", args.environment);
    info!(
        "DeepSeek: {} ({})",
        if connected { "connected" } else { "not connected" },
        args.base_url
    );
    info!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Gateway stopped");
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
