//! Flipkart OTP relay - Entry point.

use flipkart_client::{FlipkartClient, ForwardedAddr, NoAddr, RandomAddr};
use otp_relay::{
    api::{create_router, AppState},
    config::Config,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flipkart OTP relay");

    let forwarded: Arc<dyn ForwardedAddr> = if config.flipkart.random_client_ip {
        info!("Random forwarded-address decoration enabled");
        Arc::new(RandomAddr)
    } else {
        Arc::new(NoAddr)
    };

    // Initialize upstream client
    let client = match FlipkartClient::new(
        config.flipkart.api_url.clone(),
        config.flipkart.timeout,
        forwarded,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Flipkart client: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        api_url = %config.flipkart.api_url,
        timeout = ?config.flipkart.timeout,
        "Relaying to Flipkart login API"
    );

    // Create application state and router
    let state = AppState::new(client);
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
