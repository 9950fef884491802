//! # Storefront BFF
//!
//! Backend-for-frontend: catalog proxy, demo auth and hosted checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: enable checkout
//! export STRIPE_SECRET_KEY=sk_test_...
//! export JWT_SECRET=change-me
//!
//! # Run the server
//! storefront-bff
//! ```

use shop_api::{routes, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG / LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new().unwrap_or_else(|e| exit_with(&e));
    let addr = state.config.socket_addr().unwrap_or_else(|e| exit_with(&e));
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Frontend URL: {}", state.config.frontend_url);
    info!(
        "Payment provider: {}",
        state.checkout.provider_name().unwrap_or("none")
    );

    // Create router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| exit_with(&anyhow::anyhow!("failed to bind {addr}: {e}")));

    info!("🚀 storefront-bff listening on http://{}", addr);
    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🛒 Products: GET http://{}/api/products", addr);
        info!("💳 Checkout: POST http://{}/api/checkout/create-session", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Log a startup failure through tracing and exit non-zero
fn exit_with(err: &anyhow::Error) -> ! {
    error!("Startup failed: {:#}", err);
    std::process::exit(1);
}

/// `RUST_LOG` filter (default `info`); `LOG_FORMAT=json` for JSON lines
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}

fn print_banner() {
    println!(
        r#"
  🛍  storefront-bff
  ━━━━━━━━━━━━━━━━━━━━━━━
  Catalog proxy, auth and checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
