//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the auth service, catalog proxy, checkout service and configuration.

use anyhow::Context;
use shop_auth::{AuthService, InMemoryCredentialStore, SessionTokenCodec, DEFAULT_TOKEN_SECRET};
use shop_catalog::{CatalogConfig, CatalogProxy};
use shop_core::{BoxedPaymentStrategy, CheckoutService, CheckoutUrls, Currency};
use shop_stripe::{StripeCheckoutStrategy, StripeConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Frontend base URL, used for checkout redirects
    pub frontend_url: String,
    /// Token signing secret; `None` means the development default
    pub jwt_secret: Option<String>,
    /// Checkout currency
    pub currency: Currency,
    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Resolve configuration from an arbitrary variable lookup
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            None => 5000,
        };

        let currency = match var("CHECKOUT_CURRENCY") {
            Some(code) => Currency::parse(&code)
                .with_context(|| format!("unsupported CHECKOUT_CURRENCY: {code}"))?,
            None => Currency::default(),
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .filter(|origins| origins != "*")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            jwt_secret: var("JWT_SECRET"),
            currency,
            cors_allowed_origins,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Signing secret, falling back to the development default
    pub fn token_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEFAULT_TOKEN_SECRET)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and token verification
    pub auth: AuthService,
    /// Product catalog upstream
    pub catalog: Arc<CatalogProxy>,
    /// Hosted checkout sessions
    pub checkout: CheckoutService,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state from environment variables (and `.env` if present)
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Build the state from an arbitrary variable lookup
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config = AppConfig::resolve(&lookup)?;

        if config.jwt_secret.is_none() {
            warn!(
                "JWT_SECRET is not set; using the public development secret. \
                 Tokens can be forged by anyone. Set JWT_SECRET outside local demos."
            );
        }
        let tokens = Arc::new(SessionTokenCodec::new(config.token_secret()));
        let auth = AuthService::new(Arc::new(InMemoryCredentialStore::new()), tokens);

        let catalog_config = CatalogConfig::resolve(&lookup);
        info!(
            "Catalog upstream: {} ({:?}, timeout {:?})",
            catalog_config.base_url, catalog_config.source, catalog_config.timeout
        );
        let catalog = CatalogProxy::new(catalog_config).context("failed to build catalog proxy")?;

        let strategy = StripeConfig::resolve(lookup("STRIPE_SECRET_KEY"))
            .and_then(|config| config.map(StripeCheckoutStrategy::new).transpose())
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?
            .map(|stripe| {
                if stripe.config().is_test_mode() {
                    info!("Stripe configured in test mode");
                }
                Arc::new(stripe) as BoxedPaymentStrategy
            });
        if strategy.is_none() {
            warn!("STRIPE_SECRET_KEY is not set; checkout is disabled");
        }

        let checkout = CheckoutService::new(
            strategy,
            CheckoutUrls::new(&config.frontend_url),
            config.currency,
        );

        Ok(Self::from_parts(config, auth, catalog, checkout))
    }

    /// Assemble state from already-built services
    pub fn from_parts(
        config: AppConfig,
        auth: AuthService,
        catalog: CatalogProxy,
        checkout: CheckoutService,
    ) -> Self {
        Self {
            auth,
            catalog: Arc::new(catalog),
            checkout,
            config: Arc::new(config),
        }
    }
}
