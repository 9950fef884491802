//! # Catalog Configuration
//!
//! The upstream base URL is chosen once at startup and never changes.
//! Priority: `CATALOG_API_URL`, then a hosting-platform heuristic, then the
//! FakeStore API.

use std::time::Duration;

/// FakeStore API: `/products` returns a bare JSON array
pub const FAKESTORE_BASE_URL: &str = "https://fakestoreapi.com";

/// DummyJSON: `/products` returns `{"products": [...], "total": ..}`
pub const DUMMYJSON_BASE_URL: &str = "https://dummyjson.com";

/// Env vars set by hosting platforms whose egress FakeStore tends to block
pub const HOSTING_MARKERS: &[&str] = &["RENDER", "VERCEL", "RAILWAY_ENVIRONMENT", "FLY_APP_NAME"];

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const MAX_TIMEOUT_SECS: u64 = 20;

/// Some catalog hosts reject default HTTP client signatures
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Where the base URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamSource {
    /// `CATALOG_API_URL`
    Override,
    /// Hosting platform detected
    Hosted,
    /// Hardcoded default
    Default,
}

/// Catalog upstream configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
    pub source: UpstreamSource,
}

impl CatalogConfig {
    /// Config for an explicit base URL (for testing)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: BROWSER_USER_AGENT.to_string(),
            source: UpstreamSource::Override,
        }
    }

    /// Resolve configuration from a variable lookup (normally the process env).
    ///
    /// - `CATALOG_API_URL` - explicit upstream base URL
    /// - `CATALOG_TIMEOUT_SECS` - request timeout, clamped to 1..=20
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (base_url, source) = if let Some(url) = non_blank("CATALOG_API_URL") {
            (url.trim().to_string(), UpstreamSource::Override)
        } else if HOSTING_MARKERS.iter().any(|m| non_blank(m).is_some()) {
            (DUMMYJSON_BASE_URL.to_string(), UpstreamSource::Hosted)
        } else {
            (FAKESTORE_BASE_URL.to_string(), UpstreamSource::Default)
        };

        let timeout_secs = non_blank("CATALOG_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.clamp(1, MAX_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            source,
            timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        }
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
