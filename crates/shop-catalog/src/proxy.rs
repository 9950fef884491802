//! # Catalog Proxy
//!
//! Forwards product list/detail requests to the configured upstream.
//! Every failure (network, timeout, non-2xx, unexpected body) comes back as
//! an [`UpstreamError`]; one attempt per call, no retries.

use crate::config::CatalogConfig;
use crate::envelope::CatalogEnvelope;
use reqwest::{header::ACCEPT, Client, Url};
use serde_json::Value;
use shop_core::{ShopError, ShopResult, UpstreamError};
use tracing::{debug, instrument, warn};

/// HTTP proxy for the product catalog upstream
#[derive(Debug, Clone)]
pub struct CatalogProxy {
    config: CatalogConfig,
    client: Client,
}

impl CatalogProxy {
    /// Create a proxy with its own HTTP client
    pub fn new(config: CatalogConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ShopError::Internal(format!("failed to build catalog client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch the product list, unwrapping `{"products": [...]}` envelopes
    #[instrument(skip(self), fields(base = %self.config.base_url))]
    pub async fn list_products(&self) -> Result<Vec<Value>, UpstreamError> {
        let url = self.products_url(None)?;
        let body = self.fetch_json(&url).await?;

        let products = CatalogEnvelope::from_value(body)
            .map(CatalogEnvelope::into_products)
            .ok_or_else(|| UpstreamError::new(url.as_str(), "unexpected response shape"))?;

        debug!("Fetched {} products", products.len());
        Ok(products)
    }

    /// Fetch a single product; the upstream body is returned unmodified
    #[instrument(skip(self), fields(base = %self.config.base_url))]
    pub async fn get_product(&self, id: &str) -> Result<Value, UpstreamError> {
        let url = self.products_url(Some(id))?;
        self.fetch_json(&url).await
    }

    /// `{base}/products` or `{base}/products/{id}`, with `id` as one encoded segment
    fn products_url(&self, id: Option<&str>) -> Result<Url, UpstreamError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| UpstreamError::new(base.as_str(), format!("invalid catalog base URL: {e}")))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::new(base.as_str(), "catalog base URL cannot have a path"))?;
            segments.pop_if_empty().push("products");
            if let Some(id) = id {
                segments.push(id);
            }
        }

        Ok(url)
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog upstream error: url={}, status={}", url, status);
            return Err(
                UpstreamError::new(url.as_str(), format!("upstream responded with {status}"))
                    .with_status(status.as_u16()),
            );
        }

        response.json::<Value>().await.map_err(|e| {
            let err = if e.is_timeout() {
                self.transport_error(url, &e)
            } else {
                UpstreamError::new(url.as_str(), format!("invalid JSON from upstream: {e}"))
            };
            err.with_status(status.as_u16())
        })
    }

    fn transport_error(&self, url: &Url, e: &reqwest::Error) -> UpstreamError {
        let message = if e.is_timeout() {
            format!("request timed out after {:?}", self.config.timeout)
        } else if e.is_connect() {
            format!("could not connect to upstream: {e}")
        } else {
            format!("upstream request failed: {e}")
        };
        warn!("Catalog upstream unreachable: url={}, {}", url, message);
        UpstreamError::new(url.as_str(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn proxy_for(server: &MockServer) -> CatalogProxy {
        CatalogProxy::new(CatalogConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_list_products_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let products = proxy_for(&server).list_products().await.unwrap();
        assert_eq!(products, vec![json!({"id": 1})]);
    }

    #[tokio::test]
    async fn test_list_products_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"products": [{"id": 2}], "total": 1, "limit": 30})),
            )
            .mount(&server)
            .await;

        let products = proxy_for(&server).list_products().await.unwrap();
        assert_eq!(products, vec![json!({"id": 2})]);
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        proxy_for(&server).list_products().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let user_agent = requests[0]
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok());
        assert_eq!(user_agent, Some(crate::config::BROWSER_USER_AGENT));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let err = proxy_for(&server).list_products().await.unwrap_err();
        assert_eq!(err.message, "unexpected response shape");
        assert!(err.url.ends_with("/products"));
    }

    #[tokio::test]
    async fn test_non_2xx_carries_status_and_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = proxy_for(&server).list_products().await.unwrap_err();
        assert_eq!(err.status, Some(503));
        assert_eq!(err.url, format!("{}/products", server.uri()));
    }

    #[tokio::test]
    async fn test_get_product_passes_body_through() {
        let server = MockServer::start().await;
        let body = json!({"id": 42, "title": "Backpack", "rating": {"rate": 3.9}});
        Mock::given(method("GET"))
            .and(path("/products/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let product = proxy_for(&server).get_product("42").await.unwrap();
        assert_eq!(product, body);
    }

    #[tokio::test]
    async fn test_get_product_not_found_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = proxy_for(&server).get_product("999").await.unwrap_err();
        assert_eq!(err.status, Some(404));
        assert!(err.url.ends_with("/products/999"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let err = proxy_for(&server).get_product("1").await.unwrap_err();
        assert!(err.message.starts_with("invalid JSON"));
        assert_eq!(err.status, Some(200));
    }

    #[tokio::test]
    async fn test_timeout_is_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let config = CatalogConfig::new(server.uri()).with_timeout(Duration::from_millis(200));
        let proxy = CatalogProxy::new(config).unwrap();

        let started = Instant::now();
        let err = proxy.list_products().await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(err.message.contains("timed out"));
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_error() {
        let config = CatalogConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let proxy = CatalogProxy::new(config).unwrap();

        let err = proxy.list_products().await.unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(err.url, "http://127.0.0.1:1/products");
    }

    #[test]
    fn test_product_id_is_one_encoded_segment() {
        let proxy = CatalogProxy::new(CatalogConfig::new("https://dummyjson.com/")).unwrap();
        let url = proxy.products_url(Some("a/b?c")).unwrap();
        assert_eq!(url.as_str(), "https://dummyjson.com/products/a%2Fb%3Fc");
    }

    #[test]
    fn test_base_path_is_kept() {
        let proxy = CatalogProxy::new(CatalogConfig::new("https://example.com/api/v2")).unwrap();
        let url = proxy.products_url(None).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v2/products");
    }
}
