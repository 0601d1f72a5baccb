//! API Transport Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result, TransportError, TransportResult},
    http::{ApiTransport, HttpMethod, RequestOptions},
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Reqwest-based backend transport
///
/// Resolves every path against a fixed base URL, attaches the bearer token
/// (unless the caller supplied its own `Authorization` header), and decodes
/// JSON responses. Non-2xx responses become [`TransportError::Http`] with the
/// decoded body so the request wrapper can read server-supplied detail.
///
/// No retries: a failed call is reported once.
pub struct ReqwestApiTransport {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ReqwestApiTransport {
    /// Create a transport with default client configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a transport whose client gives up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("api-bridge-demo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Self::with_client(client, base_url)
    }

    /// Create a transport around an existing client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            BridgeError::OperationFailed(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BridgeError::OperationFailed(format!(
                "Unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    /// Join `path` onto the base URL and append query parameters
    fn resolve(&self, path: &str, query: &[(String, String)]) -> TransportResult<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let mut url = Url::parse(&joined)
            .map_err(|e| TransportError::Other(format!("Invalid request URL '{}': {}", joined, e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Decode a response body: JSON when possible, raw text otherwise
    fn decode_body(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return Value::Null;
        }

        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
        options: &RequestOptions,
    ) -> TransportResult<Value> {
        let url = self.resolve(path, &options.query)?;
        debug!(method = %method, path, "Sending backend request");

        let mut req = self
            .client
            .request(Self::convert_method(method), url)
            .header("Accept", "application/json");

        for (key, value) in &options.headers {
            req = req.header(key, value);
        }

        if options.get_header("Authorization").is_none() {
            if let Some(token) = &self.bearer_token {
                req = req.bearer_auth(token);
            }
        }

        if let Some(body) = payload {
            req = req.json(&body);
        }

        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body = Self::decode_body(&bytes);

        if (200..300).contains(&status) {
            Ok(body)
        } else {
            warn!(status, path, "Backend responded with error status");
            let body = match body {
                Value::Null => None,
                Value::String(text) => Some(serde_json::json!({ "message": text })),
                other => Some(other),
            };
            Err(TransportError::Http { status, body })
        }
    }
}

/// Map a reqwest failure onto the closed transport failure set
pub(crate) fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() || error.is_request() {
        TransportError::Network(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl ApiTransport for ReqwestApiTransport {
    async fn get(&self, path: &str, options: &RequestOptions) -> TransportResult<Value> {
        self.send(HttpMethod::Get, path, None, options).await
    }

    async fn post(
        &self,
        path: &str,
        payload: Option<Value>,
        options: &RequestOptions,
    ) -> TransportResult<Value> {
        self.send(HttpMethod::Post, path, payload, options).await
    }

    async fn put(
        &self,
        path: &str,
        payload: Option<Value>,
        options: &RequestOptions,
    ) -> TransportResult<Value> {
        self.send(HttpMethod::Put, path, payload, options).await
    }

    async fn delete(&self, path: &str, options: &RequestOptions) -> TransportResult<Value> {
        self.send(HttpMethod::Delete, path, None, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/api", addr)
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(
            ReqwestApiTransport::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestApiTransport::convert_method(HttpMethod::Put),
            reqwest::Method::PUT
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ReqwestApiTransport::new("not a url").is_err());
        assert!(ReqwestApiTransport::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_resolve_joins_paths_and_query() {
        let transport = ReqwestApiTransport::new("https://example.com/api/").unwrap();
        assert_eq!(transport.base_url(), "https://example.com/api");

        let url = transport.resolve("/items/42", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/items/42");

        let url = transport
            .resolve("items", &[("page".to_string(), "2".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/items?page=2");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(ReqwestApiTransport::decode_body(b""), Value::Null);
        assert_eq!(
            ReqwestApiTransport::decode_body(br#"{"ok":true}"#),
            json!({"ok": true})
        );
        assert_eq!(
            ReqwestApiTransport::decode_body(b"plain text"),
            Value::String("plain text".to_string())
        );
    }

    #[tokio::test]
    async fn test_success_response_is_decoded() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 15\r\nconnection: close\r\n\r\n{\"status\":\"ok\"}",
        )
        .await;

        let transport = ReqwestApiTransport::new(&base).unwrap();
        let body = transport
            .get("/status", &RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-type: application/json\r\ncontent-length: 23\r\nconnection: close\r\n\r\n{\"detail\":\"No such id\"}",
        )
        .await;

        let transport = ReqwestApiTransport::new(&base).unwrap();
        let error = transport
            .delete("/items/missing", &RequestOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            TransportError::Http {
                status: 404,
                body: Some(json!({"detail": "No such id"})),
            }
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestApiTransport::new(&format!("http://{}", addr)).unwrap();
        let error = transport
            .get("/health", &RequestOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(error, TransportError::Network(_)), "{:?}", error);
    }
}
