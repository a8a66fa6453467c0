//! Cookie-persisting HTTP session against the target site.
//!
//! One client instance is one session: the cookie store carries the
//! server-issued authentication state across calls until the client is
//! dropped. Non-2xx statuses are returned to the caller rather than raised;
//! only connection-level failures surface as errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::app::Result;

/// One completed request: status, decoded body, and the URL the server
/// finally landed on after redirects.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
    pub final_url: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait SessionClient {
    async fn fetch(
        &self,
        url: &str,
        method: Method,
        params: &[(String, String)],
    ) -> Result<FetchResponse>;
}

pub struct HttpSessionClient {
    client: Client,
}

impl HttpSessionClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .cookie_store(true)
            .user_agent("claimlens/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpSessionClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn fetch(
        &self,
        url: &str,
        method: Method,
        params: &[(String, String)],
    ) -> Result<FetchResponse> {
        tracing::debug!(%url, %method, "fetching");

        let request = if method == Method::POST {
            self.client.post(url).form(params)
        } else {
            let mut builder = self.client.get(url);
            if !params.is_empty() {
                builder = builder.query(params);
            }
            builder
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        tracing::debug!(status, %final_url, "fetch complete");

        Ok(FetchResponse {
            status,
            body,
            final_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = HttpSessionClient::default();
        let response = client
            .fetch(&format!("{}/page", server.uri()), Method::GET, &[])
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "hello");
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_non_2xx_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forbidden"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let client = HttpSessionClient::default();
        let response = client
            .fetch(&format!("{}/forbidden", server.uri()), Method::GET, &[])
            .await
            .unwrap();

        assert_eq!(response.status, 403);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_cookies_persist_across_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc123; Path=/"),
            )
            .mount(&server)
            .await;
        // Only matches when the session cookie from the first call is sent back
        Mock::given(method("GET"))
            .and(path("/protected"))
            .and(header("cookie", "sid=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("authenticated"))
            .mount(&server)
            .await;

        let client = HttpSessionClient::default();
        client
            .fetch(&format!("{}/login", server.uri()), Method::GET, &[])
            .await
            .unwrap();
        let response = client
            .fetch(&format!("{}/protected", server.uri()), Method::GET, &[])
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "authenticated");
    }

    #[tokio::test]
    async fn test_final_url_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/start"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/dest"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
            .mount(&server)
            .await;

        let client = HttpSessionClient::default();
        let response = client
            .fetch(&format!("{}/start", server.uri()), Method::GET, &[])
            .await
            .unwrap();

        assert!(response.final_url.ends_with("/dest"));
        assert_eq!(response.body, "landed");
    }

    #[tokio::test]
    async fn test_post_sends_form_encoded_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(body_string_contains("username=admin"))
            .and(body_string_contains("password=secret"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpSessionClient::default();
        let params = vec![
            ("username".to_string(), "admin".to_string()),
            ("password".to_string(), "secret".to_string()),
        ];
        let response = client
            .fetch(&format!("{}/submit", server.uri()), Method::POST, &params)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = HttpSessionClient::new(Duration::from_secs(2));
        // Nothing listens on this port
        let result = client
            .fetch("http://127.0.0.1:9/page", Method::GET, &[])
            .await;
        assert!(result.is_err());
    }
}
