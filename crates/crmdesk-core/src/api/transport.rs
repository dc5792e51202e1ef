//! HTTP transport behind the API client.
//!
//! `ApiClient` never talks to reqwest directly; it hands a fully built
//! [`HttpRequest`] to a [`Transport`] and gets back the raw status and body.
//! Production code uses [`ReqwestTransport`]; tests substitute a fake.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// HTTP methods used by the CRM API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Only `POST` and `PUT` ever send a body.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request ready to go on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer: Option<String>,
    /// Sent as a JSON body when present
    pub body: Option<Value>,
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was obtained (connection refused, DNS failure, timeout...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport; `timeout` of `None` keeps reqwest's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(method = %request.method, url = %request.url, status, "Response received");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, answer `{"ok":true}` and return the raw request
    async fn capture_one(listener: TcpListener) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 11\r\nconnection: close\r\n\r\n{\"ok\":true}",
            )
            .await
            .unwrap();
        String::from_utf8(raw).unwrap()
    }

    /// Send `request` with its url rooted at a local listener; returns
    /// (request head lowercased, request body, response)
    async fn round_trip(mut request: HttpRequest) -> (String, String, HttpResponse) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(capture_one(listener));

        request.url = format!("http://{}{}", addr, request.url);
        let transport = ReqwestTransport {
            client: Client::builder()
                .no_proxy()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
        };
        let response = transport
            .send(request)
            .await
            .unwrap();

        let raw = server.await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        (head.to_lowercase(), body.to_string(), response)
    }

    #[tokio::test]
    async fn test_get_sends_json_headers_and_bearer_without_body() {
        let (head, body, response) = round_trip(HttpRequest {
            method: Method::Get,
            url: "/api/customers".to_string(),
            bearer: Some("T".to_string()),
            body: None,
        })
        .await;

        assert!(head.starts_with("get /api/customers http/1.1"));
        assert!(head.contains("content-type: application/json"));
        assert!(head.contains("authorization: bearer t"));
        assert_eq!(body, "");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_post_sends_json_body_without_bearer() {
        let (head, body, _) = round_trip(HttpRequest {
            method: Method::Post,
            url: "/api/auth/login".to_string(),
            bearer: None,
            body: Some(json!({"a": 1})),
        })
        .await;

        assert!(head.starts_with("post /api/auth/login http/1.1"));
        assert!(head.contains("content-type: application/json"));
        assert!(!head.contains("authorization"));
        assert_eq!(body, r#"{"a":1}"#);
    }

    #[test]
    fn test_only_post_and_put_carry_body() {
        assert!(Method::Post.carries_body());
        assert!(Method::Put.carries_body());
        assert!(!Method::Get.carries_body());
        assert!(!Method::Delete.carries_body());
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "{}").is_success());
        assert!(HttpResponse::new(201, "{}").is_success());
        assert!(!HttpResponse::new(401, "{}").is_success());
        assert!(!HttpResponse::new(500, "{}").is_success());
    }

    #[test]
    fn test_method_maps_to_reqwest() {
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
