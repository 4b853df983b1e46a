//! HTTP transport
//!
//! The client only needs two request shapes: a form-encoded POST and an
//! authorized GET with query parameters. Keeping them behind a trait lets
//! tests script responses without a network.

use async_trait::async_trait;
use thiserror::Error;

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, e.g. "Unauthorized"
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (DNS, refused connection, TLS...)
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `form` as `application/x-www-form-urlencoded`
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, TransportError>;

    /// GET with query parameters and a bearer token
    async fn get_authorized(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse, TransportError> {
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        read_response(response).await
    }

    async fn get_authorized(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

    Ok(HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            status_text: "No Content".to_string(),
            body: String::new(),
        };
        assert!(ok.is_success());

        let denied = HttpResponse {
            status: 401,
            ..ok.clone()
        };
        assert!(!denied.is_success());

        let redirect = HttpResponse { status: 302, ..ok };
        assert!(!redirect.is_success());
    }
}
