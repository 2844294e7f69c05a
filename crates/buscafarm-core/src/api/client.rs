//! API client for the BuscaFarm backend.
//!
//! Only the employee sign-in endpoint is used by the session store; every
//! other screen of the back office talks to the API with the token it
//! hands out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::employee::PHARMACY_FIELD;
use crate::models::{Employee, Pharmacy};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither the config file nor the environment names one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

/// Path of the employee sign-in endpoint, relative to the base URL
const SESSIONS_PATH: &str = "sessions/employees";

/// HTTP request timeout in seconds.
/// The only bound on an in-flight sign-in; there is no cancellation.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body of a successful `POST sessions/employees`.
///
/// The employee is kept untyped here because it still carries the nested
/// pharmacy record; [`SignInResponse::split`] separates the two.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub employee: Map<String, Value>,
}

impl SignInResponse {
    /// Pull the nested pharmacy out of the employee record and type both.
    pub fn split(mut self) -> Result<(String, Employee, Pharmacy), ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::InvalidResponse("empty token".to_string()));
        }

        let pharmacy = self.employee.remove(PHARMACY_FIELD).ok_or_else(|| {
            ApiError::InvalidResponse(format!("employee record has no `{}` field", PHARMACY_FIELD))
        })?;
        let pharmacy: Pharmacy = serde_json::from_value(pharmacy)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid pharmacy record: {}", e)))?;
        let employee: Employee = serde_json::from_value(Value::Object(self.employee))
            .map_err(|e| ApiError::InvalidResponse(format!("invalid employee record: {}", e)))?;

        Ok((self.token, employee, pharmacy))
    }
}

/// Credential verification, as seen by the session store.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate_employee(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, ApiError>;
}

/// API client for the BuscaFarm backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate_employee(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, ApiError> {
        let url = self.url(SESSIONS_PATH);
        debug!(url = %url, "Sending employee sign-in request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&SignInRequest { email, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("unparseable sign-in response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/", addr), handle)
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://api.buscafarm.local/").unwrap();
        assert_eq!(client.base_url(), "http://api.buscafarm.local");
        assert_eq!(
            client.url(SESSIONS_PATH),
            "http://api.buscafarm.local/sessions/employees"
        );
    }

    #[test]
    fn test_split_moves_pharmacy_out_of_employee() {
        let json = r#"{"token":"t1","employee":{"id":1,"name":"A","pharmacie":{"id":9}}}"#;
        let response: SignInResponse = serde_json::from_str(json).unwrap();
        let (token, employee, pharmacy) = response.split().unwrap();

        assert_eq!(token, "t1");
        assert_eq!(serde_json::to_string(&employee).unwrap(), r#"{"id":1,"name":"A"}"#);
        assert_eq!(serde_json::to_string(&pharmacy).unwrap(), r#"{"id":9}"#);
        assert!(!employee.attributes.contains_key(PHARMACY_FIELD));
    }

    #[test]
    fn test_split_rejects_missing_pharmacy_and_empty_token() {
        let no_pharmacy: SignInResponse =
            serde_json::from_str(r#"{"token":"t1","employee":{"id":1}}"#).unwrap();
        assert!(matches!(no_pharmacy.split(), Err(ApiError::InvalidResponse(_))));

        let empty_token: SignInResponse =
            serde_json::from_str(r#"{"token":"","employee":{"id":1,"pharmacie":{"id":9}}}"#)
                .unwrap();
        assert!(matches!(empty_token.split(), Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_authenticate_posts_credentials() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"token":"t1","employee":{"id":1,"name":"A","pharmacie":{"id":9}}}"#,
        )
        .await;

        let client = ApiClient::new(&base).unwrap();
        let response = client.authenticate_employee("a@farm.com", "secret").await.unwrap();
        assert_eq!(response.token, "t1");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /sessions/employees HTTP/1.1"));
        assert!(request.ends_with(r#"{"email":"a@farm.com","password":"secret"}"#));
    }

    #[tokio::test]
    async fn test_authenticate_rejected_credentials() {
        let (base, server) = serve_once("401 Unauthorized", r#"{"error":"bad password"}"#).await;

        let client = ApiClient::new(&base).unwrap();
        let err = client.authenticate_employee("a@farm.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_authenticate_unreachable_server() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{}", addr)).unwrap();
        let err = client.authenticate_employee("a@farm.com", "x").await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkError(_)));
    }
}
