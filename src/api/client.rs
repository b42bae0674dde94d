//! HTTP client for the catalog backend.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_DISPOSITION};
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::models::{ExportResponse, ListResponse, LoginRequest, LoginResponse, MessageResponse};
use super::CatalogBackend;

/// Message shown when the backend error payload carries no `message`.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors returned by the catalog backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Failed to reach backend: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{message} (status {status})")]
    Status { status: StatusCode, message: String },

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to parse backend response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(e)
        } else {
            ApiError::Transport(e)
        }
    }
}

impl ApiError {
    /// Status code of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A file downloaded from the backend.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    /// File name announced by the `Content-Disposition` header.
    pub file_name: Option<String>,
}

/// Client for the catalog backend REST API.
///
/// Holds the admin token explicitly; every request carries it as a bearer
/// token when present.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    restore_timeout: Duration,
}

impl ApiClient {
    /// Create a new ApiClient.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend API (e.g., "http://localhost:5000/api")
    /// * `timeout_secs` - Default request timeout in seconds
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ApiError::Transport)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: None,
            restore_timeout: Duration::from_secs(60),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_restore_timeout(mut self, timeout: Duration) -> Self {
        self.restore_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn restore_timeout(&self) -> Duration {
        self.restore_timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    // =========================================================================
    // Generic helpers
    // =========================================================================

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self.request(Method::GET, path).send().await?;
        decode_json(ensure_success(response).await?).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self.request(Method::POST, path).json(body).send().await?;
        decode_json(ensure_success(response).await?).await
    }

    /// GET a `{ success, data }` listing and unwrap its data.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response: ListResponse<T> = self.get_json(path).await?;
        if !response.success {
            return Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            ));
        }
        Ok(response.data)
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("PUT {}", path);
        let response = self.request(Method::PUT, path).json(body).send().await?;
        decode_json(ensure_success(response).await?).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("DELETE {}", path);
        let response = self.request(Method::DELETE, path).send().await?;
        decode_json(ensure_success(response).await?).await
    }

    /// Upload `bytes` as the multipart field `file`.
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create multipart: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        debug!("POST {} (multipart, file {})", path, file_name);
        let mut builder = self.request(Method::POST, path).multipart(form);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder.send().await?;
        decode_json(ensure_success(response).await?).await
    }

    /// Download a binary file, keeping the server-suggested file name.
    pub async fn download(&self, path: &str) -> Result<Download, ApiError> {
        debug!("GET {} (download)", path);
        let response = ensure_success(self.request(Method::GET, path).send().await?).await?;
        let file_name = file_name_from_headers(response.headers());
        let bytes = response.bytes().await?.to_vec();
        Ok(Download { bytes, file_name })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange admin credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response: LoginResponse = self
            .post_json("/auth/login", &LoginRequest { email, password })
            .await?;

        match response.token {
            Some(token) if response.success && !token.is_empty() => Ok(token),
            _ => Err(ApiError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Invalid Credentials".to_string()),
            )),
        }
    }
}

#[async_trait]
impl CatalogBackend for ApiClient {
    async fn fetch_export(&self) -> Result<ExportResponse, ApiError> {
        self.get_json("/backup/export").await
    }

    async fn upload_restore(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<MessageResponse, ApiError> {
        self.post_file(
            "/backup/restore",
            file_name,
            bytes,
            Some(self.restore_timeout),
        )
        .await
    }
}

/// Turn a non-success response into [`ApiError::Status`].
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        message: error_message(&body),
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract the `message` field of a backend error payload.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

lazy_static! {
    static ref FILENAME_RE: Regex = Regex::new(r#"filename="?([^";]+)"?"#).unwrap();
}

/// Parse the file name out of a `Content-Disposition` header value.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    FILENAME_RE
        .captures(value)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn file_name_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_disposition)
}
