//! JSON-over-HTTP client for the storefront backend.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by backend requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// Response status
        status: StatusCode,

        /// `error` or `message` field of the response body, if any
        message: Option<String>,
    },

    /// The backend answered successfully but reported an `error` in the body.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid API URL: {0}")]
    Url(String),
}

impl ApiError {
    /// The backend's own message when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            }
            | ApiError::Rejected(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the backend answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

/// HTTP client bound to the backend's base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
}

impl ApiClient {
    /// Create a client for `base_url` with a global request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|error| ApiError::Url(format!("{base_url}: {error}")))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url}: not a base URL")));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, http })
    }

    /// Base URL requests are made against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for a path below the base URL. Segments are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if the base URL cannot take path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{}: not a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.get_query(segments, &[]).await
    }

    /// `GET` a JSON document with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(segments)?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let response = self.execute(self.request(Method::GET, url)).await?;

        decode(response).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or an
    /// unexpected body.
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .execute(self.request(Method::POST, url).json(body))
            .await?;

        decode(response).await
    }

    /// `POST` a JSON body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn post_unit<B>(&self, segments: &[&str], body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(segments)?;

        self.execute(self.request(Method::POST, url).json(body))
            .await
            .map(drop)
    }

    /// `PUT` a JSON body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn put<B>(&self, segments: &[&str], body: &B) -> Result<(), ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(segments)?;

        self.execute(self.request(Method::PUT, url).json(body))
            .await
            .map(drop)
    }

    /// `PATCH` with no body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn patch(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;

        self.execute(self.request(Method::PATCH, url)).await.map(drop)
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or non-success status.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;

        self.execute(self.request(Method::DELETE, url)).await.map(drop)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "backend request");

        self.http.request(method, url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.inspect_err(|error| {
            warn!(%error, "backend request failed to send");
        })?;

        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error.or(body.message));

        warn!(%status, message = message.as_deref(), "backend returned an error");

        Err(ApiError::Status { status, message })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;

    serde_json::from_str(&text).map_err(ApiError::Decode)
}
