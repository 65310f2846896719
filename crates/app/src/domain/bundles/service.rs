//! Bundles service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use tracing::info;

use concession::bundles::{Bundle, BundleId, BundlePayload};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct BundlesEnvelope {
    #[serde(default)]
    bundles: Vec<Bundle>,
}

#[derive(Debug, Clone)]
pub struct HttpBundlesService {
    api: ApiClient,
}

impl HttpBundlesService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BundlesService for HttpBundlesService {
    async fn list(&self, include_unavailable: bool) -> Result<Vec<Bundle>, ApiError> {
        let envelope: BundlesEnvelope = if include_unavailable {
            self.api
                .get_query(&["bundles"], &[("include_unavailable", "true")])
                .await?
        } else {
            self.api.get(&["bundles"]).await?
        };

        Ok(envelope.bundles)
    }

    async fn create(&self, bundle: &BundlePayload) -> Result<(), ApiError> {
        self.api.post_unit(&["bundles"], bundle).await?;

        info!(name = bundle.name, "bundle created");

        Ok(())
    }

    async fn update(&self, id: BundleId, bundle: &BundlePayload) -> Result<(), ApiError> {
        self.api.put(&["bundles", &id.to_string()], bundle).await?;

        info!(%id, name = bundle.name, "bundle updated");

        Ok(())
    }

    async fn delete(&self, id: BundleId) -> Result<(), ApiError> {
        self.api.delete(&["bundles", &id.to_string()]).await?;

        info!(%id, "bundle deleted");

        Ok(())
    }

    async fn toggle(&self, id: BundleId) -> Result<(), ApiError> {
        self.api.patch(&["bundles", &id.to_string(), "toggle"]).await
    }
}

#[automock]
#[async_trait]
pub trait BundlesService: Send + Sync {
    /// Bundles on offer; staff also see unavailable ones.
    async fn list(&self, include_unavailable: bool) -> Result<Vec<Bundle>, ApiError>;

    /// Create a bundle.
    async fn create(&self, bundle: &BundlePayload) -> Result<(), ApiError>;

    /// Replace a bundle's name, description and lines.
    async fn update(&self, id: BundleId, bundle: &BundlePayload) -> Result<(), ApiError>;

    /// Delete a bundle.
    async fn delete(&self, id: BundleId) -> Result<(), ApiError>;

    /// Flip a bundle's availability.
    async fn toggle(&self, id: BundleId) -> Result<(), ApiError>;
}
