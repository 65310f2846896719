//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use concession::{
    coupons::CouponListing,
    donations::Ngo,
    products::{Product, Supplier},
};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct SuppliersEnvelope {
    suppliers: Vec<Supplier>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct NgosEnvelope {
    #[serde(default)]
    ngos: Vec<Ngo>,
}

#[derive(Debug, Deserialize)]
struct CouponsEnvelope {
    #[serde(default)]
    coupons: Vec<CouponListing>,
}

#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    api: ApiClient,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        let envelope: SuppliersEnvelope = self.api.get(&["suppliers", "all"]).await?;

        Ok(envelope.suppliers)
    }

    async fn menu_products(&self) -> Result<Vec<Product>, ApiError> {
        let envelope: ProductsEnvelope = self.api.get(&["products", "menu"]).await?;

        Ok(envelope.products)
    }

    async fn staff_products(&self) -> Result<Vec<Product>, ApiError> {
        let envelope: ProductsEnvelope = self.api.get(&["customers", "products"]).await?;

        Ok(envelope.products)
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, ApiError> {
        let envelope: NgosEnvelope = self.api.get(&["ngos"]).await?;

        Ok(envelope.ngos)
    }

    async fn coupons(&self) -> Result<Vec<CouponListing>, ApiError> {
        let envelope: CouponsEnvelope = self.api.get(&["coupons"]).await?;

        Ok(envelope.coupons)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All suppliers.
    async fn suppliers(&self) -> Result<Vec<Supplier>, ApiError>;

    /// Products shown on the customer menu.
    async fn menu_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Products staff can put into bundles.
    async fn staff_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Charities accepting donations.
    async fn ngos(&self) -> Result<Vec<Ngo>, ApiError>;

    /// Coupons on offer.
    async fn coupons(&self) -> Result<Vec<CouponListing>, ApiError>;
}
