//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiError},
    config::ApiConfig,
    domain::{
        bundles::{BundlesService, HttpBundlesService},
        carts::{CartsService, HttpCartsService},
        catalog::{CatalogService, HttpCatalogService},
        coupons::{CouponsService, HttpCouponsService},
        orders::{HttpOrdersService, OrdersService},
        payments::{HttpPaymentsService, PaymentsService},
        staff::{HttpStaffService, StaffService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build backend client")]
    Api(#[source] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub payments: Arc<dyn PaymentsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub staff: Arc<dyn StaffService>,
    pub bundles: Arc<dyn BundlesService>,
}

impl AppContext {
    /// Build application context from backend settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let api = ApiClient::new(&config.api_base_url, config.timeout()).map_err(AppInitError::Api)?;

        Ok(Self::from_api(&api))
    }

    /// Build application context over an existing client.
    #[must_use]
    pub fn from_api(api: &ApiClient) -> Self {
        Self {
            catalog: Arc::new(HttpCatalogService::new(api.clone())),
            carts: Arc::new(HttpCartsService::new(api.clone())),
            payments: Arc::new(HttpPaymentsService::new(api.clone())),
            coupons: Arc::new(HttpCouponsService::new(api.clone())),
            orders: Arc::new(HttpOrdersService::new(api.clone())),
            staff: Arc::new(HttpStaffService::new(api.clone())),
            bundles: Arc::new(HttpBundlesService::new(api.clone())),
        }
    }
}
