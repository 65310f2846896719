//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info};

use concession::cart::{CartEntry, CartItemId};

use crate::{
    api::{ApiClient, ApiError},
    domain::carts::models::{AddToCart, AddToCartResponse, QuantityUpdate},
    session::Session,
};

#[derive(Debug, Deserialize)]
struct CartEnvelope {
    #[serde(default)]
    items: Vec<CartEntry>,
}

#[derive(Debug, Clone)]
pub struct HttpCartsService {
    api: ApiClient,
}

impl HttpCartsService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartsService for HttpCartsService {
    async fn items(&self, session: Session) -> Result<Vec<CartEntry>, ApiError> {
        let customer = session.segment();

        match self
            .api
            .get::<CartEnvelope>(&["customers", &customer, "cart"])
            .await
        {
            Ok(envelope) => Ok(envelope.items),
            Err(error) if error.is_not_found() => {
                debug!(%customer, "no cart on the backend yet");

                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    async fn add(&self, session: Session, item: AddToCart) -> Result<CartItemId, ApiError> {
        let customer = session.segment();

        let response: AddToCartResponse = self
            .api
            .post(&["customers", &customer, "cart"], &item)
            .await?;

        if let Some(error) = response.error {
            return Err(ApiError::Rejected(error));
        }

        let item_id = response
            .cart_item_id
            .ok_or_else(|| ApiError::Rejected("Add to cart request failed.".to_string()))?;

        info!(%customer, %item_id, "added to cart");

        Ok(item_id)
    }

    async fn set_quantity(&self, item: CartItemId, quantity: u32) -> Result<(), ApiError> {
        self.api
            .put(&["cart", &item.to_string()], &QuantityUpdate { quantity })
            .await
    }

    async fn remove(&self, item: CartItemId) -> Result<(), ApiError> {
        self.api.delete(&["cart", &item.to_string()]).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Entries in the customer's cart. A missing cart is an empty cart.
    async fn items(&self, session: Session) -> Result<Vec<CartEntry>, ApiError>;

    /// Add one unit of a product or bundle to the customer's cart.
    async fn add(&self, session: Session, item: AddToCart) -> Result<CartItemId, ApiError>;

    /// Set the quantity of a cart line.
    async fn set_quantity(&self, item: CartItemId, quantity: u32) -> Result<(), ApiError>;

    /// Delete a cart line.
    async fn remove(&self, item: CartItemId) -> Result<(), ApiError>;
}
