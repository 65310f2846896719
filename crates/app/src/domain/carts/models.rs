//! Cart Models

use serde::{Deserialize, Serialize};

use concession::{bundles::BundleId, cart::CartItemId, products::ProductId};

/// Body for `POST /customers/{id}/cart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddToCart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<BundleId>,

    pub quantity: u32,
}

impl AddToCart {
    /// One unit of a product.
    pub fn product(id: ProductId) -> Self {
        Self {
            product_id: Some(id),
            bundle_id: None,
            quantity: 1,
        }
    }

    /// One unit of a bundle.
    pub fn bundle(id: BundleId) -> Self {
        Self {
            product_id: None,
            bundle_id: Some(id),
            quantity: 1,
        }
    }
}

/// Body for `PUT /cart/{item}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct QuantityUpdate {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddToCartResponse {
    #[serde(default)]
    pub cart_item_id: Option<CartItemId>,

    #[serde(default)]
    pub error: Option<String>,
}
