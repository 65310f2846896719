//! Cart
//!
//! The backend stores cart entries as bare ids. A [`Cart`] joins them to the
//! loaded catalog so each line has a name and a price.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    bundles::{Bundle, BundleId, find_bundle},
    ids::TypedId,
    money::{self, Amount, PricingError},
    products::{Product, ProductId, find_product},
};

/// Cart item id
pub type CartItemId = TypedId<CartEntry>;

/// A cart row as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Cart item id
    pub id: CartItemId,

    /// Product on this row, if it is a product row
    #[serde(default)]
    pub product_id: Option<ProductId>,

    /// Bundle on this row, if it is a bundle row
    #[serde(default)]
    pub bundle_id: Option<BundleId>,

    /// Units ordered
    pub quantity: u32,
}

/// The catalog record behind a cart line.
#[derive(Debug, Clone, PartialEq)]
pub enum CartLine {
    /// A single product
    Product(Product),

    /// A bundle of products
    Bundle(Bundle),
}

impl CartLine {
    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            CartLine::Product(product) => &product.name,
            CartLine::Bundle(bundle) => &bundle.name,
        }
    }

    /// Price of one unit of this line.
    pub fn unit_price(&self) -> Amount {
        match self {
            CartLine::Product(product) => product.unit_price,
            CartLine::Bundle(bundle) => bundle.total_price,
        }
    }

    /// Short kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            CartLine::Product(_) => "Product",
            CartLine::Bundle(_) => "Bundle",
        }
    }
}

/// A cart entry joined to its catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Cart item id
    pub item_id: CartItemId,

    /// Units ordered
    pub quantity: u32,

    /// Catalog record
    pub line: CartLine,
}

impl CartItem {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in cents.
    pub fn line_total(&self) -> Result<Amount, PricingError> {
        money::line_total(&self.line.unit_price(), self.quantity)
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Join backend entries to catalog records. Entries that reference
    /// nothing in the catalog are dropped.
    pub fn reconcile(entries: &[CartEntry], products: &[Product], bundles: &[Bundle]) -> Self {
        let items = entries
            .iter()
            .filter_map(|entry| {
                let line = match (entry.product_id, entry.bundle_id) {
                    (Some(product_id), _) => {
                        find_product(products, product_id).cloned().map(CartLine::Product)
                    }
                    (None, Some(bundle_id)) => {
                        find_bundle(bundles, bundle_id).cloned().map(CartLine::Bundle)
                    }
                    (None, None) => None,
                };

                if line.is_none() {
                    warn!(
                        item_id = %entry.id,
                        product_id = ?entry.product_id,
                        bundle_id = ?entry.bundle_id,
                        "dropping cart entry missing from catalog"
                    );
                }

                line.map(|line| CartItem {
                    item_id: entry.id,
                    quantity: entry.quantity,
                    line,
                })
            })
            .collect();

        Self { items }
    }

    /// Sum of line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was an overflow or currency mismatch.
    pub fn subtotal(&self) -> Result<Amount, PricingError> {
        let lines = self
            .items
            .iter()
            .map(CartItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;

        money::total_price(lines)
    }

    /// Find an item by its cart item id.
    pub fn get(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Iterate over the items in the cart.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get the number of items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors raised when editing cart lines.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity does not fit a cart line.
    #[error("Quantity {0} is too large.")]
    QuantityTooLarge(i64),
}

/// What a requested quantity means for a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// Set the line to this many units
    Update(u32),

    /// Delete the line (needs confirmation first)
    Remove,
}

impl QuantityChange {
    /// Classify a requested quantity. Anything below 1 is a removal.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityTooLarge`] if the quantity does not fit in
    /// a `u32`.
    pub fn for_request(requested: i64) -> Result<Self, CartError> {
        if requested < 1 {
            return Ok(QuantityChange::Remove);
        }

        u32::try_from(requested)
            .ok()
            .map(QuantityChange::Update)
            .ok_or(CartError::QuantityTooLarge(requested))
    }
}
