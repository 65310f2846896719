//! Snack Bundles
//!
//! Bundles are priced by the backend at a fixed 20% off the sum of their
//! products' unit prices. Staff assemble bundles through a [`BundleDraft`],
//! which is validated locally before anything is sent.

use jiff::civil::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    ids::TypedId,
    money::{self, Amount, PricingError, wire},
    products::{Product, ProductId, find_product},
};

/// Bundle Id
pub type BundleId = TypedId<Bundle>;

/// Share of the original price that the backend takes off every bundle.
pub const BUNDLE_DISCOUNT_POINTS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// A product line inside a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleItem {
    /// Product in the bundle
    pub product_id: ProductId,

    /// Product name, when the backend joined it in
    #[serde(default)]
    pub product_name: Option<String>,

    /// Units of the product
    pub quantity: u32,

    /// Product unit price, when the backend joined it in
    #[serde(default, with = "wire::option_amount")]
    pub unit_price: Option<Amount>,
}

/// Snack Bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Bundle id
    pub id: BundleId,

    /// Bundle name
    pub name: String,

    /// Bundle description
    #[serde(default)]
    pub description: String,

    /// Discounted price charged per bundle
    #[serde(with = "wire::amount")]
    pub total_price: Amount,

    /// Sum of the products' prices before the bundle discount
    #[serde(default, with = "wire::option_amount")]
    pub original_price: Option<Amount>,

    /// Discount percent points advertised by the backend
    #[serde(default, with = "wire::option_decimal")]
    pub discount_percentage: Option<Decimal>,

    /// Whether customers can order the bundle
    #[serde(default = "available")]
    pub is_available: bool,

    /// Product lines
    #[serde(default)]
    pub items: Vec<BundleItem>,

    /// Creation time (backend local time)
    #[serde(default)]
    pub date_added: Option<DateTime>,

    /// Last modification time (backend local time)
    #[serde(default)]
    pub last_updated: Option<DateTime>,
}

fn available() -> bool {
    true
}

impl Bundle {
    /// Amount saved against the original price, when known.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] on a currency mismatch.
    pub fn savings(&self) -> Result<Option<Amount>, PricingError> {
        self.original_price
            .map(|original| original.sub(self.total_price).map(money::non_negative))
            .transpose()
            .map_err(PricingError::from)
    }
}

/// Find a bundle by id.
pub fn find_bundle(bundles: &[Bundle], id: BundleId) -> Option<&Bundle> {
    bundles.iter().find(|bundle| bundle.id == id)
}

/// Errors raised while editing or validating a bundle draft.
#[derive(Debug, Error, PartialEq)]
pub enum BundleDraftError {
    /// The bundle has no name.
    #[error("Bundle name is required")]
    MissingName,

    /// The bundle has no product lines.
    #[error("Bundle must contain at least one product")]
    NoProducts,

    /// A product line has a zero quantity.
    #[error("Quantity for product {0} must be at least 1")]
    ZeroQuantity(ProductId),

    /// A line index is out of range.
    #[error("No product line at position {0}")]
    NoSuchLine(usize),

    /// There are no catalog products to add.
    #[error("No products available to add")]
    EmptyCatalog,

    /// Money arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A product line in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Product id
    pub product_id: ProductId,

    /// Units of the product
    pub quantity: u32,
}

/// Staff bundle form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleDraft {
    /// Bundle being edited, `None` when creating
    pub editing: Option<BundleId>,

    /// Bundle name
    pub name: String,

    /// Bundle description
    pub description: String,

    lines: SmallVec<[DraftLine; 8]>,
}

/// Body sent to create or update a bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlePayload {
    /// Bundle name
    pub name: String,

    /// Bundle description
    pub description: String,

    /// Sum of unit prices before the bundle discount
    #[serde(with = "wire::amount")]
    pub original_price: Amount,

    /// Product lines
    pub product_items: Vec<DraftLine>,
}

impl BundleDraft {
    /// An empty draft for a new bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft pre-filled from an existing bundle.
    pub fn edit(bundle: &Bundle) -> Self {
        Self {
            editing: Some(bundle.id),
            name: bundle.name.clone(),
            description: bundle.description.clone(),
            lines: bundle
                .items
                .iter()
                .map(|item| DraftLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Product lines in order.
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Append a line for the first catalog product with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`BundleDraftError::EmptyCatalog`] when there is nothing to add.
    pub fn add_line(&mut self, catalog: &[Product]) -> Result<(), BundleDraftError> {
        let first = catalog.first().ok_or(BundleDraftError::EmptyCatalog)?;

        self.lines.push(DraftLine {
            product_id: first.id,
            quantity: 1,
        });

        Ok(())
    }

    /// Append a line as given.
    pub fn push_line(&mut self, line: DraftLine) {
        self.lines.push(line);
    }

    /// Drop every line.
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BundleDraftError::NoSuchLine`] for an out-of-range index.
    pub fn remove_line(&mut self, index: usize) -> Result<DraftLine, BundleDraftError> {
        if index >= self.lines.len() {
            return Err(BundleDraftError::NoSuchLine(index));
        }

        Ok(self.lines.remove(index))
    }

    /// Point the line at `index` to another product.
    ///
    /// # Errors
    ///
    /// Returns [`BundleDraftError::NoSuchLine`] for an out-of-range index.
    pub fn set_product(&mut self, index: usize, product: ProductId) -> Result<(), BundleDraftError> {
        self.line_mut(index)?.product_id = product;

        Ok(())
    }

    /// Change the quantity of the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BundleDraftError::NoSuchLine`] for an out-of-range index.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), BundleDraftError> {
        self.line_mut(index)?.quantity = quantity;

        Ok(())
    }

    fn line_mut(&mut self, index: usize) -> Result<&mut DraftLine, BundleDraftError> {
        self.lines
            .get_mut(index)
            .ok_or(BundleDraftError::NoSuchLine(index))
    }

    /// Sum of catalog unit prices times quantities. Lines for products missing
    /// from the catalog count as zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the arithmetic overflows.
    pub fn original_price(&self, catalog: &[Product]) -> Result<Amount, PricingError> {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                find_product(catalog, line.product_id)
                    .map(|product| money::line_total(&product.unit_price, line.quantity))
            })
            .collect::<Result<SmallVec<[Amount; 8]>, _>>()?;

        money::total_price(lines)
    }

    /// Price customers will pay once the bundle discount is applied.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the arithmetic overflows.
    pub fn discounted_price(&self, catalog: &[Product]) -> Result<Amount, PricingError> {
        let original = self.original_price(catalog)?;
        let discount = money::percent_of(&original, money::percent_points(BUNDLE_DISCOUNT_POINTS))?;

        Ok(original.sub(discount)?)
    }

    /// Validate the draft and build the request body.
    ///
    /// # Errors
    ///
    /// Returns a [`BundleDraftError`] when the draft is incomplete.
    pub fn payload(&self, catalog: &[Product]) -> Result<BundlePayload, BundleDraftError> {
        if self.name.trim().is_empty() {
            return Err(BundleDraftError::MissingName);
        }

        if self.lines.is_empty() {
            return Err(BundleDraftError::NoProducts);
        }

        if let Some(line) = self.lines.iter().find(|line| line.quantity == 0) {
            return Err(BundleDraftError::ZeroQuantity(line.product_id));
        }

        Ok(BundlePayload {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            original_price: self.original_price(catalog)?,
            product_items: self.lines.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{money::cents, products::tests::product};

    use super::*;

    fn catalog() -> Vec<Product> {
        vec![product(1, 250), product(2, 400)]
    }

    #[test]
    fn bundle_deserializes_backend_listing() -> TestResult {
        let bundle: Bundle = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Movie Night",
            "description": "Popcorn and soda",
            "original_price": 10.0,
            "total_price": 8.0,
            "discount_percentage": 20.0,
            "is_available": true,
            "items": [{"product_id": 1, "product_name": "Popcorn", "quantity": 2, "unit_price": 5.0}],
            "date_added": "2025-03-01T18:30:00.123456",
            "last_updated": null
        }))?;

        assert_eq!(bundle.total_price, cents(800));
        assert_eq!(bundle.savings()?, Some(cents(200)));
        assert_eq!(bundle.items.len(), 1);
        assert!(bundle.date_added.is_some());

        Ok(())
    }

    #[test]
    fn draft_prices_lines_from_catalog() -> TestResult {
        let catalog = catalog();
        let mut draft = BundleDraft::new();

        draft.add_line(&catalog)?;
        draft.add_line(&catalog)?;
        draft.set_product(1, ProductId::new(2))?;
        draft.set_quantity(1, 2)?;

        assert_eq!(draft.original_price(&catalog)?, cents(1_050));
        assert_eq!(draft.discounted_price(&catalog)?, cents(840));

        Ok(())
    }

    #[test]
    fn draft_ignores_products_missing_from_catalog() -> TestResult {
        let catalog = catalog();
        let mut draft = BundleDraft::new();

        draft.add_line(&catalog)?;
        draft.set_product(0, ProductId::new(99))?;

        assert_eq!(draft.original_price(&catalog)?, cents(0));

        Ok(())
    }

    #[test]
    fn payload_requires_name_and_lines() -> TestResult {
        let catalog = catalog();
        let mut draft = BundleDraft::new();

        assert_eq!(draft.payload(&catalog), Err(BundleDraftError::MissingName));

        draft.name = "Combo".to_string();
        assert_eq!(draft.payload(&catalog), Err(BundleDraftError::NoProducts));

        draft.add_line(&catalog)?;
        draft.set_quantity(0, 0)?;
        assert_eq!(
            draft.payload(&catalog),
            Err(BundleDraftError::ZeroQuantity(ProductId::new(1)))
        );

        draft.set_quantity(0, 3)?;
        let payload = draft.payload(&catalog)?;

        assert_eq!(payload.original_price, cents(750));
        assert_eq!(payload.product_items.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_line_rejects_bad_index() {
        let mut draft = BundleDraft::new();

        assert_eq!(draft.remove_line(0), Err(BundleDraftError::NoSuchLine(0)));
    }

    #[test]
    fn add_line_needs_a_catalog() {
        let mut draft = BundleDraft::new();

        assert_eq!(draft.add_line(&[]), Err(BundleDraftError::EmptyCatalog));
    }

    #[test]
    fn editing_a_bundle_copies_its_lines() {
        let bundle = Bundle {
            id: BundleId::new(5),
            name: "Duo".to_string(),
            description: String::new(),
            total_price: cents(800),
            original_price: Some(cents(1_000)),
            discount_percentage: None,
            is_available: true,
            items: vec![BundleItem {
                product_id: ProductId::new(2),
                product_name: None,
                quantity: 2,
                unit_price: None,
            }],
            date_added: None,
            last_updated: None,
        };

        let draft = BundleDraft::edit(&bundle);

        assert_eq!(draft.editing, Some(BundleId::new(5)));
        assert_eq!(
            draft.lines(),
            &[DraftLine {
                product_id: ProductId::new(2),
                quantity: 2
            }]
        );
    }
}
