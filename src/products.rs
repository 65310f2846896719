//! Products & Suppliers

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedId,
    money::{Amount, wire},
};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Supplier user id
pub type SupplierId = TypedId<Supplier>;

/// Snack supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// The supplier's user id, referenced by [`Product::supplier_id`].
    pub user_id: SupplierId,

    /// Display name
    pub company_name: String,

    /// Postal address
    #[serde(default)]
    pub company_address: Option<String>,

    /// Contact phone number
    #[serde(default)]
    pub contact_phone: Option<String>,

    /// Whether the supplier is currently taking orders
    #[serde(default)]
    pub is_open: Option<bool>,
}

/// Product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Price of a single unit
    #[serde(with = "wire::amount")]
    pub unit_price: Amount,

    /// Units in stock
    #[serde(default)]
    pub inventory_quantity: u32,

    /// Pack size label
    #[serde(default)]
    pub size: Option<String>,

    /// Search keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Menu category
    #[serde(default)]
    pub category: Option<String>,

    /// Discount as a fraction of the unit price (`0.1` is 10%)
    #[serde(default, with = "wire::decimal")]
    pub discount: Decimal,

    /// Whether the product can currently be ordered
    #[serde(default)]
    pub is_available: bool,

    /// Supplier that stocks the product
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
}

impl Product {
    /// Whether the product can be added to a cart right now.
    pub fn can_add_to_cart(&self) -> bool {
        self.is_available && self.inventory_quantity > 0
    }

    /// Availability badge text.
    pub fn availability_label(&self) -> &'static str {
        if self.is_available {
            "Available"
        } else {
            "Out of Stock"
        }
    }

    /// Add-to-cart button text.
    pub fn cart_button_label(&self) -> &'static str {
        if self.inventory_quantity == 0 {
            "Sold Out"
        } else {
            "Add to Cart"
        }
    }

    /// Discount in percent points.
    pub fn discount_points(&self) -> Decimal {
        self.discount * Decimal::ONE_HUNDRED
    }
}

/// Supplier names keyed by supplier user id.
#[derive(Debug, Clone, Default)]
pub struct SupplierDirectory {
    names: FxHashMap<SupplierId, String>,
}

impl SupplierDirectory {
    /// Build the directory from a supplier listing.
    pub fn new(suppliers: &[Supplier]) -> Self {
        Self {
            names: suppliers
                .iter()
                .map(|supplier| (supplier.user_id, supplier.company_name.clone()))
                .collect(),
        }
    }

    /// Company name for a supplier id, if known.
    pub fn name(&self, supplier: SupplierId) -> Option<&str> {
        self.names.get(&supplier).map(String::as_str)
    }

    /// Number of known suppliers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no suppliers are known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A product paired with its supplier's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuProduct {
    /// The product record
    pub product: Product,

    /// Supplier company name
    pub supplier_name: String,
}

/// Attach supplier names to products, hiding products whose supplier is unknown.
pub fn menu_products(products: Vec<Product>, suppliers: &SupplierDirectory) -> Vec<MenuProduct> {
    products
        .into_iter()
        .filter_map(|product| {
            let supplier_name = product
                .supplier_id
                .and_then(|id| suppliers.name(id))?
                .to_string();

            Some(MenuProduct {
                product,
                supplier_name,
            })
        })
        .collect()
}

/// Find a product by id.
pub fn find_product(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|product| product.id == id)
}

#[cfg(test)]
pub(crate) mod tests {
    use testresult::TestResult;

    use crate::money::cents;

    use super::*;

    pub(crate) fn product(id: u64, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Snack {id}"),
            unit_price: cents(price_cents),
            inventory_quantity: 10,
            size: None,
            keywords: Vec::new(),
            category: None,
            discount: Decimal::ZERO,
            is_available: true,
            supplier_id: Some(SupplierId::new(1)),
        }
    }

    fn supplier(id: u64, name: &str) -> Supplier {
        Supplier {
            user_id: SupplierId::new(id),
            company_name: name.to_string(),
            company_address: None,
            contact_phone: None,
            is_open: Some(true),
        }
    }

    #[test]
    fn product_deserializes_sparse_menu_record() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{"id": 7, "name": "Popcorn", "unit_price": "4.5", "supplier_id": 2, "discount": 0.1}"#,
        )?;

        assert_eq!(product.unit_price, cents(450));
        assert_eq!(product.inventory_quantity, 0);
        assert_eq!(product.discount_points(), Decimal::new(100, 1));
        assert!(!product.can_add_to_cart());

        Ok(())
    }

    #[test]
    fn sold_out_products_cannot_be_added() {
        let mut snack = product(1, 100);
        snack.inventory_quantity = 0;

        assert!(!snack.can_add_to_cart());
        assert_eq!(snack.cart_button_label(), "Sold Out");
        assert_eq!(snack.availability_label(), "Available");
    }

    #[test]
    fn menu_products_hide_unknown_suppliers() {
        let directory = SupplierDirectory::new(&[supplier(1, "Acme Snacks")]);

        let mut orphan = product(2, 200);
        orphan.supplier_id = Some(SupplierId::new(99));

        let mut unassigned = product(3, 300);
        unassigned.supplier_id = None;

        let menu = menu_products(vec![product(1, 100), orphan, unassigned], &directory);

        assert_eq!(menu.len(), 1);
        assert_eq!(menu.first().map(|m| m.supplier_name.as_str()), Some("Acme Snacks"));
    }
}
