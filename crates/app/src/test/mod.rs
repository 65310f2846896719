//! Test helpers.

use std::{sync::Arc, time::Duration};

use httpmock::MockServer;
use reqwest::StatusCode;
use rust_decimal::Decimal;

use concession::{
    bundles::{Bundle, BundleId},
    money::cents,
    payments::{PaymentMethod, PaymentMethodId},
    products::{Product, ProductId, Supplier, SupplierId},
};

use crate::{
    api::{ApiClient, ApiError},
    context::AppContext,
    domain::{
        bundles::MockBundlesService, carts::MockCartsService, catalog::MockCatalogService,
        coupons::MockCouponsService, orders::MockOrdersService, payments::MockPaymentsService,
        staff::MockStaffService,
    },
    session::{CustomerId, Session},
};

pub(crate) const TEST_CUSTOMER: u64 = 42;

pub(crate) fn session() -> Session {
    Session::new(CustomerId::new(TEST_CUSTOMER))
}

pub(crate) fn api_client(server: &MockServer) -> Result<ApiClient, ApiError> {
    ApiClient::new(&server.base_url(), Duration::from_secs(5))
}

/// One mock per service. Every mock starts strict: any call not set up by the
/// test fails it.
pub(crate) struct Mocks {
    pub catalog: MockCatalogService,
    pub carts: MockCartsService,
    pub payments: MockPaymentsService,
    pub coupons: MockCouponsService,
    pub orders: MockOrdersService,
    pub staff: MockStaffService,
    pub bundles: MockBundlesService,
}

impl Mocks {
    pub(crate) fn strict() -> Self {
        Self {
            catalog: strict_catalog_mock(),
            carts: strict_carts_mock(),
            payments: strict_payments_mock(),
            coupons: strict_coupons_mock(),
            orders: strict_orders_mock(),
            staff: strict_staff_mock(),
            bundles: strict_bundles_mock(),
        }
    }

    pub(crate) fn into_context(self) -> AppContext {
        AppContext {
            catalog: Arc::new(self.catalog),
            carts: Arc::new(self.carts),
            payments: Arc::new(self.payments),
            coupons: Arc::new(self.coupons),
            orders: Arc::new(self.orders),
            staff: Arc::new(self.staff),
            bundles: Arc::new(self.bundles),
        }
    }
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_suppliers().never();
    catalog.expect_menu_products().never();
    catalog.expect_staff_products().never();
    catalog.expect_ngos().never();
    catalog.expect_coupons().never();

    catalog
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_items().never();
    carts.expect_add().never();
    carts.expect_set_quantity().never();
    carts.expect_remove().never();

    carts
}

fn strict_payments_mock() -> MockPaymentsService {
    let mut payments = MockPaymentsService::new();

    payments.expect_methods().never();
    payments.expect_add_funds().never();

    payments
}

fn strict_coupons_mock() -> MockCouponsService {
    let mut coupons = MockCouponsService::new();

    coupons.expect_puzzle().never();
    coupons.expect_apply().never();

    coupons
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_customer_showing().never();
    orders.expect_place().never();

    orders
}

fn strict_staff_mock() -> MockStaffService {
    let mut staff = MockStaffService::new();

    staff.expect_member().never();

    staff
}

fn strict_bundles_mock() -> MockBundlesService {
    let mut bundles = MockBundlesService::new();

    bundles.expect_list().never();
    bundles.expect_create().never();
    bundles.expect_update().never();
    bundles.expect_delete().never();
    bundles.expect_toggle().never();

    bundles
}

pub(crate) fn product(id: u64, unit_cents: i64, inventory: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Snack {id}"),
        unit_price: cents(unit_cents),
        inventory_quantity: inventory,
        size: None,
        keywords: Vec::new(),
        category: None,
        discount: Decimal::ZERO,
        is_available: true,
        supplier_id: Some(SupplierId::new(1)),
    }
}

pub(crate) fn supplier(id: u64) -> Supplier {
    Supplier {
        user_id: SupplierId::new(id),
        company_name: format!("Supplier {id}"),
        company_address: None,
        contact_phone: None,
        is_open: Some(true),
    }
}

pub(crate) fn bundle(id: u64, total_cents: i64) -> Bundle {
    Bundle {
        id: BundleId::new(id),
        name: format!("Bundle {id}"),
        description: String::new(),
        total_price: cents(total_cents),
        original_price: None,
        discount_percentage: None,
        is_available: true,
        items: Vec::new(),
        date_added: None,
        last_updated: None,
    }
}

pub(crate) fn payment_method(id: u64, balance_cents: i64, is_default: bool) -> PaymentMethod {
    PaymentMethod {
        id: PaymentMethodId::new(id),
        card_number: format!("411111111111{id:04}"),
        expiration_month: 12,
        expiration_year: 2030,
        balance: Some(cents(balance_cents)),
        is_default,
        billing_address: None,
    }
}

pub(crate) fn unavailable() -> ApiError {
    ApiError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: None,
    }
}
