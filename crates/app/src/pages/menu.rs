//! Menu page.

use std::io;

use tracing::{debug, error, info};

use concession::{
    bundles::{Bundle, BundleDraft, BundleId, find_bundle},
    products::{self, MenuProduct, Product, ProductId, SupplierDirectory},
    receipt,
};

use crate::{
    api::retry::{RetryPolicy, with_backoff},
    context::AppContext,
    domain::carts::models::AddToCart,
    pages::{Feedback, PageError, submit_draft},
    prompt::Prompt,
    session::Session,
};

/// Product and bundle browsing, with bundle administration for admins.
pub struct MenuPage {
    ctx: AppContext,
    session: Session,
    retry: RetryPolicy,
    products: Vec<MenuProduct>,
    bundles: Vec<Bundle>,
    is_admin: bool,
    feedback: Feedback,

    /// Admin bundle form
    pub draft: BundleDraft,
}

impl MenuPage {
    /// Menu page with the default catalog retry policy.
    #[must_use]
    pub fn new(ctx: AppContext, session: Session) -> Self {
        Self::with_retry(ctx, session, RetryPolicy::default())
    }

    #[must_use]
    pub fn with_retry(ctx: AppContext, session: Session, retry: RetryPolicy) -> Self {
        Self {
            ctx,
            session,
            retry,
            products: Vec::new(),
            bundles: Vec::new(),
            is_admin: false,
            feedback: Feedback::default(),
            draft: BundleDraft::new(),
        }
    }

    /// Products with a known supplier.
    pub fn products(&self) -> &[MenuProduct] {
        &self.products
    }

    /// Orderable bundles.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Whether the customer may manage bundles.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    /// Load suppliers, products and bundles, then check the admin role.
    /// Without suppliers every product is hidden.
    pub async fn mount(&mut self) {
        self.feedback.clear_banner();

        let result = self.load_products().await;
        self.feedback.record(result);

        self.reload_bundles().await;
        self.check_admin().await;
    }

    async fn load_products(&mut self) -> Result<(), PageError> {
        let catalog = &self.ctx.catalog;

        let suppliers = with_backoff(self.retry, "fetch suppliers", || catalog.suppliers())
            .await
            .inspect_err(|error| error!(%error, "Failed to fetch suppliers"))
            .unwrap_or_default();

        let fetched = with_backoff(self.retry, "fetch products", || catalog.menu_products())
            .await
            .map_err(|error| PageError::api(error, "Failed to fetch products."))?;

        let total = fetched.len();
        self.products = products::menu_products(fetched, &SupplierDirectory::new(&suppliers));

        info!(total, shown = self.products.len(), "menu loaded");

        Ok(())
    }

    /// Re-fetch the orderable bundles.
    pub async fn reload_bundles(&mut self) {
        let bundles = &self.ctx.bundles;
        let result = with_backoff(self.retry, "fetch bundles", || bundles.list(false))
            .await
            .map_err(|error| PageError::api(error, "Failed to fetch bundles."));

        if let Some(bundles) = self.feedback.record(result) {
            self.bundles = bundles;
        }
    }

    async fn check_admin(&mut self) {
        self.is_admin = match self.ctx.staff.member(self.session).await {
            Ok(member) => member.is_admin(),
            Err(error) => {
                debug!(%error, "not staff");

                false
            }
        };
    }

    /// Put one unit of a product in the cart.
    pub async fn add_product(&mut self, id: ProductId) {
        self.feedback.clear_banner();

        let result = self.try_add_product(id).await;

        if self.feedback.record(result).is_some() {
            self.feedback.notify("Product added to cart!");
        }
    }

    async fn try_add_product(&self, id: ProductId) -> Result<(), PageError> {
        let product = self
            .products
            .iter()
            .map(|entry| &entry.product)
            .find(|product| product.id == id)
            .ok_or(PageError::UnknownProduct(id))?;

        if !product.can_add_to_cart() {
            return Err(PageError::SoldOut(product.name.clone()));
        }

        self.ctx
            .carts
            .add(self.session, AddToCart::product(id))
            .await
            .map_err(|error| {
                PageError::api(error, "Add to cart request failed.")
                    .prefixed("Failed to add product to cart")
            })?;

        Ok(())
    }

    /// Put one bundle in the cart.
    pub async fn add_bundle(&mut self, id: BundleId) {
        self.feedback.clear_banner();

        let result = self.try_add_bundle(id).await;

        if let Some(name) = self.feedback.record(result) {
            self.feedback.notify(format!("Bundle \"{name}\" added to cart!"));
        }
    }

    async fn try_add_bundle(&self, id: BundleId) -> Result<String, PageError> {
        let bundle = find_bundle(&self.bundles, id).ok_or(PageError::UnknownBundle(id))?;

        self.ctx
            .carts
            .add(self.session, AddToCart::bundle(id))
            .await
            .map_err(|error| {
                PageError::api(error, "Failed to add bundle to cart")
                    .prefixed("Failed to add bundle to cart")
            })?;

        Ok(bundle.name.clone())
    }

    /// Load a bundle into the admin form.
    pub fn edit_bundle(&mut self, id: BundleId) {
        self.feedback.clear_banner();

        if let Some(bundle) = find_bundle(&self.bundles, id) {
            self.draft = BundleDraft::edit(bundle);
        } else {
            self.feedback.record::<()>(Err(PageError::UnknownBundle(id)));
        }
    }

    /// Create or update the drafted bundle, then reload the bundles.
    pub async fn save_bundle(&mut self) {
        self.feedback.clear_banner();

        let (action, fallback) = if self.draft.editing.is_some() {
            ("Error updating bundle", "Failed to update bundle")
        } else {
            ("Error creating bundle", "Failed to create bundle")
        };

        let result = self
            .try_save_bundle(fallback)
            .await
            .map_err(|error| error.prefixed(action));

        if let Some(notice) = self.feedback.record(result) {
            self.feedback.notify(notice);
            self.draft = BundleDraft::new();
            self.reload_bundles().await;
        }
    }

    async fn try_save_bundle(&self, fallback: &str) -> Result<&'static str, PageError> {
        if !self.is_admin {
            return Err(PageError::NotAdmin);
        }

        let catalog = self.catalog();

        submit_draft(self.ctx.bundles.as_ref(), &self.draft, &catalog, fallback).await
    }

    /// Delete a bundle after confirmation, then reload the bundles.
    pub async fn delete_bundle(&mut self, id: BundleId, prompt: &dyn Prompt) {
        self.feedback.clear_banner();

        if !self.is_admin {
            self.feedback.record::<()>(Err(PageError::NotAdmin));

            return;
        }

        if !prompt.confirm("Are you sure you want to delete this bundle?") {
            return;
        }

        let result = self
            .ctx
            .bundles
            .delete(id)
            .await
            .map_err(|error| {
                PageError::api(error, "Failed to delete bundle").prefixed("Error deleting bundle")
            });

        if self.feedback.record(result).is_some() {
            self.feedback.notify("Bundle deleted successfully!");
            self.reload_bundles().await;
        }
    }

    /// Print the page.
    ///
    /// # Errors
    ///
    /// Returns a [`PageError`] if the output cannot be written.
    pub fn render(&self, out: impl io::Write) -> Result<(), PageError> {
        receipt::write_menu(out, &self.products, &self.bundles)?;

        Ok(())
    }

    fn catalog(&self) -> Vec<Product> {
        self.products
            .iter()
            .map(|entry| entry.product.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;
    use tokio::time::Instant;

    use concession::{cart::CartItemId, money::cents, staff::StaffMember};

    use crate::{
        domain::{
            bundles::MockBundlesService, carts::MockCartsService, catalog::MockCatalogService,
            staff::MockStaffService,
        },
        prompt::MockPrompt,
        test::{Mocks, bundle, product, session, supplier, unavailable},
    };

    use super::*;

    fn staff_returning(role: &'static str) -> MockStaffService {
        let mut staff = MockStaffService::new();

        staff.expect_member().once().return_once(move |_| {
            Ok(StaffMember {
                user_id: Some(42),
                role: role.to_string(),
            })
        });

        staff
    }

    fn bundles_listing(times: usize) -> MockBundlesService {
        let mut bundles = MockBundlesService::new();

        bundles
            .expect_list()
            .times(times)
            .withf(|include_unavailable| !include_unavailable)
            .returning(|_| Ok(vec![bundle(4, 1_200)]));

        bundles
    }

    fn loaded(mocks: Mocks, is_admin: bool) -> MenuPage {
        let mut page = MenuPage::new(mocks.into_context(), session());

        page.products = vec![
            MenuProduct {
                product: product(1, 500, 10),
                supplier_name: "Supplier 1".to_string(),
            },
            MenuProduct {
                product: product(2, 300, 0),
                supplier_name: "Supplier 1".to_string(),
            },
        ];
        page.bundles = vec![bundle(4, 1_200)];
        page.is_admin = is_admin;

        page
    }

    #[tokio::test(start_paused = true)]
    async fn mount_retries_and_hides_unknown_suppliers() -> TestResult {
        let mut mocks = Mocks::strict();
        mocks.catalog = MockCatalogService::new();

        let mut attempts = 0;
        mocks.catalog.expect_suppliers().times(3).returning(move || {
            attempts += 1;

            if attempts < 3 {
                Err(unavailable())
            } else {
                Ok(vec![supplier(1)])
            }
        });
        mocks.catalog.expect_menu_products().once().return_once(|| {
            let mut orphan = product(2, 300, 5);
            orphan.supplier_id = Some(concession::products::SupplierId::new(9));

            Ok(vec![product(1, 500, 10), orphan])
        });
        mocks.bundles = bundles_listing(1);
        mocks.staff = staff_returning("admin");

        let started = Instant::now();
        let mut page = MenuPage::new(mocks.into_context(), session());
        page.mount().await;

        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(page.feedback().banner(), None);
        assert_eq!(page.products().len(), 1);
        assert_eq!(page.bundles().len(), 1);
        assert!(page.is_admin());

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn supplier_failure_hides_products_without_a_banner() {
        let mut mocks = Mocks::strict();
        mocks.catalog = MockCatalogService::new();
        mocks
            .catalog
            .expect_suppliers()
            .times(3)
            .returning(|| Err(unavailable()));
        mocks
            .catalog
            .expect_menu_products()
            .once()
            .return_once(|| Ok(vec![product(1, 500, 10)]));
        mocks.bundles = bundles_listing(1);
        mocks.staff = MockStaffService::new();
        mocks
            .staff
            .expect_member()
            .once()
            .return_once(|_| Err(unavailable()));

        let started = Instant::now();
        let mut page = MenuPage::new(mocks.into_context(), session());
        page.mount().await;

        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert_eq!(page.feedback().banner(), None);
        assert!(page.products().is_empty());
        assert_eq!(page.bundles().len(), 1);
        assert!(!page.is_admin());
    }

    #[tokio::test(start_paused = true)]
    async fn product_failure_gives_up_after_three_attempts() {
        let mut mocks = Mocks::strict();
        mocks.catalog = MockCatalogService::new();
        mocks
            .catalog
            .expect_suppliers()
            .once()
            .return_once(|| Ok(vec![supplier(1)]));
        mocks
            .catalog
            .expect_menu_products()
            .times(3)
            .returning(|| Err(unavailable()));
        mocks.bundles = bundles_listing(1);
        mocks.staff = staff_returning("customer");

        let mut page = MenuPage::new(mocks.into_context(), session());
        page.mount().await;

        assert_eq!(page.feedback().banner(), Some("Failed to fetch products."));
        assert_eq!(page.bundles().len(), 1);
    }

    #[tokio::test]
    async fn add_product_posts_one_unit() {
        let mut mocks = Mocks::strict();
        mocks.carts = MockCartsService::new();
        mocks
            .carts
            .expect_add()
            .once()
            .withf(|_, item| *item == AddToCart::product(ProductId::new(1)))
            .return_once(|_, _| Ok(CartItemId::new(8)));

        let mut page = loaded(mocks, false);
        page.add_product(ProductId::new(1)).await;

        assert_eq!(page.feedback().banner(), None);
        assert_eq!(
            page.feedback_mut().take_notices(),
            vec!["Product added to cart!"]
        );
    }

    #[tokio::test]
    async fn sold_out_product_is_not_sent() {
        let mut page = loaded(Mocks::strict(), false);

        page.add_product(ProductId::new(2)).await;

        assert_eq!(page.feedback().banner(), Some("Snack 2 is sold out"));
    }

    #[tokio::test]
    async fn add_bundle_failure_is_prefixed() {
        let mut mocks = Mocks::strict();
        mocks.carts = MockCartsService::new();
        mocks.carts.expect_add().once().return_once(|_, _| {
            Err(crate::api::ApiError::Rejected("Bundle unavailable".to_string()))
        });

        let mut page = loaded(mocks, false);
        page.add_bundle(BundleId::new(4)).await;

        assert_eq!(
            page.feedback().banner(),
            Some("Failed to add bundle to cart: Bundle unavailable")
        );
    }

    #[tokio::test]
    async fn add_bundle_notice_names_the_bundle() {
        let mut mocks = Mocks::strict();
        mocks.carts = MockCartsService::new();
        mocks
            .carts
            .expect_add()
            .once()
            .withf(|_, item| *item == AddToCart::bundle(BundleId::new(4)))
            .return_once(|_, _| Ok(CartItemId::new(8)));

        let mut page = loaded(mocks, false);
        page.add_bundle(BundleId::new(4)).await;

        assert_eq!(
            page.feedback_mut().take_notices(),
            vec!["Bundle \"Bundle 4\" added to cart!"]
        );
    }

    #[tokio::test]
    async fn admin_creates_bundle_with_original_price() -> TestResult {
        let mut mocks = Mocks::strict();
        mocks.bundles = bundles_listing(1);
        mocks
            .bundles
            .expect_create()
            .once()
            .withf(|payload| {
                payload.name == "Movie Night" && payload.original_price == cents(1_000)
            })
            .return_once(|_| Ok(()));

        let mut page = loaded(mocks, true);
        page.draft.name = "Movie Night".to_string();
        let catalog = page.catalog();
        page.draft.add_line(&catalog)?;
        page.draft.set_quantity(0, 2)?;

        page.save_bundle().await;

        assert_eq!(page.feedback().banner(), None);
        assert_eq!(
            page.feedback_mut().take_notices(),
            vec!["Bundle created successfully!"]
        );
        assert!(page.draft.lines().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn non_admin_cannot_save() {
        let mut page = loaded(Mocks::strict(), false);
        page.draft.name = "Movie Night".to_string();

        page.save_bundle().await;

        assert_eq!(page.feedback().banner(), Some("Only admins can manage bundles."));
    }

    #[tokio::test]
    async fn declined_delete_issues_nothing() {
        let mut prompt = MockPrompt::new();
        prompt
            .expect_confirm()
            .once()
            .withf(|message| message == "Are you sure you want to delete this bundle?")
            .return_const(false);

        let mut page = loaded(Mocks::strict(), true);
        page.delete_bundle(BundleId::new(4), &prompt).await;

        assert!(page.feedback_mut().take_notices().is_empty());
    }
}
