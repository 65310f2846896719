//! Staff bundle management page.

use std::io;

use tracing::error;

use concession::{
    bundles::{Bundle, BundleDraft, BundleId, find_bundle},
    money::Amount,
    products::Product,
    receipt,
};

use crate::{
    context::AppContext,
    pages::{Feedback, PageError, submit_draft},
    prompt::Prompt,
};

/// Every bundle, available or not, plus the bundle form.
pub struct BundlesPage {
    ctx: AppContext,
    bundles: Vec<Bundle>,
    products: Vec<Product>,
    feedback: Feedback,

    /// Bundle form
    pub draft: BundleDraft,
}

/// Prices shown under the bundle form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftPreview {
    /// Sum of the lines at catalog prices
    pub original_price: Amount,

    /// Price after the bundle discount
    pub bundle_price: Amount,
}

impl BundlesPage {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            bundles: Vec::new(),
            products: Vec::new(),
            feedback: Feedback::default(),
            draft: BundleDraft::new(),
        }
    }

    /// Every bundle, available or not.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Products that can go into a bundle.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    /// Load every bundle and the staff product list.
    pub async fn mount(&mut self) {
        self.feedback.clear_banner();

        let (bundles, products) = tokio::join!(
            self.ctx.bundles.list(true),
            self.ctx.catalog.staff_products()
        );

        if let Some(bundles) = self
            .feedback
            .record(bundles.map_err(|error| PageError::api(error, "Failed to load bundles")))
        {
            self.bundles = bundles;
        }

        match products {
            Ok(products) => self.products = products,
            Err(error) => error!(%error, "Failed to load products"),
        }
    }

    async fn reload_bundles(&mut self) {
        let result = self
            .ctx
            .bundles
            .list(true)
            .await
            .map_err(|error| PageError::api(error, "Failed to load bundles"));

        if let Some(bundles) = self.feedback.record(result) {
            self.bundles = bundles;
        }
    }

    /// Start a new bundle.
    pub fn new_draft(&mut self) {
        self.draft = BundleDraft::new();
    }

    /// Load a bundle into the form.
    pub fn edit(&mut self, id: BundleId) {
        self.feedback.clear_banner();

        if let Some(bundle) = find_bundle(&self.bundles, id) {
            self.draft = BundleDraft::edit(bundle);
        } else {
            self.feedback.record::<()>(Err(PageError::UnknownBundle(id)));
        }
    }

    /// Add a line for the first product.
    pub fn add_line(&mut self) {
        let result = self.draft.add_line(&self.products).map_err(PageError::from);

        self.feedback.record(result);
    }

    /// Original and discounted price of the draft.
    ///
    /// # Errors
    ///
    /// Returns a [`PageError`] if the arithmetic overflows.
    pub fn preview(&self) -> Result<DraftPreview, PageError> {
        Ok(DraftPreview {
            original_price: self.draft.original_price(&self.products)?,
            bundle_price: self.draft.discounted_price(&self.products)?,
        })
    }

    /// Create or update the drafted bundle, then reload.
    pub async fn save(&mut self) {
        self.feedback.clear_banner();

        let result = submit_draft(
            self.ctx.bundles.as_ref(),
            &self.draft,
            &self.products,
            "Failed to save bundle",
        )
        .await;

        if let Some(notice) = self.feedback.record(result) {
            self.feedback.notify(notice);
            self.draft = BundleDraft::new();
            self.reload_bundles().await;
        }
    }

    /// Delete a bundle after confirmation, then reload.
    pub async fn delete(&mut self, id: BundleId, prompt: &dyn Prompt) {
        self.feedback.clear_banner();

        if !prompt.confirm("Are you sure you want to delete this bundle?") {
            return;
        }

        let result = self.ctx.bundles.delete(id).await.map_err(|error| {
            PageError::api(error, "Failed to delete bundle").prefixed("Failed to delete bundle")
        });

        if self.feedback.record(result).is_some() {
            self.feedback.notify("Bundle deleted successfully!");
            self.reload_bundles().await;
        }
    }

    /// Flip a bundle's availability, then reload.
    pub async fn toggle(&mut self, id: BundleId) {
        self.feedback.clear_banner();

        let result = self.ctx.bundles.toggle(id).await.map_err(|error| {
            PageError::api(error, "Failed to toggle availability")
                .prefixed("Failed to toggle availability")
        });

        if self.feedback.record(result).is_some() {
            self.reload_bundles().await;
        }
    }

    /// Print the bundle listing.
    ///
    /// # Errors
    ///
    /// Returns a [`PageError`] if the output cannot be written.
    pub fn render(&self, out: impl io::Write) -> Result<(), PageError> {
        receipt::write_bundles(out, &self.bundles)?;

        Ok(())
    }
}
