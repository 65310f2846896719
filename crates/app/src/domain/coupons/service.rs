//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use concession::coupons::{AppliedCoupon, ApplyCouponRequest, PuzzleChallenge, PuzzleResponse};

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone)]
pub struct HttpCouponsService {
    api: ApiClient,
}

impl HttpCouponsService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CouponsService for HttpCouponsService {
    async fn puzzle(&self, code: &str) -> Result<PuzzleChallenge, ApiError> {
        let response: PuzzleResponse = self.api.get(&["coupons", code, "puzzle"]).await?;

        Ok(response.into())
    }

    async fn apply(&self, request: &ApplyCouponRequest) -> Result<AppliedCoupon, ApiError> {
        let applied: AppliedCoupon = self.api.post(&["coupons", "apply"], request).await?;

        info!(
            code = applied.code,
            discount_percent = %applied.discount_percent,
            new_total = %applied.new_total,
            "coupon applied"
        );

        Ok(applied)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Ask for the puzzle guarding `code`.
    async fn puzzle(&self, code: &str) -> Result<PuzzleChallenge, ApiError>;

    /// Verify a coupon, with or without a puzzle answer.
    async fn apply(&self, request: &ApplyCouponRequest) -> Result<AppliedCoupon, ApiError>;
}
