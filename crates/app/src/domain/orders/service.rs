//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use concession::checkout::{CustomerShowing, DeliveryRequest};

use crate::{
    api::{ApiClient, ApiError},
    session::Session,
};

#[derive(Debug, Clone)]
pub struct HttpOrdersService {
    api: ApiClient,
}

impl HttpOrdersService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrdersService for HttpOrdersService {
    async fn customer_showing(&self, session: Session) -> Result<CustomerShowing, ApiError> {
        self.api
            .get(&["customers", &session.segment(), "customer_showing"])
            .await
    }

    async fn place(&self, delivery: &DeliveryRequest) -> Result<(), ApiError> {
        self.api.post_unit(&["deliveries"], delivery).await?;

        info!(
            showing = delivery.customer_showing_id,
            payment_method = %delivery.payment_method_id,
            "delivery placed"
        );

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The showing the customer's order is delivered to.
    async fn customer_showing(&self, session: Session) -> Result<CustomerShowing, ApiError>;

    /// Place the order.
    async fn place(&self, delivery: &DeliveryRequest) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;
    use testresult::TestResult;

    use concession::payments::PaymentMethodId;

    use crate::test::{api_client, session};

    use super::*;

    #[tokio::test]
    async fn customer_showing_is_read() -> TestResult {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/customers/42/customer_showing");
            then.status(200).json_body(json!({"id": 17}));
        });

        let showing = HttpOrdersService::new(api_client(&server)?)
            .customer_showing(session())
            .await?;

        assert_eq!(showing.id, 17);

        Ok(())
    }

    #[tokio::test]
    async fn place_posts_the_delivery() -> TestResult {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/deliveries").json_body(json!({
                "customer_showing_id": 17,
                "payment_method_id": 9,
                "coupon_code": null,
                "puzzle_token": null,
                "puzzle_answer": null,
                "skip_puzzle": false,
                "ngo_id": null,
                "donation_amount": null,
                "donation_percentage": null
            }));
            then.status(201).json_body(json!({"id": 3}));
        });

        HttpOrdersService::new(api_client(&server)?)
            .place(&DeliveryRequest {
                customer_showing_id: 17,
                payment_method_id: PaymentMethodId::new(9),
                coupon_code: None,
                puzzle_token: None,
                puzzle_answer: None,
                skip_puzzle: false,
                ngo_id: None,
                donation_amount: None,
                donation_percentage: None,
            })
            .await?;

        mock.assert();

        Ok(())
    }
}
