//! Payments service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use tracing::info;

use concession::{
    money::Amount,
    payments::{AddFundsRequest, AddFundsResponse, PaymentMethod, PaymentMethodId},
};

use crate::{
    api::{ApiClient, ApiError},
    session::Session,
};

#[derive(Debug, Deserialize)]
struct PaymentMethodsEnvelope {
    payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone)]
pub struct HttpPaymentsService {
    api: ApiClient,
}

impl HttpPaymentsService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentsService for HttpPaymentsService {
    async fn methods(&self, session: Session) -> Result<Vec<PaymentMethod>, ApiError> {
        let envelope: PaymentMethodsEnvelope = self
            .api
            .get(&["customers", &session.segment(), "payment-methods"])
            .await?;

        Ok(envelope.payment_methods)
    }

    async fn add_funds(&self, method: PaymentMethodId, amount: Amount) -> Result<Amount, ApiError> {
        let response: AddFundsResponse = self
            .api
            .post(
                &["payment-methods", &method.to_string(), "add-funds"],
                &AddFundsRequest { amount },
            )
            .await?;

        info!(%method, %amount, new_balance = %response.new_balance, "added funds");

        Ok(response.new_balance)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// The customer's cards.
    async fn methods(&self, session: Session) -> Result<Vec<PaymentMethod>, ApiError>;

    /// Top up a card, returning its new balance.
    async fn add_funds(&self, method: PaymentMethodId, amount: Amount) -> Result<Amount, ApiError>;
}
