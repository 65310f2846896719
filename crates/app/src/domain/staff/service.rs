//! Staff service.

use async_trait::async_trait;
use mockall::automock;

use concession::staff::StaffMember;

use crate::{
    api::{ApiClient, ApiError},
    session::Session,
};

#[derive(Debug, Clone)]
pub struct HttpStaffService {
    api: ApiClient,
}

impl HttpStaffService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StaffService for HttpStaffService {
    async fn member(&self, session: Session) -> Result<StaffMember, ApiError> {
        self.api.get(&["staff", &session.segment()]).await
    }
}

#[automock]
#[async_trait]
pub trait StaffService: Send + Sync {
    /// The session user's staff record.
    async fn member(&self, session: Session) -> Result<StaffMember, ApiError>;
}
