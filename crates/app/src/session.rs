//! Customer session.

use concession::ids::TypedId;

/// Marker for customer ids.
#[derive(Debug)]
pub struct Customer;

/// Customer id
pub type CustomerId = TypedId<Customer>;

/// The customer every customer-scoped request acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    customer_id: CustomerId,
}

impl Session {
    /// A session for `customer_id`.
    pub const fn new(customer_id: CustomerId) -> Self {
        Self { customer_id }
    }

    /// The session's customer.
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// The customer id as a URL path segment.
    pub fn segment(&self) -> String {
        self.customer_id.to_string()
    }
}
