//! Staff

use serde::{Deserialize, Serialize};

/// Role that may manage bundles.
pub const ADMIN_ROLE: &str = "admin";

/// Staff record returned by `GET /staff/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Staff user id
    #[serde(default)]
    pub user_id: Option<u64>,

    /// Role name
    #[serde(default)]
    pub role: String,
}

impl StaffMember {
    /// Whether this staff member may manage bundles.
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn only_the_admin_role_is_admin() -> TestResult {
        let admin: StaffMember = serde_json::from_str(r#"{"user_id": 4, "role": "admin"}"#)?;
        let clerk: StaffMember = serde_json::from_str(r#"{"role": "Admin"}"#)?;

        assert!(admin.is_admin());
        assert!(!clerk.is_admin());

        Ok(())
    }
}
