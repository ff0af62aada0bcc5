use crate::models::common::UserRole;

/// Verified caller identity, attached to the request by the auth middleware.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: i32,
    pub role: UserRole,
}
