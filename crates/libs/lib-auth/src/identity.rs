//! # Authenticated Identity

use crate::token::Claims;

/// The caller an accepted bearer token speaks for.
///
/// Built once per request by the auth gate and passed explicitly to every
/// operation that acts on behalf of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}
