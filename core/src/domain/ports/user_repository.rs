//! Port for the users collection.
//!
//! Per-document CRUD over user documents. Edge fields on the documents are
//! only ever written through the reference graph service; the repository
//! itself performs whole-document replacement on save, matching the
//! document store's per-document write model.

use async_trait::async_trait;

use crate::domain::id::UserId;
use crate::domain::user::User;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for user document storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id. Returns `None` when the id names no document.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch every user whose id appears in `ids`, preserving input order.
    ///
    /// Ids that resolve to nothing are silently skipped; callers relying on
    /// join semantics treat the gap as a dangling reference.
    async fn find_many_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Insert a new user document.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace an existing user document wholesale.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise user storage.
///
/// Lookups find nothing and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_many_by_ids(&self, _ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn save(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}
