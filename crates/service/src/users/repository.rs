use async_trait::async_trait;
use models::{User, UserInput};

use crate::errors::ServiceError;

/// Persistence port for the user collection.
///
/// `insert` and `update` run the field checks against the collection they are
/// about to modify, so a uniqueness check and the write it guards cannot be
/// split by another request.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users whose name contains `term` (case-insensitive), in collection order.
    async fn list(&self, term: Option<&str>) -> Result<Vec<User>, ServiceError>;
    async fn find(&self, id: u64) -> Result<Option<User>, ServiceError>;
    async fn insert(&self, input: UserInput) -> Result<User, ServiceError>;
    async fn update(&self, id: u64, input: UserInput) -> Result<User, ServiceError>;
    /// Remove and return the user.
    async fn delete(&self, id: u64) -> Result<User, ServiceError>;
}
