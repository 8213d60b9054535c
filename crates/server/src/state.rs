use std::sync::Arc;

use service::users::{JsonUserRepository, UserRepository, UserService};
use service::errors::ServiceError;

/// Shared handler state. Built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { users: Arc::new(UserService::new(repo)) }
    }

    /// State backed by the JSON data file at `users_file`.
    pub async fn from_file(users_file: &str) -> Result<Self, ServiceError> {
        let repo: Arc<dyn UserRepository> = JsonUserRepository::new(users_file).await?;
        Ok(Self::new(repo))
    }
}
