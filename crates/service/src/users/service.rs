use std::sync::Arc;

use models::{User, UserInput};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::users::repository::UserRepository;

/// Application service for the user directory.
/// Handlers receive it through their state; the repository behind it decides where data lives.
pub struct UserService<R: UserRepository + ?Sized = dyn UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All users, or those whose name contains `term` (case-insensitive).
    pub async fn list(&self, term: Option<&str>) -> Result<Vec<User>, ServiceError> {
        self.repo.list(term).await
    }

    pub async fn get(&self, id: u64) -> Result<User, ServiceError> {
        self.repo.find(id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        match self.repo.insert(input).await {
            Ok(user) => {
                info!(user_id = user.id, "user_created");
                Ok(user)
            }
            Err(e) => Err(log_rejection(e)),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: u64, input: UserInput) -> Result<User, ServiceError> {
        match self.repo.update(id, input).await {
            Ok(user) => {
                info!(user_id = user.id, "user_updated");
                Ok(user)
            }
            Err(e) => Err(log_rejection(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<User, ServiceError> {
        match self.repo.delete(id).await {
            Ok(user) => {
                info!(user_id = user.id, "user_deleted");
                Ok(user)
            }
            Err(e) => Err(log_rejection(e)),
        }
    }
}

fn log_rejection(e: ServiceError) -> ServiceError {
    match &e {
        ServiceError::Validation(errors) => info!(?errors, "user_rejected"),
        ServiceError::NotFound(_) => info!("user_not_found"),
        ServiceError::Storage(msg) => warn!(error = %msg, "user_storage_failed"),
    }
    e
}
