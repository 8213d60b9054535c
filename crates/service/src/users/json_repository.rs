use std::{path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use models::{user::next_id, User, UserInput};

use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;
use crate::users::repository::UserRepository;

/// File-backed user repository: one pretty-printed JSON array of `{id, name, email}`.
#[derive(Clone)]
pub struct JsonUserRepository {
    store: Arc<JsonListStore<User>>,
}

impl JsonUserRepository {
    /// Open (or create) the data file at `path`.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonListStore::<User>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Snapshot of the whole collection as stored on disk.
    pub async fn load(&self) -> Result<Vec<User>, ServiceError> {
        self.store.load().await
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn list(&self, term: Option<&str>) -> Result<Vec<User>, ServiceError> {
        let users = self.store.load().await?;
        Ok(match term {
            Some(term) => users.into_iter().filter(|u| u.name_contains(term)).collect(),
            None => users,
        })
    }

    async fn find(&self, id: u64) -> Result<Option<User>, ServiceError> {
        let users = self.store.load().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    async fn insert(&self, input: UserInput) -> Result<User, ServiceError> {
        self.store
            .update(move |users| {
                let errors = input.validate_against(users.as_slice(), None);
                if !errors.is_empty() {
                    return Err(ServiceError::Validation(errors));
                }
                let id = next_id(users.as_slice()).ok_or_else(|| ServiceError::storage("user id space exhausted"))?;
                let user = User { id, name: input.name, email: input.email };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    async fn update(&self, id: u64, input: UserInput) -> Result<User, ServiceError> {
        self.store
            .update(move |users| {
                let idx = users
                    .iter()
                    .position(|u| u.id == id)
                    .ok_or_else(|| ServiceError::not_found("user"))?;
                let errors = input.validate_against(users.as_slice(), Some(id));
                if !errors.is_empty() {
                    return Err(ServiceError::Validation(errors));
                }
                let existing = &mut users[idx];
                existing.name = input.name;
                existing.email = input.email;
                Ok(existing.clone())
            })
            .await
    }

    async fn delete(&self, id: u64) -> Result<User, ServiceError> {
        self.store
            .update(move |users| {
                let idx = users
                    .iter()
                    .position(|u| u.id == id)
                    .ok_or_else(|| ServiceError::not_found("user"))?;
                Ok(users.remove(idx))
            })
            .await
    }
}
