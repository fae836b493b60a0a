use std::collections::HashMap;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use crate::domain::{User, UserId, UserStore, UserStoreError};

#[derive(Default)]
pub struct HashmapUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;

        let duplicate = users.values().any(|existing| {
            existing.id == user.id
                || existing.username == user.username
                || existing.email == user.email
        });
        if duplicate {
            return Err(UserStoreError::UserAlreadyExists);
        }

        users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError> {
        match self.users.read().await.get(user_id) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound(*user_id.as_ref())),
        }
    }

    async fn find_users_by_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }

    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .values()
            .find(|user| {
                user.username == username_or_email
                    || user.email.as_ref().expose_secret() == username_or_email
            })
            .cloned()
            .ok_or(UserStoreError::UserNotFound(uuid::Uuid::nil()))
    }
}
