use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
    app_state::{PlanningStoreType, UserStoreType},
    domain::Group,
};

/// Stores bound to one group. Every query issued through them is scoped to
/// that group.
#[derive(Clone)]
pub struct TenantStores {
    pub group: Group,
    pub planning_store: PlanningStoreType,
    pub user_store: UserStoreType,
}

impl TenantStores {
    pub fn new(
        group: Group,
        planning_store: PlanningStoreType,
        user_store: UserStoreType,
    ) -> Self {
        Self {
            group,
            planning_store,
            user_store,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GroupRegistryError {
    #[error("Group {0} already exists")]
    GroupAlreadyExists(Group),
}

/// Maps each known group to its stores. Built once by the composition root
/// and shared through `AppState`.
#[derive(Default)]
pub struct GroupRegistry {
    tenants: RwLock<HashMap<Group, TenantStores>>,
}

impl GroupRegistry {
    #[tracing::instrument(name = "Registering group", skip_all)]
    pub async fn register(
        &self,
        stores: TenantStores,
    ) -> Result<(), GroupRegistryError> {
        let mut tenants = self.tenants.write().await;
        if tenants.contains_key(&stores.group) {
            return Err(GroupRegistryError::GroupAlreadyExists(stores.group));
        }
        tracing::info!("adding group {}", stores.group);
        tenants.insert(stores.group.clone(), stores);
        Ok(())
    }

    pub async fn get(&self, group: &Group) -> Option<TenantStores> {
        self.tenants.read().await.get(group).cloned()
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.tenants.read().await.keys().cloned().collect()
    }
}
