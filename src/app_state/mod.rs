use std::sync::Arc;

use crate::domain::{EmailClient, PlanningStore, UserStore};
use crate::services::{GroupRegistry, NotificationSender};

pub type PlanningStoreType = Arc<dyn PlanningStore + Send + Sync>;
pub type UserStoreType = Arc<dyn UserStore + Send + Sync>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;
pub type GroupRegistryType = Arc<GroupRegistry>;

#[derive(Clone)]
pub struct AppState {
    pub groups: GroupRegistryType,
    pub notifier: NotificationSender,
}

impl AppState {
    pub fn new(groups: GroupRegistryType, notifier: NotificationSender) -> Self {
        Self { groups, notifier }
    }
}
