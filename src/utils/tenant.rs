use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use super::constants::GROUP_HEADER;
use crate::{
    app_state::AppState,
    domain::{Group, PlanningAPIError},
    services::TenantStores,
};

/// Stores of the group named by the `x-group` header.
pub struct Tenant(pub TenantStores);

#[async_trait]
impl FromRequestParts<AppState> for Tenant {
    type Rejection = PlanningAPIError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(GROUP_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(PlanningAPIError::MissingGroup)?;

        let group = Group::parse(raw)?;
        let stores = state
            .groups
            .get(&group)
            .await
            .ok_or_else(|| PlanningAPIError::GroupNotFound(group.to_string()))?;

        Ok(Tenant(stores))
    }
}
