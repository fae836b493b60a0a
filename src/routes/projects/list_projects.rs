use axum::Json;

use crate::{
    domain::{PlanningAPIError, Project},
    services::planning::list_projects as list,
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "List projects route handler", skip_all)]
pub async fn list_projects(
    Tenant(stores): Tenant,
) -> Result<Json<Vec<Project>>, PlanningAPIError> {
    Ok(Json(list(&stores).await?))
}
