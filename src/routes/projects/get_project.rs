use axum::{extract::Path, Json};

use crate::{
    domain::{PlanningAPIError, Project, ProjectId},
    services::planning,
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "Get project route handler", skip_all)]
pub async fn get_project(
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
) -> Result<Json<Project>, PlanningAPIError> {
    let project =
        planning::get_project(&stores, &ProjectId::new(project_id)).await?;
    Ok(Json(project))
}
