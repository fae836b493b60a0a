use axum::{http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::{
    domain::{
        PlanningAPIError, Project, ProjectId, ProjectName, ProjectType,
        ValidationError,
    },
    services::planning::add_or_update_project,
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "Upsert project route handler", skip_all)]
pub async fn upsert_project(
    Tenant(stores): Tenant,
    Json(request): Json<UpsertProjectRequest>,
) -> Result<(StatusCode, Json<Project>), PlanningAPIError> {
    request.validate()?;

    let status = match request.id {
        Some(_) => StatusCode::OK,
        None => StatusCode::CREATED,
    };

    let name = ProjectName::parse(&request.name)
        .map_err(|e| ValidationError::new(e.to_string()))?;
    let project_type = request.project_type.parse::<ProjectType>()?;

    let mut project = Project::new(name, project_type);
    project.id = request.id.map(ProjectId::new);
    project.description = request.description;
    project.archived = request.archived;

    let project = add_or_update_project(&stores, project).await?;

    Ok((status, Json(project)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProjectRequest {
    pub id: Option<uuid::Uuid>,
    #[serde(rename = "projectName")]
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(rename = "projectType")]
    pub project_type: String,
}
