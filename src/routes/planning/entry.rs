use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    app_state::AppState,
    domain::{
        parse_date_time, EntryId, PlanningAPIError, PlanningEntry, ProjectId,
        UserId, ValidityReport,
    },
    services::planning::{get_project_planning, upsert_entry, validate_entry},
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "Get project planning route handler", skip_all)]
pub async fn get_planning(
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
) -> Result<Json<Vec<PlanningEntry>>, PlanningAPIError> {
    let entries =
        get_project_planning(&stores, &ProjectId::new(project_id)).await?;
    Ok(Json(entries))
}

#[tracing::instrument(name = "Upsert planning entry route handler", skip_all)]
pub async fn upsert_planning_entry(
    State(state): State<AppState>,
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<PlanningEntryRequest>,
) -> Result<(StatusCode, Json<PlanningEntry>), PlanningAPIError> {
    let status = match request.id {
        Some(_) => StatusCode::OK,
        None => StatusCode::CREATED,
    };
    let entry = request.into_entry(ProjectId::new(project_id))?;

    let entry = upsert_entry(&stores, &state.notifier, entry, true).await?;

    Ok((status, Json(entry)))
}

#[tracing::instrument(name = "Validate planning entry route handler", skip_all)]
pub async fn validate_planning_entry(
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<PlanningEntryRequest>,
) -> Result<Json<ValidityReport>, PlanningAPIError> {
    let entry = request.into_entry(ProjectId::new(project_id))?;
    let report = validate_entry(&stores, &entry).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanningEntryRequest {
    pub id: Option<uuid::Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(rename = "employeeIds", default)]
    pub employee_ids: Vec<uuid::Uuid>,
    #[serde(rename = "multipleAssignment", default)]
    pub multiple_assignment: bool,
}

impl PlanningEntryRequest {
    fn into_entry(
        self,
        project_id: ProjectId,
    ) -> Result<PlanningEntry, PlanningAPIError> {
        self.validate()?;

        let start = parse_date_time(&self.start)?;
        let end = parse_date_time(&self.end)?;

        Ok(PlanningEntry {
            id: self.id.map(EntryId::new),
            project_id,
            created_at: chrono::Utc::now(),
            updated_at: None,
            start,
            end,
            employee_ids: self.employee_ids.into_iter().map(UserId::new).collect(),
            multiple_assignment: self.multiple_assignment,
            title: self.title,
            description: self.description,
            comments: Vec::new(),
        })
    }
}
