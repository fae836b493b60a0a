use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app_state::AppState,
    domain::{
        parse_date, PlanningAPIError, PlanningCycle, PlanningEntry, ProjectId,
        RotationUnit, Shift, UserId, ValidityReport,
    },
    services::planning,
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "Make planning cycle route handler", skip_all)]
pub async fn make_planning_cycle(
    State(state): State<AppState>,
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<PlanningCycleRequest>,
) -> Result<(StatusCode, Json<Vec<PlanningEntry>>), PlanningAPIError> {
    let cycle = request.into_cycle(ProjectId::new(project_id))?;

    let entries =
        planning::make_planning_cycle(&stores, &state.notifier, &cycle).await?;

    Ok((StatusCode::CREATED, Json(entries)))
}

#[tracing::instrument(name = "Validate planning cycle route handler", skip_all)]
pub async fn validate_planning_cycle(
    Tenant(stores): Tenant,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<PlanningCycleRequest>,
) -> Result<Json<ValidityReport>, PlanningAPIError> {
    let cycle = request.into_cycle(ProjectId::new(project_id))?;
    let report = planning::validate_cycle(&stores, &cycle).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanningCycleRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub start: String,
    pub end: String,
    #[serde(rename = "employeeIds", default)]
    pub employee_ids: Vec<uuid::Uuid>,
    #[serde(rename = "multipleAssignment", default)]
    pub multiple_assignment: bool,
    #[serde(rename = "rotationFrequency")]
    #[validate(range(min = 1))]
    pub rotation_frequency: u16,
    #[serde(rename = "rotationUnit")]
    pub rotation_unit: String,
    #[validate(length(min = 1))]
    pub shifts: Vec<ShiftRequest>,
    #[serde(rename = "includeSaturday", default)]
    pub include_saturday: bool,
    #[serde(rename = "includeSunday", default)]
    pub include_sunday: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShiftRequest {
    #[serde(rename = "startHour")]
    pub start_hour: u32,
    #[serde(rename = "startMinute", default)]
    pub start_minute: u32,
    #[serde(rename = "endHour")]
    pub end_hour: u32,
    #[serde(rename = "endMinute", default)]
    pub end_minute: u32,
}

impl PlanningCycleRequest {
    fn into_cycle(
        self,
        project_id: ProjectId,
    ) -> Result<PlanningCycle, PlanningAPIError> {
        self.validate()?;

        let rotation_unit = self.rotation_unit.parse::<RotationUnit>()?;
        let shifts = self
            .shifts
            .iter()
            .map(|shift| {
                Shift::new(
                    shift.start_hour,
                    shift.start_minute,
                    shift.end_hour,
                    shift.end_minute,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        PlanningCycle::new(
            project_id,
            parse_date(&self.start)?,
            parse_date(&self.end)?,
            self.employee_ids.into_iter().map(UserId::new).collect(),
            self.multiple_assignment,
            self.title,
            self.description,
            self.rotation_frequency,
            rotation_unit,
            shifts,
            self.include_saturday,
            self.include_sunday,
        )
    }
}
