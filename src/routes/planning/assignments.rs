use axum::{extract::Path, Json};

use crate::{
    domain::{PlanningAPIError, PlanningAssignmentDetail, UserId},
    services::planning::get_employee_assignments,
    utils::tenant::Tenant,
};

#[tracing::instrument(name = "Get employee assignments route handler", skip_all)]
pub async fn get_assignments(
    Tenant(stores): Tenant,
    Path(employee_id): Path<uuid::Uuid>,
) -> Result<Json<Vec<PlanningAssignmentDetail>>, PlanningAPIError> {
    let details =
        get_employee_assignments(&stores, &UserId::new(employee_id)).await?;
    Ok(Json(details))
}
