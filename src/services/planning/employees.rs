use crate::{
    domain::{check_multiple_assignment, PlanningAPIError, User, UserId},
    services::TenantStores,
};

/// Fetches every listed employee in one lookup and rejects the batch when one
/// is unknown, disabled or lacks the worker role.
#[tracing::instrument(name = "Checking employees", skip_all)]
pub async fn check_employees(
    stores: &TenantStores,
    employee_ids: &[UserId],
    multiple_assignment: bool,
) -> Result<Vec<User>, PlanningAPIError> {
    check_multiple_assignment(employee_ids, multiple_assignment)?;
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let users = stores.user_store.find_users_by_ids(employee_ids).await?;
    if users.len() != employee_ids.len() {
        return Err(PlanningAPIError::EmployeesNotFound);
    }
    if users.iter().any(|user| !user.is_plannable()) {
        return Err(PlanningAPIError::EmployeeNotEligible);
    }

    Ok(users)
}
