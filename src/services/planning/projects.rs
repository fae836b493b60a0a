use chrono::Utc;

use crate::{
    domain::{
        PlanningAPIError, PlanningAssignmentDetail, PlanningEntry,
        PlanningStoreError, Project, ProjectId, UserId,
    },
    services::TenantStores,
};

/// Inserts a project without id, replaces one with id. The creation time of
/// an existing project is kept.
#[tracing::instrument(name = "Adding or updating project", skip_all)]
pub async fn add_or_update_project(
    stores: &TenantStores,
    mut project: Project,
) -> Result<Project, PlanningAPIError> {
    let previous = match project.id {
        Some(id) => match stores.planning_store.get_project(&id).await {
            Ok(previous) => Some(previous),
            Err(PlanningStoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    match previous {
        Some(previous) => {
            project.created_at = previous.created_at;
            project.updated_at = Some(Utc::now());
        }
        None => {
            project.created_at = Utc::now();
            project.updated_at = None;
        }
    }

    Ok(stores.planning_store.upsert_project(project).await?)
}

pub async fn list_projects(
    stores: &TenantStores,
) -> Result<Vec<Project>, PlanningAPIError> {
    Ok(stores.planning_store.get_projects().await?)
}

pub async fn get_project(
    stores: &TenantStores,
    project_id: &ProjectId,
) -> Result<Project, PlanningAPIError> {
    Ok(stores.planning_store.get_project(project_id).await?)
}

/// Entries of an existing project ordered by start.
#[tracing::instrument(name = "Getting project planning", skip_all)]
pub async fn get_project_planning(
    stores: &TenantStores,
    project_id: &ProjectId,
) -> Result<Vec<PlanningEntry>, PlanningAPIError> {
    stores.planning_store.get_project(project_id).await?;
    Ok(stores
        .planning_store
        .get_entries_for_project(project_id)
        .await?)
}

#[tracing::instrument(name = "Getting employee assignments", skip_all)]
pub async fn get_employee_assignments(
    stores: &TenantStores,
    employee_id: &UserId,
) -> Result<Vec<PlanningAssignmentDetail>, PlanningAPIError> {
    stores.user_store.get_user(employee_id).await?;
    Ok(stores
        .planning_store
        .get_assignment_details(employee_id)
        .await?)
}
