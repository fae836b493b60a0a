use chrono::Utc;

use super::{
    employees::check_employees, notify::dispatch_notifications,
    reconcile::reconcile_assignments,
};
use crate::{
    domain::{
        PlanningAPIError, PlanningEntry, PlanningStoreError, Project,
        ProjectId, ValidationError,
    },
    services::{NotificationSender, TenantStores},
    utils::constants::RECONCILE_TIMEOUT,
};

/// Structural checks shared by single entries and expanded cycles.
pub fn check_entry(entry: &PlanningEntry) -> Result<(), PlanningAPIError> {
    if entry.title.trim().is_empty() {
        return Err(ValidationError::new(String::from("Title is required")).into());
    }
    if entry.start > entry.end {
        return Err(PlanningAPIError::StartAfterEnd);
    }
    Ok(())
}

/// Resolves the owning project and rejects archived ones.
pub async fn open_project(
    stores: &TenantStores,
    project_id: &ProjectId,
) -> Result<Project, PlanningAPIError> {
    let project = stores.planning_store.get_project(project_id).await?;
    if project.archived {
        return Err(PlanningAPIError::ArchivedProject);
    }
    Ok(project)
}

/// Stamps and stores an entry that has already been checked.
pub async fn persist_entry(
    stores: &TenantStores,
    mut entry: PlanningEntry,
) -> Result<PlanningEntry, PlanningAPIError> {
    let now = Utc::now();
    let previous = match entry.id {
        Some(id) => match stores.planning_store.get_entry(&id).await {
            Ok(previous) => Some(previous),
            Err(PlanningStoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    match previous {
        Some(previous) => {
            entry.created_at = previous.created_at;
            entry.updated_at = Some(now);
        }
        None => {
            entry.created_at = now;
            entry.updated_at = None;
        }
    }

    Ok(stores.planning_store.upsert_entry(entry).await?)
}

/// Validates and stores one entry. Employee problems are hard errors here.
///
/// With `assign`, reconciliation and the resulting notifications run in the
/// background; their failures are logged and never reach the caller.
#[tracing::instrument(name = "Upserting planning entry", skip_all)]
pub async fn upsert_entry(
    stores: &TenantStores,
    notifier: &NotificationSender,
    entry: PlanningEntry,
    assign: bool,
) -> Result<PlanningEntry, PlanningAPIError> {
    check_entry(&entry)?;
    check_employees(stores, &entry.employee_ids, entry.multiple_assignment)
        .await?;
    let project = open_project(stores, &entry.project_id).await?;

    let saved = persist_entry(stores, entry).await?;

    if assign {
        tokio::spawn(reconcile_in_background(
            stores.clone(),
            notifier.clone(),
            vec![saved.clone()],
            project,
        ));
    }

    Ok(saved)
}

/// Reconciles entries one after the other, each under the reconcile timeout,
/// then queues the notifications of every entry that went through.
pub async fn reconcile_in_background(
    stores: TenantStores,
    notifier: NotificationSender,
    entries: Vec<PlanningEntry>,
    project: Project,
) {
    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry_id = entry.id;
        match tokio::time::timeout(
            *RECONCILE_TIMEOUT,
            reconcile_assignments(&stores, entry, project.clone()),
        )
        .await
        {
            Ok(Ok(result)) => results.push(result),
            Ok(Err(e)) => tracing::error!(
                "Reconciliation of entry {entry_id:?} in group {} failed: {e:?}",
                stores.group
            ),
            Err(_) => tracing::error!(
                "Reconciliation of entry {entry_id:?} in group {} timed out",
                stores.group
            ),
        }
    }

    dispatch_notifications(&notifier, &results).await;
}
