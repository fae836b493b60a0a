use std::collections::HashSet;

use chrono::Utc;
use color_eyre::eyre::eyre;

use super::validator::validate_entries;
use crate::{
    domain::{
        PlanningAPIError, PlanningAssignment, PlanningEntry, Project, User,
        UserId,
    },
    services::TenantStores,
};

/// Users whose assignments changed for one entry. Consumed by the
/// notification batcher, never stored.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    pub entry: PlanningEntry,
    pub project: Project,
    pub assigned: Vec<User>,
    pub cancelled: Vec<User>,
}

/// Brings the assignment records of a persisted entry in line with its
/// employee list.
///
/// Employees that fail validation are removed from the entry and a comment is
/// recorded on it; the trimmed entry is written back before any assignment is
/// touched. Existing assignments of employees no longer listed are cancelled,
/// listed employees without an active assignment get a new record. All
/// changes go to the store in one bulk write, which is skipped when there is
/// nothing to change.
#[tracing::instrument(name = "Reconciling assignments", skip_all)]
pub async fn reconcile_assignments(
    stores: &TenantStores,
    mut entry: PlanningEntry,
    project: Project,
) -> Result<AssignmentResult, PlanningAPIError> {
    let entry_id = entry.id.ok_or_else(|| {
        PlanningAPIError::UnexpectedError(eyre!(
            "cannot reconcile an entry that has not been stored"
        ))
    })?;

    let existing = stores
        .planning_store
        .get_active_assignments(&entry_id)
        .await?;

    let report = validate_entries(stores, std::slice::from_ref(&entry)).await?;
    if !report.valid {
        let flagged = report.flagged_users();
        tracing::debug!(
            "Removing {} unavailable employee(s) from entry {entry_id}",
            flagged.len()
        );
        entry.employee_ids.retain(|id| !flagged.contains(id));
        entry.comments.extend(report.comments);
        entry.updated_at = Some(Utc::now());
        entry = stores.planning_store.upsert_entry(entry).await?;
    }

    let targets: HashSet<UserId> = entry.employee_ids.iter().copied().collect();
    let already_assigned: HashSet<UserId> =
        existing.iter().map(|a| a.employee_id).collect();

    let mut changes: Vec<PlanningAssignment> = Vec::new();
    let mut cancelled_ids: Vec<UserId> = Vec::new();
    for mut assignment in existing {
        if !targets.contains(&assignment.employee_id) {
            assignment.cancel();
            cancelled_ids.push(assignment.employee_id);
            changes.push(assignment);
        }
    }

    let mut assigned_ids: Vec<UserId> = Vec::new();
    for employee_id in &entry.employee_ids {
        if !already_assigned.contains(employee_id)
            && !assigned_ids.contains(employee_id)
        {
            assigned_ids.push(*employee_id);
            changes.push(PlanningAssignment::new(entry_id, *employee_id));
        }
    }

    if !changes.is_empty() {
        stores.planning_store.upsert_assignments(changes).await?;
    }

    tracing::info!(
        "Entry {entry_id}: {} assigned, {} cancelled",
        assigned_ids.len(),
        cancelled_ids.len()
    );

    Ok(AssignmentResult {
        assigned: resolve_users(stores, &assigned_ids).await?,
        cancelled: resolve_users(stores, &cancelled_ids).await?,
        entry,
        project,
    })
}

/// Users in the order of `ids`. Users deleted since being assigned are skipped.
async fn resolve_users(
    stores: &TenantStores,
    ids: &[UserId],
) -> Result<Vec<User>, PlanningAPIError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let users = stores.user_store.find_users_by_ids(ids).await?;
    if users.len() != ids.len() {
        tracing::warn!(
            "{} assigned user(s) no longer exist",
            ids.len() - users.len()
        );
    }
    Ok(ids
        .iter()
        .filter_map(|id| users.iter().find(|user| &user.id == id).cloned())
        .collect())
}
