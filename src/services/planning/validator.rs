use std::collections::HashMap;

use super::upsert::{check_entry, open_project};
use crate::{
    domain::{
        check_multiple_assignment, slots_conflict, Comment, PlanningAPIError,
        PlanningEntry, User, UserId, UserStoreError, ValidityReport,
    },
    services::TenantStores,
};

pub fn unavailable_message(username: &str, entry: &PlanningEntry) -> String {
    format!(
        "Could not assign {username} for slot {}. Employee is already assigned \
         to another project or doesn't work at that time",
        entry.slot()
    )
}

/// Full availability check: the weekly window of the user's profile, when one
/// is declared, and every other non-cancelled assignment of the user.
#[tracing::instrument(name = "Checking user availability", skip_all)]
pub async fn is_user_available(
    stores: &TenantStores,
    user: &User,
    entry: &PlanningEntry,
) -> Result<bool, PlanningAPIError> {
    if let Some(rule) = &user.profile.availability {
        if !rule.covers(&entry.start, &entry.end) {
            return Ok(false);
        }
    }

    let details = stores
        .planning_store
        .get_assignment_details(&user.id)
        .await?;

    let conflict = details
        .iter()
        .filter(|detail| !detail.assignment.cancelled)
        .filter(|detail| detail.entry.id != entry.id)
        .any(|detail| {
            slots_conflict(
                &entry.start,
                &entry.end,
                &detail.entry.start,
                &detail.entry.end,
            )
        });

    Ok(!conflict)
}

/// Dry run over a list of entries. Problems with individual employees become
/// warning comments on the report; only store failures are errors.
#[tracing::instrument(name = "Validating planning entries", skip_all)]
pub async fn validate_entries(
    stores: &TenantStores,
    entries: &[PlanningEntry],
) -> Result<ValidityReport, PlanningAPIError> {
    let mut report = ValidityReport::default();
    let mut users: HashMap<UserId, Option<User>> = HashMap::new();

    for entry in entries {
        for employee_id in &entry.employee_ids {
            if !users.contains_key(employee_id) {
                let user = match stores.user_store.get_user(employee_id).await {
                    Ok(user) => Some(user),
                    Err(UserStoreError::UserNotFound(_)) => None,
                    Err(e) => return Err(e.into()),
                };
                users.insert(*employee_id, user);
            }

            let Some(user) = users.get(employee_id).and_then(Option::as_ref)
            else {
                report.reject(Comment::warning(
                    *employee_id,
                    format!("Employee {employee_id} could not be found"),
                ));
                continue;
            };

            if !user.is_plannable() {
                report.reject(Comment::warning(
                    user.id,
                    format!(
                        "{} is not enabled or doesn't have the proper role",
                        user.username
                    ),
                ));
                continue;
            }

            if !is_user_available(stores, user, entry).await? {
                report.reject(Comment::warning(
                    user.id,
                    unavailable_message(&user.username, entry),
                ));
            }
        }
    }

    Ok(report)
}

/// Dry run of a single entry. The rules `upsert_entry` enforces on the entry
/// itself and its project fail the call; employee problems are reported.
#[tracing::instrument(name = "Validating planning entry", skip_all)]
pub async fn validate_entry(
    stores: &TenantStores,
    entry: &PlanningEntry,
) -> Result<ValidityReport, PlanningAPIError> {
    check_entry(entry)?;
    check_multiple_assignment(&entry.employee_ids, entry.multiple_assignment)?;
    open_project(stores, &entry.project_id).await?;

    validate_entries(stores, std::slice::from_ref(entry)).await
}
