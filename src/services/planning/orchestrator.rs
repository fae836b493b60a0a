use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{
    employees::check_employees,
    upsert::{check_entry, open_project, persist_entry, reconcile_in_background},
    validator::validate_entries,
};
use crate::{
    domain::{
        PlanningAPIError, PlanningCycle, PlanningEntry, Project, ValidityReport,
    },
    services::{NotificationSender, TenantStores},
};

/// Checks the cycle's employees and project, then expands it into drafts.
#[tracing::instrument(name = "Expanding planning cycle", skip_all)]
pub async fn expand_cycle(
    stores: &TenantStores,
    cycle: &PlanningCycle,
) -> Result<(Project, Vec<PlanningEntry>), PlanningAPIError> {
    check_employees(stores, &cycle.employee_ids, cycle.multiple_assignment)
        .await?;

    let drafts = cycle.expand();
    for draft in &drafts {
        check_entry(draft)?;
    }

    let project = open_project(stores, &cycle.project_id).await?;

    Ok((project, drafts))
}

/// Dry run of a cycle: the validity report of every expanded entry.
#[tracing::instrument(name = "Validating planning cycle", skip_all)]
pub async fn validate_cycle(
    stores: &TenantStores,
    cycle: &PlanningCycle,
) -> Result<ValidityReport, PlanningAPIError> {
    let (_, drafts) = expand_cycle(stores, cycle).await?;
    validate_entries(stores, &drafts).await
}

/// Stores every entry of a cycle concurrently and returns them in arrival
/// order.
///
/// The first failing upsert cancels the others and is returned. Entries
/// stored before the cancellation stay stored. On full success the entries
/// are reconciled one by one in the background and the notifications of the
/// whole cycle are queued as one batch.
#[tracing::instrument(name = "Making planning cycle", skip_all)]
pub async fn make_planning_cycle(
    stores: &TenantStores,
    notifier: &NotificationSender,
    cycle: &PlanningCycle,
) -> Result<Vec<PlanningEntry>, PlanningAPIError> {
    let (project, drafts) = expand_cycle(stores, cycle).await?;
    if drafts.is_empty() {
        return Ok(Vec::new());
    }

    let token = CancellationToken::new();
    let capacity = drafts.len();
    let (entry_tx, mut entry_rx) = mpsc::channel::<PlanningEntry>(capacity);
    let (error_tx, mut error_rx) = mpsc::channel::<PlanningAPIError>(capacity);

    for draft in drafts {
        let stores = stores.clone();
        let token = token.clone();
        let entry_tx = entry_tx.clone();
        let error_tx = error_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    let _ = error_tx.send(PlanningAPIError::Cancelled).await;
                }
                result = persist_entry(&stores, draft) => match result {
                    Ok(entry) => {
                        let _ = entry_tx.send(entry).await;
                    }
                    Err(e) => {
                        let _ = error_tx.send(e).await;
                    }
                },
            }
        });
    }
    // Both channels close once every task has dropped its senders.
    drop(entry_tx);
    drop(error_tx);

    let mut committed = Vec::new();
    let mut first_error: Option<PlanningAPIError> = None;
    let mut entries_open = true;
    let mut errors_open = true;
    while entries_open || errors_open {
        tokio::select! {
            entry = entry_rx.recv(), if entries_open => match entry {
                Some(entry) => committed.push(entry),
                None => entries_open = false,
            },
            error = error_rx.recv(), if errors_open => match error {
                Some(PlanningAPIError::Cancelled) => {}
                Some(error) => {
                    if first_error.is_none() {
                        tracing::warn!("Cancelling planning cycle: {error}");
                        token.cancel();
                        first_error = Some(error);
                    }
                }
                None => errors_open = false,
            },
        }
    }

    if let Some(error) = first_error {
        tracing::warn!(
            "{} entries were stored before the cycle failed",
            committed.len()
        );
        return Err(error);
    }

    tokio::spawn(reconcile_in_background(
        stores.clone(),
        notifier.clone(),
        committed.clone(),
        project,
    ));

    Ok(committed)
}
