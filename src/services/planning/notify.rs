use std::collections::HashMap;

use super::reconcile::AssignmentResult;
use crate::{
    domain::{Email, User, UserId},
    services::{Notification, NotificationSender},
};

pub const ASSIGNED_SUBJECT: &str = "Planning assignment(s)";
pub const CANCELLED_SUBJECT: &str = "[CANCELLED]: Planning assignment(s)";
const LINE_SEPARATOR: &str = "<br>";

/// Lines per recipient, in the order recipients were first seen.
#[derive(Default)]
struct Buffer {
    order: Vec<(UserId, Email)>,
    lines: HashMap<(UserId, Email), Vec<String>>,
}

impl Buffer {
    fn push(&mut self, user: &User, line: String) {
        let key = (user.id, user.email.clone());
        self.lines
            .entry(key.clone())
            .or_insert_with(|| {
                self.order.push(key);
                Vec::new()
            })
            .push(line);
    }

    fn into_notifications(mut self, subject: &str) -> Vec<Notification> {
        self.order
            .into_iter()
            .filter_map(|key| {
                let lines = self.lines.remove(&key)?;
                Some(Notification {
                    recipients: vec![key.1],
                    cc: Vec::new(),
                    subject: subject.to_owned(),
                    body: lines.join(LINE_SEPARATOR),
                })
            })
            .collect()
    }
}

/// Merges reconciliation results into one message per employee and kind.
/// Lines are ordered by slot start; cancellations come before assignments.
pub fn batch_notifications(results: &[AssignmentResult]) -> Vec<Notification> {
    let mut ordered: Vec<&AssignmentResult> = results.iter().collect();
    ordered.sort_by_key(|result| result.entry.start);

    let mut assigned = Buffer::default();
    let mut cancelled = Buffer::default();
    for result in ordered {
        let project = result.project.name.as_ref();
        let slot = result.entry.slot();
        for user in &result.cancelled {
            cancelled.push(
                user,
                format!(
                    "Project {project}: You've been unassigned for slot {slot}"
                ),
            );
        }
        for user in &result.assigned {
            assigned.push(
                user,
                format!(
                    "Project {project}: You've been assigned for slot {slot}"
                ),
            );
        }
    }

    let mut notifications = cancelled.into_notifications(CANCELLED_SUBJECT);
    notifications.extend(assigned.into_notifications(ASSIGNED_SUBJECT));
    notifications
}

#[tracing::instrument(name = "Dispatching notifications", skip_all)]
pub async fn dispatch_notifications(
    notifier: &NotificationSender,
    results: &[AssignmentResult],
) {
    let notifications = batch_notifications(results);
    tracing::debug!("Queueing {} notification(s)", notifications.len());
    for notification in notifications {
        notifier.send_async(notification).await;
    }
}
