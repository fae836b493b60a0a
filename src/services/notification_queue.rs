use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{app_state::EmailClientType, domain::Email};

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub recipients: Vec<Email>,
    pub cc: Vec<Email>,
    pub subject: String,
    pub body: String,
}

/// Submitting half of the notification queue. Cheap to clone; submitters
/// never learn whether delivery succeeded.
#[derive(Clone)]
pub struct NotificationSender {
    tx: mpsc::Sender<Notification>,
}

impl NotificationSender {
    /// Queues a notification. Waits for queue capacity, not for delivery.
    pub async fn send_async(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification).await {
            tracing::error!(
                "Notification queue is closed, dropping \"{}\"",
                e.0.subject
            );
        }
    }
}

/// Consumer loop draining the queue into an email client.
pub struct NotificationWorker {
    rx: mpsc::Receiver<Notification>,
    email_client: EmailClientType,
}

impl NotificationWorker {
    /// Runs until every `NotificationSender` has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Notification worker started");
        while let Some(notification) = self.rx.recv().await {
            self.deliver(notification).await;
        }
        tracing::info!("Notification worker stopped");
    }

    #[tracing::instrument(
        name = "Delivering notification",
        skip_all,
        fields(log_id = tracing::field::Empty)
    )]
    async fn deliver(&self, notification: Notification) {
        let log_id = Uuid::new_v4();
        tracing::Span::current()
            .record("log_id", tracing::field::display(log_id));

        match self
            .email_client
            .send_email(
                &notification.recipients,
                &notification.cc,
                &notification.subject,
                &notification.body,
            )
            .await
        {
            Ok(()) => tracing::info!(
                "[{log_id}] Sent \"{}\" to {} recipient(s)",
                notification.subject,
                notification.recipients.len()
            ),
            Err(e) => tracing::error!(
                "[{log_id}] Failed to send \"{}\": {e:?}",
                notification.subject
            ),
        }
    }
}

pub fn notification_channel(
    capacity: usize,
    email_client: EmailClientType,
) -> (NotificationSender, NotificationWorker) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        NotificationSender { tx },
        NotificationWorker { rx, email_client },
    )
}
