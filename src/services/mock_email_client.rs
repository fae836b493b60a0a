use color_eyre::eyre::{eyre, Result};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use crate::domain::{Email, EmailClient};

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Keeps every message in memory instead of delivering it.
#[derive(Default)]
pub struct MockEmailClient {
    sent: RwLock<Vec<SentEmail>>,
    failing: bool,
}

impl MockEmailClient {
    /// A client whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: RwLock::default(),
            failing: true,
        }
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }
}

fn addresses(emails: &[Email]) -> Vec<String> {
    emails
        .iter()
        .map(|email| email.as_ref().expose_secret().to_owned())
        .collect()
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipients: &[Email],
        cc: &[Email],
        subject: &str,
        html_body: &str,
    ) -> Result<()> {
        if self.failing {
            return Err(eyre!("mock email client refused to send {subject}"));
        }

        tracing::debug!(
            "Sending email to {:?} with subject: {subject}",
            addresses(recipients)
        );
        self.sent.write().await.push(SentEmail {
            recipients: addresses(recipients),
            cc: addresses(cc),
            subject: subject.to_owned(),
            html_body: html_body.to_owned(),
        });

        Ok(())
    }
}
