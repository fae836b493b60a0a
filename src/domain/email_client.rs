use color_eyre::eyre::Result;

use super::Email;

/// Outbound mail transport used by the notification worker.
#[async_trait::async_trait]
pub trait EmailClient {
    async fn send_email(
        &self,
        recipients: &[Email],
        cc: &[Email],
        subject: &str,
        html_body: &str,
    ) -> Result<()>;
}
