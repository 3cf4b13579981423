use anyhow::Context as _;
use serde_json::json;

use crate::domain::repository::Mailer;
use crate::error::ApiServiceError;

/// HTTP client implementing `Mailer` against the mail relay endpoint.
///
/// Delivery is best-effort: callers log failures and carry on, so a down
/// relay never blocks a signup.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiServiceError> {
        self.client
            .post(&self.endpoint)
            .json(&json!({
                "to": to,
                "subject": subject,
                "body": body,
            }))
            .send()
            .await
            .context("send mail request")?
            .error_for_status()
            .context("mail relay rejected the message")?;
        Ok(())
    }
}
