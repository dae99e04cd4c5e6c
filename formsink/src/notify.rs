//! Operator notification
//!
//! Best-effort side channel reporting submission outcomes to an operator
//! mailbox. Delivery runs on a detached task so it never delays the lock
//! release or the HTTP response; failures are logged and swallowed, never
//! surfaced to the submitter. When no recipient is configured the whole
//! channel is disabled.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::error::{Error, Result};
use crate::outcome::Outcome;

const USER_AGENT: &str = concat!("formsink/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUCCESS_SUBJECT: &str = "New Form Submission";
const ERROR_SUBJECT: &str = "Error in Form Submission";

/// Outbound message delivery
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Channel delivering mail through an HTTP mail API
pub struct MailApiChannel {
    http: reqwest::Client,
    mail_url: Url,
    api_token: Option<String>,
    sender: String,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl MailApiChannel {
    pub fn new(mail_url: &str, api_token: Option<String>, sender: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mail_url = Url::parse(mail_url)
            .map_err(|e| Error::Config(format!("Invalid mail URL '{}': {}", mail_url, e)))?;

        Ok(Self {
            http,
            mail_url,
            api_token,
            sender,
        })
    }
}

#[async_trait]
impl NotificationChannel for MailApiChannel {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let request = self.http.post(self.mail_url.clone()).json(&MailRequest {
            to: recipient,
            from: &self.sender,
            subject,
            body,
        });
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::Notify(format!("Mail API unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Notify(format!(
                "Mail API returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Fire-and-forget outcome reporting
#[derive(Clone)]
pub struct Notifier {
    channel: Option<Arc<dyn NotificationChannel>>,
    recipient: Option<String>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotificationChannel>, recipient: impl Into<String>) -> Self {
        Self {
            channel: Some(channel),
            recipient: Some(recipient.into()),
        }
    }

    /// A notifier that silently drops every outcome
    pub fn disabled() -> Self {
        Self {
            channel: None,
            recipient: None,
        }
    }

    /// Build from configuration; notification is disabled unless both a
    /// mail URL and a recipient are configured
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        match (&config.mail_url, &config.recipient) {
            (Some(mail_url), Some(recipient)) => {
                let channel =
                    MailApiChannel::new(mail_url, config.api_token.clone(), config.sender.clone())?;
                Ok(Self::new(Arc::new(channel), recipient.clone()))
            }
            _ => {
                debug!("Notification disabled (mail URL or recipient not configured)");
                Ok(Self::disabled())
            }
        }
    }

    /// Dispatch a notification for the outcome on a detached task.
    ///
    /// Returns the task handle for observability; the request path must not
    /// await it. Send failures are logged at WARN and discarded.
    pub fn notify(&self, outcome: &Outcome) -> Option<JoinHandle<()>> {
        let (channel, recipient) = match (&self.channel, &self.recipient) {
            (Some(channel), Some(recipient)) => (channel.clone(), recipient.clone()),
            _ => return None,
        };
        let (subject, body) = compose(outcome);

        Some(tokio::spawn(async move {
            if let Err(e) = channel.send(&recipient, &subject, &body).await {
                warn!("Submission notification failed: {}", e);
            }
        }))
    }
}

/// Subject and body for an outcome notification
fn compose(outcome: &Outcome) -> (String, String) {
    match outcome {
        Outcome::Success { row: Some(row), .. } => (
            SUCCESS_SUBJECT.to_string(),
            format!("A new submission has been added to row {}", row),
        ),
        Outcome::Success { .. } => (
            SUCCESS_SUBJECT.to_string(),
            "A new submission has been handled".to_string(),
        ),
        Outcome::Error { error } => (
            ERROR_SUBJECT.to_string(),
            format!("Form submission error:\n{}", error),
        ),
    }
}
