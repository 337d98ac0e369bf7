use std::sync::{Arc, Mutex};

use secrecy::ExposeSecret;
use solace_core::{Email, MailClient};

/// A message captured by the mock client.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Mail client that records outbound messages instead of delivering them.
/// Tests read the captured codes and tokens back out via `sent`.
#[derive(Debug, Clone, Default)]
pub struct MockMailClient {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockMailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().expect("outbox poisoned").clone()
    }
}

#[async_trait::async_trait]
impl MailClient for MockMailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        self.outbox.lock().expect("outbox poisoned").push(SentEmail {
            recipient: recipient.as_ref().expose_secret().clone(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
