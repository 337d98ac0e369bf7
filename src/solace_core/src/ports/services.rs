use async_trait::async_trait;

use crate::domain::email::Email;

/// Port trait for the outbound mail collaborator. Delivery mechanics are
/// out of scope; a failure here never rolls back engine state.
#[async_trait]
pub trait MailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}
