pub mod mock_mail_client;

pub use mock_mail_client::{MockMailClient, SentEmail};
