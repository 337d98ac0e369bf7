use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex must compile")
});

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid email address")]
    Invalid,
}

/// Validated email address. The inner value is wrapped in `Secret` so it
/// never leaks through `Debug` output or tracing spans.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = EmailError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if EMAIL_REGEX.is_match(value.expose_secret()) {
            Ok(Self(value))
        } else {
            Err(EmailError::Invalid)
        }
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(Secret::from(value))
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

// Emails are used as map keys by the in-memory stores.
impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn accepts_plain_address() {
        assert!(Email::try_from("user@example.com".to_string()).is_ok());
        assert!(Email::try_from("first.last@sub.example.co.uk".to_string()).is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for candidate in ["", "no-at-sign", "@example.com", "user@", "user@nodot", "a b@c.d"] {
            assert!(
                Email::try_from(candidate.to_string()).is_err(),
                "accepted {candidate:?}"
            );
        }
    }

    #[quickcheck]
    fn never_accepts_input_without_at_sign(input: String) -> bool {
        if input.contains('@') {
            return true;
        }
        Email::try_from(input).is_err()
    }

    #[quickcheck]
    fn parsed_emails_compare_by_value(local: u32) -> bool {
        let raw = format!("user{local}@example.com");
        let a = Email::try_from(raw.clone()).unwrap();
        let b = Email::try_from(raw).unwrap();
        a == b
    }
}
