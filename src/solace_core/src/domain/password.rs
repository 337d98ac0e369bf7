use secrecy::{ExposeSecret, Secret};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,
}

/// Cleartext password in transit between the caller and the hasher.
/// Only ever exposed inside the password-hashing adapter.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().len() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        Ok(Self(value))
    }
}

impl TryFrom<String> for Password {
    type Error = PasswordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(Secret::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn rejects_short_passwords() {
        assert!(Password::try_from("seven77".to_string()).is_err());
        assert!(Password::try_from(String::new()).is_err());
    }

    #[test]
    fn accepts_minimum_length() {
        assert!(Password::try_from("eight888".to_string()).is_ok());
    }

    #[quickcheck]
    fn length_gate_is_exact(input: String) -> bool {
        let long_enough = input.len() >= MIN_PASSWORD_LENGTH;
        Password::try_from(input).is_ok() == long_enough
    }
}
