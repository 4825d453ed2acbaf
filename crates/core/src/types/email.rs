//! Normalized email addresses for donors, subscribers and admins.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why an address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    Whitespace,
    #[error("email must contain a single @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// Empty domain, no dot, or a dot at either end.
    #[error("email domain must contain a dot")]
    InvalidDomain,
}

/// A trimmed, lowercased email address.
///
/// Two spellings of the same mailbox compare equal, which duplicate
/// subscriber detection depends on. Deserialization validates too.
///
/// ```
/// use winter_gifts_core::Email;
///
/// let email = Email::parse("  Santa@North.Pole ").unwrap();
/// assert_eq!(email.as_str(), "santa@north.pole");
/// assert_eq!(email.domain(), "north.pole");
///
/// assert!(Email::parse("user@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate and normalize an address.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the input trips over.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let address = input.trim();
        match address.len() {
            0 => return Err(EmailError::Empty),
            n if n > Self::MAX_LENGTH => {
                return Err(EmailError::TooLong {
                    max: Self::MAX_LENGTH,
                });
            }
            _ => {}
        }
        if address.contains(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let mut parts = address.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::MissingAtSymbol);
        };
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(address.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The part after the @.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for ok in ["user@example.com", "user.name+tag@example.co.uk", "a@b.c"] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = Email::parse("  Donor@Example.COM\n").unwrap();
        assert_eq!(email.as_str(), "donor@example.com");
        assert_eq!(email, "donor@example.com".parse().unwrap());
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ("   ", EmailError::Empty),
            ("nobody", EmailError::MissingAtSymbol),
            ("a@b@c.d", EmailError::MissingAtSymbol),
            ("@example.com", EmailError::EmptyLocalPart),
            ("user@", EmailError::InvalidDomain),
            ("user@localhost", EmailError::InvalidDomain),
            ("user@.com", EmailError::InvalidDomain),
            ("user@example.", EmailError::InvalidDomain),
            ("us er@example.com", EmailError::Whitespace),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input:?}");
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong { max: 254 }));
    }

    #[test]
    fn test_deserialize_validates() {
        let email: Email = serde_json::from_str(r#"" Kid@Example.org""#).unwrap();
        assert_eq!(email.as_str(), "kid@example.org");
        assert!(serde_json::from_str::<Email>(r#""not-an-email""#).is_err());
        assert_eq!(serde_json::to_string(&email).unwrap(), r#""kid@example.org""#);
    }
}
