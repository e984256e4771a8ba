//! Normalized email address.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use folio_core::AppError;

/// An email address that has been trimmed, lowercased, and syntax-checked.
///
/// All allow-list lookups go through this type, which keeps membership
/// checks case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalize and validate a raw address.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::validation("Email is required"));
        }
        if !normalized.validate_email() {
            return Err(AppError::validation(format!("Invalid email address: '{raw}'")));
        }
        Ok(Self(normalized))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let email = EmailAddress::parse("  Foo@Example.com ").unwrap();
        assert_eq!(email.as_str(), "foo@example.com");
        assert_eq!(email, EmailAddress::parse("foo@example.COM").unwrap());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(EmailAddress::parse("").is_err());
        assert!(EmailAddress::parse("   ").is_err());
        assert!(EmailAddress::parse("not-an-email").is_err());
        assert!(EmailAddress::parse("a@").is_err());
    }
}
