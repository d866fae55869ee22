//! Request identifier normalization.
//!
//! Hex-address-shaped input (anything starting with `0x`, case-insensitive) is
//! lower-cased into its canonical form. Everything else (ENS-style names,
//! Farcaster handles, ...) passes through untouched and is never resolved.

use crate::errors::AppError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A normalized request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Lower-cased `0x...` address.
    Address(String),
    /// Opaque name handle, trimmed but otherwise unchanged.
    Name(String),
}

impl Identifier {
    /// Parses a raw identifier string.
    ///
    /// Fails with `AppError::BadRequest("Missing address")` on empty or
    /// whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("Missing address".to_string()));
        }

        let is_hex_prefixed = trimmed
            .get(..2)
            .map(|prefix| prefix.eq_ignore_ascii_case("0x"))
            .unwrap_or(false);

        if is_hex_prefixed {
            Ok(Identifier::Address(trimmed.to_lowercase()))
        } else {
            Ok(Identifier::Name(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Address(s) | Identifier::Name(s) => s,
        }
    }

    /// The address form, if this identifier is one.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            Identifier::Address(s) => Some(s),
            Identifier::Name(_) => None,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, Identifier::Address(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_lowercased() {
        let id = Identifier::parse("0xBC4Ca0EDA7647A8Ab7C2061c2E118A18A936F13D").unwrap();
        assert_eq!(
            id,
            Identifier::Address("0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d".to_string())
        );
    }

    #[test]
    fn test_uppercase_prefix_counts_as_address() {
        let id = Identifier::parse("  0XABCDEF  ").unwrap();
        assert_eq!(id.as_str(), "0xabcdef");
        assert!(id.is_address());
    }

    #[test]
    fn test_name_passes_through_unchanged() {
        let id = Identifier::parse(" Vitalik.eth ").unwrap();
        assert_eq!(id, Identifier::Name("Vitalik.eth".to_string()));
        assert!(id.as_address().is_none());
    }

    #[test]
    fn test_empty_input_rejected() {
        for raw in ["", "   ", "\t\n"] {
            match Identifier::parse(raw) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Missing address"),
                other => panic!("expected BadRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_short_input_is_name() {
        let id = Identifier::parse("0").unwrap();
        assert_eq!(id, Identifier::Name("0".to_string()));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = Identifier::parse("0xAB").unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("0xab"));
    }
}
