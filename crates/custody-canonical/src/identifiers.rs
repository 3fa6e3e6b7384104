use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Borrowed inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    ProfileId,
    "Identifier for canonicalization profiles (pattern: `[A-Za-z0-9_-]{16,128}`)",
    r"^[A-Za-z0-9_-]{16,128}$"
);
newtype!(
    BatchId,
    "Opaque batch tag: 1 to 128 characters, no control characters.",
    r"^[^\x00-\x1F\x7F]{1,128}$"
);
newtype!(
    Timestamp,
    "UTC RFC3339 timestamp with `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_id_accepts_generated_ids() {
        assert!(BatchId::parse("B1718035200000").is_ok());
        assert!(BatchId::parse("lot 42 / crate 7").is_ok());
    }

    #[test]
    fn batch_id_rejects_empty_and_control() {
        assert!(BatchId::parse("").is_err());
        assert!(BatchId::parse("bad\nid").is_err());
        assert!(BatchId::parse("x".repeat(129)).is_err());
    }

    #[test]
    fn timestamp_requires_zulu() {
        assert!(Timestamp::parse("2024-06-10T12:00:00.123Z").is_ok());
        assert!(Timestamp::parse("2024-06-10T12:00:00Z").is_ok());
        assert!(Timestamp::parse("2024-06-10T12:00:00+02:00").is_err());
    }

    #[test]
    fn iso_timestamps_order_lexically() {
        let a = Timestamp::parse("2024-06-10T12:00:00.000Z").unwrap();
        let b = Timestamp::parse("2024-06-10T12:00:01.000Z").unwrap();
        assert!(a < b);
    }
}
