use canonical_json::to_string;
use serde_json::Value;

use crate::hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
use crate::identifiers::ProfileId;
use std::collections::BTreeMap;
use std::fmt;

/// Profile identifier used for every block hash in the ledger.
pub const DEFAULT_PROFILE: &str = "custody-canonical-v1";

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Provided JSON could not be canonicalized.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// Nesting exceeded the profile's depth limit.
    #[error("nesting deeper than {max} levels at {path}")]
    TooDeep {
        /// Location of the offending value.
        path: String,
        /// Configured limit.
        max: usize,
    },
    /// Failure reported by the RFC 8785 encoder.
    #[error("encoder error: {0}")]
    Encoder(String),
}

/// Result of canonicalization.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// Canonical UTF-8 bytes for the input value.
    pub bytes: Vec<u8>,
    /// Hygiene report describing strict-mode validation.
    pub report: HygieneReport,
}

/// JSON path used in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }

    fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes.
///
/// Object members are emitted in RFC 8785 order regardless of insertion
/// order, so two parties holding the same logical value always produce the
/// same bytes and therefore the same digest.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    profile: ProfileId,
    max_depth: usize,
}

impl Canonicalizer {
    /// Default nesting limit for payloads.
    pub const MAX_DEPTH: usize = 64;

    /// Creates a new canonicalizer for the provided profile.
    pub fn new(profile: ProfileId) -> Self {
        Self {
            profile,
            max_depth: Self::MAX_DEPTH,
        }
    }

    /// Canonicalizer for [`DEFAULT_PROFILE`].
    pub fn default_profile() -> Self {
        Self::new(ProfileId::new(DEFAULT_PROFILE.to_string()))
    }

    /// Profile this canonicalizer stamps on its reports.
    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Produces canonical bytes + hygiene report.
    pub fn canonicalize(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        self.canonicalize_with_report(value).map_err(|(err, _)| err)
    }

    /// Produces canonical bytes + hygiene report, returning the report even on error.
    pub fn canonicalize_with_report(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, (CanonicalizationError, HygieneReport)> {
        let mut report = HygieneReport {
            status: HygieneStatus::Ok,
            warnings: vec![],
            metrics: BTreeMap::new(),
            profile_id: self.profile.clone(),
        };

        if let Err(e) = self.validate(value, Path::root(), &mut report) {
            report.status = HygieneStatus::Invalid;
            return Err((e, report));
        }

        match to_string(value) {
            Ok(canonical) => Ok(CanonicalizationResult {
                bytes: canonical.into_bytes(),
                report,
            }),
            Err(err) => {
                report.status = HygieneStatus::Invalid;
                Err((CanonicalizationError::Encoder(err.to_string()), report))
            }
        }
    }

    fn validate(
        &self,
        value: &Value,
        path: Path,
        report: &mut HygieneReport,
    ) -> Result<(), CanonicalizationError> {
        if path.depth() > self.max_depth {
            report.warnings.push(HygieneWarning::new("TooDeep"));
            return Err(CanonicalizationError::TooDeep {
                path: path.to_string(),
                max: self.max_depth,
            });
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.validate(child, path.push_field(key), report)?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate(item, path.push_index(idx), report)?;
                }
                Ok(())
            }
            Value::Number(num) => {
                if let Some(f) = num.as_f64() {
                    if !f.is_finite() {
                        report.warnings.push(HygieneWarning::new("NonFiniteNumber"));
                        report
                            .metrics
                            .entry("non_finite_numbers".to_string())
                            .and_modify(|count| *count += 1)
                            .or_insert(1);
                        return Err(CanonicalizationError::NonFiniteNumber(path.to_string()));
                    }
                }
                if num.is_f64() {
                    report
                        .metrics
                        .entry("float_numbers".to_string())
                        .and_modify(|count| *count += 1)
                        .or_insert(1);
                }
                Ok(())
            }
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_bytes() {
        let c = Canonicalizer::default_profile();
        let a = c.canonicalize(&json!({"b": 1, "a": 2})).unwrap();
        let b = c.canonicalize(&json!({"a": 2, "b": 1})).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(String::from_utf8(a.bytes).unwrap(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn array_order_is_preserved() {
        let c = Canonicalizer::default_profile();
        let out = c.canonicalize(&json!([3, "x", 1])).unwrap();
        assert_eq!(String::from_utf8(out.bytes).unwrap(), r#"[3,"x",1]"#);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut value = json!(0);
        for _ in 0..(Canonicalizer::MAX_DEPTH + 2) {
            value = json!([value]);
        }
        let err = Canonicalizer::default_profile()
            .canonicalize(&value)
            .unwrap_err();
        assert!(matches!(err, CanonicalizationError::TooDeep { .. }));
    }

    #[test]
    fn float_metric_is_counted() {
        let out = Canonicalizer::default_profile()
            .canonicalize(&json!({"t": 21.5, "h": 40}))
            .unwrap();
        assert_eq!(out.report.metrics.get("float_numbers"), Some(&1));
        assert_eq!(out.report.status, HygieneStatus::Ok);
    }
}
