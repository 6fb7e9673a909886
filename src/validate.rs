// Optional pre-flight checks for mapping specifications

use std::fmt;

use thiserror::Error;

use crate::mapping::{MappingSpec, Rule};
use crate::path::segments;

/// Problem found in a mapping specification
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// A rule path is the empty string.
    EmptyPath,
    /// A rule path has an empty segment (`a..b`, `.a`, `a.`).
    EmptySegment { path: String },
    /// An operation lists no fields.
    NoOperationFields,
}

/// A validation finding, located by output key (`people[].city`).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::EmptyPath => write!(f, "{}: empty path", self.location),
            IssueKind::EmptySegment { path } => {
                write!(f, "{}: path '{}' has an empty segment", self.location, path)
            }
            IssueKind::NoOperationFields => write!(f, "{}: operation has no fields", self.location),
        }
    }
}

/// Mapping validation errors
#[derive(Error, Debug)]
#[error("invalid mapping: {}", .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

/// Check a mapping and all nested array sub-mappings.
///
/// Validation is never run by the evaluator itself; call it once when a
/// mapping is built if you want typos reported up front.
pub fn validate(mapping: &MappingSpec) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    validate_level(mapping, "", &mut issues);
    issues
}

fn validate_level(mapping: &MappingSpec, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for (key, rule) in mapping {
        let location = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match rule {
            Rule::DirectPath(path) | Rule::FieldWithDefault { path, .. } => {
                check_path(path, &location, issues);
            }
            Rule::ArrayMapping { path, mapping } => {
                check_path(path, &location, issues);
                validate_level(mapping, &format!("{}[]", location), issues);
            }
            Rule::Operation(op) => {
                if op.fields().is_empty() {
                    issues.push(ValidationIssue {
                        location: location.clone(),
                        kind: IssueKind::NoOperationFields,
                    });
                }
                for field in op.fields() {
                    check_path(field, &location, issues);
                }
            }
        }
    }
}

fn check_path(path: &str, location: &str, issues: &mut Vec<ValidationIssue>) {
    let kind = if path.is_empty() {
        IssueKind::EmptyPath
    } else if segments(path).iter().any(|s| s.is_empty()) {
        IssueKind::EmptySegment {
            path: path.to_string(),
        }
    } else {
        return;
    };
    issues.push(ValidationIssue {
        location: location.to_string(),
        kind,
    });
}

impl MappingSpec {
    /// Run [`validate`] and turn any findings into an error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let issues = validate(self);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}
