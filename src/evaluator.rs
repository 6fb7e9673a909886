// Mapping evaluator
// Applies a MappingSpec to an input document and assembles the output object

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

use crate::mapping::{MappingSpec, Operation, OperationError, Rule};
use crate::path::{resolve, PathError};
use crate::value::{Document, Map};

/// Default limit on nested array mappings.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Errors raised while evaluating a single rule.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("{0}")]
    Path(#[from] PathError),

    #[error("missing required array at path '{path}'")]
    MissingRequiredPath { path: String },

    #[error("value at path '{path}' is not an array (found {found})")]
    NotAnArray { path: String, found: &'static str },

    #[error("array item at index {index} is not an object (found {found})")]
    ElementNotObject { index: usize, found: &'static str },

    #[error("array item at index {index}: {source}")]
    Element {
        index: usize,
        source: Box<TransformError>,
    },

    #[error("operation field '{field}': {source}")]
    OperationField { field: String, source: PathError },

    #[error("operation failed: {0}")]
    Operation(#[source] OperationError),
}

/// Transformation errors
///
/// Every rule failure is wrapped with the output key that produced it, so the
/// failing rule can be located with [`TransformError::location`].
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Type error: input document must be an object, found {found}")]
    InputNotObject { found: &'static str },

    #[error("error processing key '{key}': {source}")]
    Rule { key: String, source: Box<RuleError> },

    #[error("maximum array mapping depth ({limit}) exceeded")]
    DepthLimitExceeded { limit: usize },
}

/// Root-cause classification of a [`TransformError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Traversal through a non-object, a non-array array mapping, or a non-object element.
    StructuralType,
    /// An array mapping path was absent.
    MissingRequiredPath,
    /// A caller-supplied operation returned an error.
    Operation,
    /// Array mappings nested deeper than the configured limit.
    DepthLimit,
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::InputNotObject { .. } => ErrorKind::StructuralType,
            TransformError::Rule { source, .. } => source.kind(),
            TransformError::DepthLimitExceeded { .. } => ErrorKind::DepthLimit,
        }
    }

    /// Location of the failing rule, e.g. `people[1].fullName`.
    pub fn location(&self) -> String {
        let mut location = String::new();
        let mut current = self;
        while let TransformError::Rule { key, source } = current {
            if !location.is_empty() {
                location.push('.');
            }
            location.push_str(key);
            match &**source {
                RuleError::Element { index, source } => {
                    location.push_str(&format!("[{}]", index));
                    current = &**source;
                }
                RuleError::ElementNotObject { index, .. } => {
                    location.push_str(&format!("[{}]", index));
                    break;
                }
                _ => break,
            }
        }
        location
    }
}

impl RuleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::Path(_)
            | RuleError::NotAnArray { .. }
            | RuleError::ElementNotObject { .. }
            | RuleError::OperationField { .. } => ErrorKind::StructuralType,
            RuleError::MissingRequiredPath { .. } => ErrorKind::MissingRequiredPath,
            RuleError::Element { source, .. } => source.kind(),
            RuleError::Operation(_) => ErrorKind::Operation,
        }
    }
}

/// How `FieldWithDefault` treats a path that fails structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// Structural errors fall back to the default value.
    #[default]
    Lenient,
    /// Structural errors abort the transformation like any other rule.
    Strict,
}

/// Transformer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub default_policy: DefaultPolicy,
    pub max_depth: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            default_policy: DefaultPolicy::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TransformOptions {
    pub fn strict() -> Self {
        TransformOptions {
            default_policy: DefaultPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Evaluator for mapping specifications
///
/// Holds only configuration, so a single instance can be shared across
/// threads and reused for any number of calls.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new() -> Self {
        Transformer {
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(options: TransformOptions) -> Self {
        Transformer { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Apply `mapping` to `input`, producing a new object document.
    ///
    /// The input must be an object. The first failing rule aborts the whole
    /// call; no partial output is returned.
    #[instrument(level = "debug", skip_all, fields(rules = mapping.len()))]
    pub fn transform(
        &self,
        input: &Document,
        mapping: &MappingSpec,
    ) -> Result<Document, TransformError> {
        if !input.is_object() {
            return Err(TransformError::InputNotObject {
                found: input.type_name(),
            });
        }
        let output = self.transform_object(input, mapping, 0)?;
        debug!(keys = output.as_object().map_or(0, |m| m.len()), "transform complete");
        Ok(output)
    }

    fn transform_object(
        &self,
        input: &Document,
        mapping: &MappingSpec,
        depth: usize,
    ) -> Result<Document, TransformError> {
        if depth > self.options.max_depth {
            return Err(TransformError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }

        let mut output = Map::with_capacity(mapping.len());
        for (key, rule) in mapping {
            trace!(key = %key, rule = rule.kind(), depth, "evaluating rule");
            let value = self
                .evaluate_rule(input, key, rule, depth)
                .map_err(|source| TransformError::Rule {
                    key: key.clone(),
                    source: Box::new(source),
                })?;
            output.insert(key.clone(), value);
        }
        Ok(Document::object(output))
    }

    fn evaluate_rule(
        &self,
        input: &Document,
        key: &str,
        rule: &Rule,
        depth: usize,
    ) -> Result<Document, RuleError> {
        match rule {
            Rule::DirectPath(path) => Ok(resolve(input, path)?.cloned().unwrap_or(Document::Null)),

            Rule::FieldWithDefault { path, default } => match resolve(input, path) {
                Ok(Some(value)) if !value.is_null() => Ok(value.clone()),
                Ok(_) => Ok(default.clone()),
                Err(e) => match self.options.default_policy {
                    DefaultPolicy::Lenient => {
                        warn!(key, path = %path, error = %e, "structural path error replaced by default");
                        Ok(default.clone())
                    }
                    DefaultPolicy::Strict => Err(e.into()),
                },
            },

            Rule::ArrayMapping { path, mapping } => {
                self.evaluate_array_mapping(input, path, mapping, depth)
            }

            Rule::Operation(op) => evaluate_operation(input, op),
        }
    }

    fn evaluate_array_mapping(
        &self,
        input: &Document,
        path: &str,
        mapping: &MappingSpec,
        depth: usize,
    ) -> Result<Document, RuleError> {
        let items = match resolve(input, path)? {
            None => {
                return Err(RuleError::MissingRequiredPath {
                    path: path.to_string(),
                })
            }
            Some(Document::Array(items)) => items,
            Some(other) => {
                return Err(RuleError::NotAnArray {
                    path: path.to_string(),
                    found: other.type_name(),
                })
            }
        };

        let mut result = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(RuleError::ElementNotObject {
                    index,
                    found: item.type_name(),
                });
            }
            let transformed = self
                .transform_object(item, mapping, depth + 1)
                .map_err(|source| RuleError::Element {
                    index,
                    source: Box::new(source),
                })?;
            result.push(transformed);
        }
        Ok(Document::array(result))
    }
}

fn evaluate_operation(input: &Document, op: &Operation) -> Result<Document, RuleError> {
    let mut values = Vec::with_capacity(op.fields().len());
    for field in op.fields() {
        let value = resolve(input, field).map_err(|source| RuleError::OperationField {
            field: field.clone(),
            source,
        })?;
        values.push(value.cloned());
    }
    op.call(&values).map_err(RuleError::Operation)
}

/// Transform `input` with default options.
///
/// # Examples
///
/// ```
/// use json_transform::{document, transform, MappingSpec};
///
/// let input = document!({"user": {"firstName": "John", "lastName": "Doe", "age": 30}});
/// let mapping = MappingSpec::new().path("age", "user.age");
/// assert_eq!(transform(&input, &mapping).unwrap(), document!({"age": 30}));
/// ```
pub fn transform(input: &Document, mapping: &MappingSpec) -> Result<Document, TransformError> {
    Transformer::new().transform(input, mapping)
}
