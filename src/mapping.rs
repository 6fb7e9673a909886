// Mapping specifications: output key → rule

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::value::Document;

/// Error returned by a caller-supplied operation function.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct OperationError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        OperationError {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`.
    pub fn from_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        OperationError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Signature of an operation body.
///
/// Receives one slot per field path, in field order. `None` means the path
/// was absent; `Some(Document::Null)` means it held an explicit null.
pub type OperationFn =
    dyn Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync;

/// A derived value computed from several input paths.
///
/// The engine only resolves the fields and invokes the function. Side effects
/// inside the function are not synchronized by the engine.
#[derive(Clone)]
pub struct Operation {
    fields: Vec<String>,
    func: Arc<OperationFn>,
}

impl Operation {
    pub fn new<I, S, F>(fields: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync + 'static,
    {
        Operation {
            fields: fields.into_iter().map(Into::into).collect(),
            func: Arc::new(func),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn call(&self, values: &[Option<Document>]) -> Result<Document, OperationError> {
        (self.func)(values)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// A single mapping instruction.
#[derive(Clone, Debug)]
pub enum Rule {
    /// Copy the value at the path; absence becomes `null`.
    DirectPath(String),

    /// Copy the value at the path, or `default` when it does not resolve.
    FieldWithDefault { path: String, default: Document },

    /// Transform every object in the array at `path` with `mapping`.
    ArrayMapping { path: String, mapping: MappingSpec },

    /// Compute a value from several paths.
    Operation(Operation),
}

impl Rule {
    pub fn path(path: impl Into<String>) -> Self {
        Rule::DirectPath(path.into())
    }

    pub fn field(path: impl Into<String>, default: impl Into<Document>) -> Self {
        Rule::FieldWithDefault {
            path: path.into(),
            default: default.into(),
        }
    }

    pub fn array(path: impl Into<String>, mapping: MappingSpec) -> Self {
        Rule::ArrayMapping {
            path: path.into(),
            mapping,
        }
    }

    pub fn operation<I, S, F>(fields: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync + 'static,
    {
        Rule::Operation(Operation::new(fields, func))
    }

    /// Rule variant name, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::DirectPath(_) => "direct_path",
            Rule::FieldWithDefault { .. } => "field_with_default",
            Rule::ArrayMapping { .. } => "array_mapping",
            Rule::Operation(_) => "operation",
        }
    }
}

impl From<&str> for Rule {
    fn from(path: &str) -> Self {
        Rule::DirectPath(path.to_string())
    }
}

impl From<String> for Rule {
    fn from(path: String) -> Self {
        Rule::DirectPath(path)
    }
}

impl From<Operation> for Rule {
    fn from(op: Operation) -> Self {
        Rule::Operation(op)
    }
}

/// Ordered mapping from output key to [`Rule`].
///
/// Output documents list their keys in the order rules were inserted.
///
/// # Examples
///
/// ```
/// use json_transform::{MappingSpec, Rule};
///
/// let mapping = MappingSpec::new()
///     .path("age", "user.age")
///     .field("email", "user.contact.email", "unknown")
///     .array(
///         "addresses",
///         "user.addresses",
///         MappingSpec::new().path("city", "city"),
///     );
/// assert_eq!(mapping.len(), 3);
/// assert!(matches!(mapping.get("age"), Some(Rule::DirectPath(p)) if p == "user.age"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MappingSpec {
    rules: IndexMap<String, Rule>,
}

impl MappingSpec {
    pub fn new() -> Self {
        MappingSpec {
            rules: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MappingSpec {
            rules: IndexMap::with_capacity(capacity),
        }
    }

    /// Maps every key to a `DirectPath` of the same name.
    pub fn identity<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter()
            .map(|k| {
                let k = k.into();
                (k.clone(), Rule::DirectPath(k))
            })
            .collect()
    }

    /// Insert a rule, returning the rule previously bound to `key`.
    pub fn insert(&mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Option<Rule> {
        self.rules.insert(key.into(), rule.into())
    }

    /// Chained form of [`insert`](Self::insert).
    pub fn rule(mut self, key: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn path(self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.rule(key, Rule::path(path))
    }

    pub fn field(
        self,
        key: impl Into<String>,
        path: impl Into<String>,
        default: impl Into<Document>,
    ) -> Self {
        self.rule(key, Rule::field(path, default))
    }

    /// A `FieldWithDefault` whose default is `null`.
    pub fn field_or_null(self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.rule(key, Rule::field(path, Document::Null))
    }

    pub fn array(self, key: impl Into<String>, path: impl Into<String>, mapping: MappingSpec) -> Self {
        self.rule(key, Rule::array(path, mapping))
    }

    pub fn operation<I, S, F>(self, key: impl Into<String>, fields: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync + 'static,
    {
        self.rule(key, Rule::operation(fields, func))
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Rule> {
        self.rules.iter()
    }
}

impl<K: Into<String>, R: Into<Rule>> FromIterator<(K, R)> for MappingSpec {
    fn from_iter<T: IntoIterator<Item = (K, R)>>(iter: T) -> Self {
        MappingSpec {
            rules: iter.into_iter().map(|(k, r)| (k.into(), r.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MappingSpec {
    type Item = (&'a String, &'a Rule);
    type IntoIter = indexmap::map::Iter<'a, String, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
