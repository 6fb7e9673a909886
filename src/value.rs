// Document: Arc-wrapped value type shared by transformation input and output

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Ordered object body of a [`Document`].
pub type Map = IndexMap<String, Document>;

/// A JSON-like value that clones in O(1).
///
/// Strings, arrays and objects sit behind `Arc`, so a resolved sub-tree is
/// shared with the output document rather than copied. Objects keep
/// insertion order. Numbers are kept as [`serde_json::Number`], which holds
/// any `i64` or `u64` exactly and falls back to `f64` for everything else.
///
/// The serde impls are untagged: a `Document` reads and writes plain JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Array(Arc<Vec<Document>>),
    Object(Arc<Map>),
}

impl Document {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Document::String(s.into())
    }

    pub fn array(items: Vec<Document>) -> Self {
        Document::Array(Arc::new(items))
    }

    pub fn object(map: Map) -> Self {
        Document::Object(Arc::new(map))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Document::Array(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Document::Object(_))
    }

    /// Short name of the variant, used in type error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "boolean",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Array(_) => "array",
            Document::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Document::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Document, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Compact JSON text, as produced by [`Document::to_json_string`].
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Document::Bool(b)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Document {
                fn from(n: $ty) -> Self {
                    Document::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i32, i64, usize);

/// NaN and the infinities have no JSON spelling and become `Null`.
impl From<f64> for Document {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Document::Null, Document::Number)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.into())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s.into())
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Document::array(items)
    }
}

impl From<Map> for Document {
    fn from(map: Map) -> Self {
        Document::object(map)
    }
}

impl From<serde_json::Value> for Document {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s.into()),
            Value::Array(items) => items.into_iter().map(Document::from).collect::<Vec<_>>().into(),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, Document::from(v)))
                .collect::<Map>()
                .into(),
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(doc: &Document) -> Self {
        use serde_json::Value;

        match doc {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => Value::Number(n.clone()),
            Document::String(s) => Value::String(s.to_string()),
            Document::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Document::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Build a [`Document`] from a JSON-like literal.
///
/// ```
/// use json_transform::document;
///
/// let doc = document!({"name": "Alice", "tags": ["a", "b"], "manager": null});
/// assert_eq!(doc.to_string(), r#"{"name":"Alice","tags":["a","b"],"manager":null}"#);
/// ```
///
/// Keys and leaves may be any expression; leaves go through `Document::from`.
#[macro_export]
macro_rules! document {
    (null) => {
        $crate::value::Document::Null
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::value::Document::array(vec![ $( $crate::document!($elem) ),* ])
    };

    ({ $($key:tt : $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::value::Map::new();
        $( map.insert(($key).to_string(), $crate::document!($val)); )*
        $crate::value::Document::object(map)
    }};

    ($other:expr) => {
        $crate::value::Document::from($other)
    };
}
