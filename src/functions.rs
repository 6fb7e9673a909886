// Stock operation bodies for common derived fields

use crate::mapping::OperationError;
use crate::value::Document;

/// Join present, non-null values with `separator`.
///
/// Strings are used verbatim; other values use their JSON rendering.
///
/// ```
/// use json_transform::{document, functions, transform, MappingSpec};
///
/// let input = document!({"user": {"firstName": "John", "lastName": "Doe"}});
/// let mapping = MappingSpec::new().operation(
///     "fullName",
///     ["user.firstName", "user.lastName"],
///     functions::join(" "),
/// );
/// assert_eq!(transform(&input, &mapping).unwrap(), document!({"fullName": "John Doe"}));
/// ```
pub fn join(
    separator: impl Into<String>,
) -> impl Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync + 'static {
    let separator = separator.into();
    move |values: &[Option<Document>]| {
        let parts: Vec<String> = values
            .iter()
            .flatten()
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Document::String(s) => s.to_string(),
                other => other.to_string(),
            })
            .collect();
        Ok(Document::from(parts.join(&separator)))
    }
}

/// First present, non-null value, or `null` when there is none.
pub fn coalesce(
) -> impl Fn(&[Option<Document>]) -> Result<Document, OperationError> + Send + Sync + 'static {
    |values: &[Option<Document>]| {
        Ok(values
            .iter()
            .flatten()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Document::Null))
    }
}
