// Dot-delimited path resolution over nested object documents

use thiserror::Error;
use tracing::trace;

use crate::value::Document;

/// Path resolution errors
///
/// Only structural problems are errors. A key that does not exist at any
/// level is reported as absence (`Ok(None)`) by [`resolve`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("invalid path: cannot resolve against a {found} root, expected an object")]
    RootNotObject { found: &'static str },

    #[error("invalid path '{path}': '{segment}' is not an object (found {found})")]
    NotAnObject {
        path: String,
        segment: String,
        found: &'static str,
    },
}

/// Resolve `path` against `root`.
///
/// Returns `Ok(Some(value))` when every segment exists (a present `null` is
/// `Some(&Document::Null)`), `Ok(None)` when a key is missing at any level,
/// and `Err` when an intermediate segment holds something other than an
/// object. An empty path resolves to absence.
///
/// # Examples
///
/// ```
/// use json_transform::{document, path::resolve};
///
/// let doc = document!({"user": {"contact": {"email": "john@example.com"}}});
/// let email = resolve(&doc, "user.contact.email").unwrap();
/// assert_eq!(email.and_then(|v| v.as_str()), Some("john@example.com"));
///
/// assert!(resolve(&doc, "user.phone").unwrap().is_none());
/// assert!(resolve(&doc, "user.contact.email.domain").is_err());
/// ```
pub fn resolve<'a>(root: &'a Document, path: &str) -> Result<Option<&'a Document>, PathError> {
    if path.is_empty() {
        trace!("empty path resolves to absence");
        return Ok(None);
    }

    let mut current = root.as_object().ok_or(PathError::RootNotObject {
        found: root.type_name(),
    })?;

    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        match current.get(segment) {
            None => return Ok(None),
            Some(Document::Object(next)) => current = &**next,
            Some(other) => {
                return Err(PathError::NotAnObject {
                    path: path.to_string(),
                    segment: segment.to_string(),
                    found: other.type_name(),
                })
            }
        }
    }

    Ok(current.get(last))
}

/// Split a path into its segments. An empty path has no segments.
pub fn segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}
