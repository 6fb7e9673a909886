// json-transform - Declarative tree-to-tree transformation of JSON-like documents
// Copyright (c) 2025 json-transform contributors
// Licensed under the MIT License

//! # json-transform
//!
//! Builds a new document from an input document and a mapping that says how
//! each output key is derived.
//!
//! A [`MappingSpec`] binds output keys to one of four [`Rule`]s:
//!
//! - `DirectPath` copies the value at a dot-delimited path (`"user.contact.email"`)
//! - `FieldWithDefault` copies a value or falls back to a default
//! - `ArrayMapping` transforms every object of an array with a nested mapping
//! - `Operation` hands several resolved values to a caller-supplied function
//!
//! ## Architecture
//!
//! - `value` - The [`Document`] model shared by input and output
//! - `path` - Dot-path resolution with distinct value / absence / error outcomes
//! - `mapping` - Rules, mapping specs and operation functions
//! - `evaluator` - The [`Transformer`] that applies a mapping
//! - `validate` - Optional pre-flight checks for mappings
//! - `functions` - Ready-made operation bodies
//!
//! ## Example
//!
//! ```
//! use json_transform::{functions, Document, MappingSpec, Transformer};
//!
//! let input = Document::from_json_str(r#"{
//!     "user": {
//!         "firstName": "John",
//!         "lastName": "Doe",
//!         "addresses": [{"type": "home", "city": "Boston"}]
//!     }
//! }"#).unwrap();
//!
//! let mapping = MappingSpec::new()
//!     .operation("fullName", ["user.firstName", "user.lastName"], functions::join(" "))
//!     .field("email", "user.contact.email", "unknown")
//!     .array(
//!         "addresses",
//!         "user.addresses",
//!         MappingSpec::new().path("addressType", "type").path("location", "city"),
//!     );
//!
//! let output = Transformer::new().transform(&input, &mapping).unwrap();
//! assert_eq!(
//!     output.to_json_string().unwrap(),
//!     r#"{"fullName":"John Doe","email":"unknown","addresses":[{"addressType":"home","location":"Boston"}]}"#
//! );
//! ```
//!
//! Transformers hold only configuration, are `Send + Sync`, and never mutate
//! their input. Operation functions must be `Send + Sync`; any side effects
//! they perform are not synchronized by the engine.

pub mod evaluator;
pub mod functions;
pub mod mapping;
pub mod path;
pub mod validate;
pub mod value;

pub use evaluator::{
    transform, DefaultPolicy, ErrorKind, RuleError, TransformError, TransformOptions, Transformer,
};
pub use mapping::{MappingSpec, Operation, OperationError, Rule};
pub use path::{resolve, PathError};
pub use validate::{validate, ValidationError, ValidationIssue};
pub use value::{Document, Map};
