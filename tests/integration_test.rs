// Integration tests for Path Resolver + Transformer
//
// These tests run complete mappings against JSON fixtures, the way a caller
// decoding a payload and encoding the result would.

use std::sync::Arc;
use std::thread;

use json_transform::{
    functions, resolve, transform, Document, ErrorKind, MappingSpec, OperationError, PathError,
    Rule, TransformOptions, Transformer,
};
use serde_json::json;

fn user_fixture() -> Document {
    json!({
        "user": {
            "firstName": "John",
            "lastName": "Doe",
            "age": 30,
            "contact": {
                "email": "john@example.com",
                "phone": "1234567890"
            },
            "addresses": [
                {"type": "home", "street": "123 Main St", "city": "Boston", "country": "USA"},
                {"type": "work", "street": "456 Corp Ave", "city": "New York", "country": "USA"}
            ]
        }
    })
    .into()
}

#[test]
fn test_simple_field_copy() {
    let input: Document = json!({
        "user": {"firstName": "John", "lastName": "Doe", "age": 30}
    })
    .into();

    let mapping = MappingSpec::new().path("age", "user.age");
    let result = transform(&input, &mapping).unwrap();

    assert_eq!(result, Document::from(json!({"age": 30})));
    assert_eq!(result.to_json_string().unwrap(), r#"{"age":30}"#);
}

#[test]
fn test_default_for_missing_path() {
    let input: Document = json!({"name": "Jane"}).into();

    let mapping = MappingSpec::new().field("x", "missing.path", "N/A");
    let result = transform(&input, &mapping).unwrap();

    assert_eq!(result, Document::from(json!({"x": "N/A"})));
}

#[test]
fn test_direct_paths_return_exactly_mapping_keys() {
    let input = user_fixture();
    let mapping = MappingSpec::new()
        .path("first", "user.firstName")
        .path("email", "user.contact.email")
        .path("addresses", "user.addresses")
        .path("user", "user");

    let result = transform(&input, &mapping).unwrap();
    let keys: Vec<&str> = result.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["first", "email", "addresses", "user"]);

    for (key, rule) in &mapping {
        let Rule::DirectPath(path) = rule else {
            panic!("expected direct path rule");
        };
        assert_eq!(result.get(key), resolve(&input, path).unwrap());
    }
}

#[test]
fn test_full_user_example() {
    let mapping = MappingSpec::new()
        .operation(
            "fullName",
            ["user.firstName", "user.lastName"],
            functions::join(" "),
        )
        .path("age", "user.age")
        .field_or_null("contact", "user.contact.email")
        .array(
            "addresses",
            "user.addresses",
            MappingSpec::new()
                .path("addressType", "type")
                .path("location", "city")
                .path("country", "country"),
        );

    let result = transform(&user_fixture(), &mapping).unwrap();

    assert_eq!(
        serde_json::Value::from(&result),
        json!({
            "fullName": "John Doe",
            "age": 30,
            "contact": "john@example.com",
            "addresses": [
                {"addressType": "home", "location": "Boston", "country": "USA"},
                {"addressType": "work", "location": "New York", "country": "USA"}
            ]
        })
    );
}

#[test]
fn test_empty_array_maps_to_empty_array() {
    let input: Document = json!({"orders": []}).into();
    let mapping = MappingSpec::new().array("orders", "orders", MappingSpec::new().path("id", "id"));

    let result = transform(&input, &mapping).unwrap();
    assert_eq!(result, Document::from(json!({"orders": []})));
}

#[test]
fn test_missing_array_is_an_error() {
    let input: Document = json!({"name": "Jane"}).into();
    let mapping = MappingSpec::new().array("orders", "orders", MappingSpec::new());

    let err = transform(&input, &mapping).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredPath);
    assert_eq!(err.location(), "orders");
    assert!(err.to_string().contains("missing required array at path 'orders'"));
}

#[test]
fn test_null_array_is_a_type_error() {
    let input: Document = json!({"orders": null}).into();
    let mapping = MappingSpec::new().array("orders", "orders", MappingSpec::new());

    let err = transform(&input, &mapping).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralType);
}

#[test]
fn test_nested_array_mappings_preserve_order() {
    let input: Document = json!({
        "departments": [
            {"name": "R&D", "teams": [
                {"name": "core", "members": [{"id": 1}, {"id": 2}]},
                {"name": "infra", "members": []}
            ]},
            {"name": "Sales", "teams": [
                {"name": "emea", "members": [{"id": 3}]}
            ]}
        ]
    })
    .into();

    let members = MappingSpec::new().path("memberId", "id");
    let teams = MappingSpec::new()
        .path("team", "name")
        .array("people", "members", members);
    let mapping = MappingSpec::new().array(
        "org",
        "departments",
        MappingSpec::new().path("dept", "name").array("groups", "teams", teams),
    );

    let result = transform(&input, &mapping).unwrap();
    assert_eq!(
        serde_json::Value::from(&result),
        json!({
            "org": [
                {"dept": "R&D", "groups": [
                    {"team": "core", "people": [{"memberId": 1}, {"memberId": 2}]},
                    {"team": "infra", "people": []}
                ]},
                {"dept": "Sales", "groups": [
                    {"team": "emea", "people": [{"memberId": 3}]}
                ]}
            ]
        })
    );
}

#[test]
fn test_operation_concatenation() {
    let input: Document = json!({"a": "John", "b": "Doe"}).into();
    let mapping = MappingSpec::new().operation("name", ["a", "b"], |values| {
        let first = values[0].as_ref().and_then(Document::as_str).unwrap_or_default();
        let last = values[1].as_ref().and_then(Document::as_str).unwrap_or_default();
        Ok(Document::from(format!("{} {}", first, last)))
    });

    let result = transform(&input, &mapping).unwrap();
    assert_eq!(result.get("name"), Some(&Document::string("John Doe")));
}

#[test]
fn test_operation_error_is_wrapped_with_key() {
    let input: Document = json!({"age": "thirty"}).into();
    let mapping = MappingSpec::new().operation("ageNextYear", ["age"], |values| {
        let raw = values[0].as_ref().and_then(Document::as_str).unwrap_or_default();
        let age: i64 = raw
            .parse()
            .map_err(|e| OperationError::from_source("age is not numeric", e))?;
        Ok(Document::from(age + 1))
    });

    let err = transform(&input, &mapping).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Operation);
    assert_eq!(err.location(), "ageNextYear");
    assert_eq!(
        err.to_string(),
        "error processing key 'ageNextYear': operation failed: age is not numeric"
    );
}

#[test]
fn test_identity_mapping_is_idempotent() {
    let mapping = MappingSpec::new()
        .path("name", "user.firstName")
        .path("contact", "user.contact")
        .array("places", "user.addresses", MappingSpec::new().path("city", "city"));
    let output = transform(&user_fixture(), &mapping).unwrap();

    let identity = MappingSpec::identity(mapping.keys());
    let again = transform(&output, &identity).unwrap();
    assert_eq!(again, output);
}

#[test]
fn test_structural_error_on_scalar_traversal() {
    let input: Document = json!({"a": "scalar"}).into();

    let err = resolve(&input, "a.b").unwrap_err();
    assert!(matches!(err, PathError::NotAnObject { ref segment, .. } if segment == "a"));

    let err = transform(&input, &MappingSpec::new().path("out", "a.b")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralType);
}

#[test]
fn test_strict_defaults_surface_typos() {
    let input = user_fixture();
    // user.age is a number, so "user.age.years" cannot resolve
    let mapping = MappingSpec::new().field("years", "user.age.years", 0);

    let lenient = Transformer::new().transform(&input, &mapping).unwrap();
    assert_eq!(lenient.get("years"), Some(&Document::from(0)));

    let strict = Transformer::with_options(
        TransformOptions::from_json_str(r#"{"default_policy": "strict"}"#).unwrap(),
    );
    let err = strict.transform(&input, &mapping).unwrap_err();
    assert_eq!(err.location(), "years");
}

#[test]
fn test_input_is_not_mutated() {
    let input = user_fixture();
    let before = input.to_json_string().unwrap();
    let mapping = MappingSpec::new()
        .path("a", "user.contact")
        .array("b", "user.addresses", MappingSpec::new().path("c", "city"));
    transform(&input, &mapping).unwrap();
    assert_eq!(input.to_json_string().unwrap(), before);
}

#[test]
fn test_json_round_trip_through_engine() {
    let payload = r#"{"order":{"id":"ORD-123","items":[{"sku":"A1","qty":2},{"sku":"B7","qty":1}]}}"#;
    let input = Document::from_json_str(payload).unwrap();
    let mapping = MappingSpec::new()
        .path("orderId", "order.id")
        .array("lines", "order.items", MappingSpec::new().path("sku", "sku").path("quantity", "qty"));

    let output = transform(&input, &mapping).unwrap();
    assert_eq!(
        output.to_json_string().unwrap(),
        r#"{"orderId":"ORD-123","lines":[{"sku":"A1","quantity":2},{"sku":"B7","quantity":1}]}"#
    );
}

#[test]
fn test_large_integers_pass_through_unchanged() {
    let payload = r#"{"n":9223372036854775808,"id":"id","big":10000000000000000000}"#;
    let input = Document::from_json_str(payload).unwrap();
    let mapping = MappingSpec::new()
        .path("n", "n")
        .operation("key", ["id", "big"], functions::join("-"));

    let output = transform(&input, &mapping).unwrap();
    assert_eq!(
        output.to_json_string().unwrap(),
        r#"{"n":9223372036854775808,"key":"id-10000000000000000000"}"#
    );
    assert_eq!(
        serde_json::Value::from(&output)["n"],
        json!(9_223_372_036_854_775_808_u64)
    );
}

#[test]
fn test_concurrent_transforms_share_engine() {
    let transformer = Arc::new(Transformer::new());
    let mapping = Arc::new(
        MappingSpec::new()
            .path("id", "id")
            .operation("label", ["id"], |values| {
                Ok(Document::from(format!("item-{}", values[0].clone().unwrap_or_default())))
            }),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let transformer = Arc::clone(&transformer);
            let mapping = Arc::clone(&mapping);
            thread::spawn(move || {
                let input: Document = json!({"id": i}).into();
                transformer.transform(&input, &mapping).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap();
        assert_eq!(output.get("label"), Some(&Document::from(format!("item-{}", i))));
    }
}
