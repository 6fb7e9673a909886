// Demonstration of the transformation engine
//
// Reshapes a user record: derived full name, copied age, email with a
// fallback, and a per-address sub-mapping.
//
// Run:
//   cargo run --example transform_demo

use json_transform::{functions, Document, MappingSpec, Transformer};
use serde_json::json;
use tracing::Level;

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    println!("=== Transformation Demo ===\n");

    let input: Document = json!({
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
    .into();

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

    if let Err(e) = mapping.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match Transformer::new().transform(&input, &mapping) {
        Ok(result) => match result.to_json_string_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        },
        Err(e) => {
            eprintln!("Transform failed at {}: {}", e.location(), e);
            std::process::exit(1);
        }
    }
}
