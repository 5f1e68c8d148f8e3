//! Tests for Java class generation from data models.
mod common;
use common::*;
use drlforge::model::{class_file_path, generate_all};
use drlforge::prelude::*;
use serde_json::json;

#[test]
fn test_customer_class_shape() {
    let source = generate_class(&create_customer_model()).expect("Failed to generate");

    assert!(source.starts_with("package com.example.model;\n\npublic class Customer {\n"));
    assert!(source.contains("    private String name;\n"));
    assert!(source.contains("    private double age;\n"));

    assert_eq!(source.matches("public Customer(").count(), 2);
    assert!(source.contains("    public Customer() {\n    }"));
    assert!(source.contains("    public Customer(String name) {\n        this.name = name;\n    }"));

    for accessor in [
        "public String getName()",
        "public void setName(String name)",
        "public double getAge()",
        "public void setAge(double age)",
    ] {
        assert!(source.contains(accessor), "Missing accessor: {}", accessor);
    }

    assert!(source.contains("return \"Customer{\" +\n            \"name=\" + name +\n            \", age=\" + age +\n            \"}\";"));
    assert!(source.contains("java.util.Objects.equals(name, that.name) &&\n            age == that.age;"));
    assert!(source.contains("return java.util.Objects.hash(name, age);"));
    assert!(source.trim_end().ends_with('}'));
}

#[test]
fn test_no_required_fields_means_one_constructor() {
    let model = DataModel::new("Flag", "com.example").with_field(DataModelField::new("on", FieldType::Boolean));
    let source = generate_class(&model).unwrap();
    assert_eq!(source.matches("public Flag(").count(), 1);
}

#[test]
fn test_collection_and_date_fields() {
    let model = DataModel::new("Order", "com.shop")
        .with_field(DataModelField::new("id", FieldType::String).required())
        .with_field(DataModelField::new("placedAt", FieldType::Date))
        .with_field(DataModelField::new("items", FieldType::Array).with_items_type("string"))
        .with_field(DataModelField::new("prices", FieldType::Array).with_items_type("number"));
    let source = generate_class(&model).unwrap();

    assert!(source.contains(
        "package com.shop;\n\nimport java.time.LocalDateTime;\nimport java.util.List;\nimport java.util.ArrayList;\n\npublic class Order {"
    ));
    assert_eq!(source.matches("import java.util.List;").count(), 1);
    assert!(source.contains("    private LocalDateTime placedAt;\n"));
    assert!(source.contains("    private List<String> items;\n"));
    assert!(source.contains("    private List<Double> prices;\n"));

    // Both constructors pre-populate the collections.
    assert_eq!(source.matches("this.items = new ArrayList<>();").count(), 2);
    assert!(source.contains(
        "    public Order(String id) {\n        this.id = id;\n        this.items = new ArrayList<>();\n        this.prices = new ArrayList<>();\n    }"
    ));
    assert!(!source.contains("this.placedAt ="));
}

#[test]
fn test_default_values_and_descriptions() {
    let model = DataModel::new("Account", "com.bank")
        .with_field(
            DataModelField::new("status", FieldType::Enum)
                .with_default(json!("NEW"))
                .with_description("Lifecycle state"),
        )
        .with_field(DataModelField::new("active", FieldType::Boolean).with_default(json!(true)))
        .with_field(DataModelField::new("limit", FieldType::Number).with_default(json!(2500)))
        .with_field(DataModelField::new("owner", FieldType::Object).with_object_type("Person"));
    let source = generate_class(&model).unwrap();

    assert!(source.contains("    /**\n     * Lifecycle state\n     */\n    private String status;"));
    assert!(source.contains("        this.status = \"NEW\";\n"));
    assert!(source.contains("        this.active = true;\n"));
    assert!(source.contains("        this.limit = 2500;\n"));
    assert!(source.contains("    private Person owner;\n"));
    assert!(source.contains("java.util.Objects.equals(owner, that.owner)"));
    assert!(source.contains("active == that.active"));
}

#[test]
fn test_descriptions_and_object_defaults_stay_valid_java() {
    let model = DataModel::new("Shipment", "com.example")
        .with_field(
            DataModelField::new("note", FieldType::String)
                .with_description("Free text, never contains */ markers"),
        )
        .with_field(
            DataModelField::new("address", FieldType::Object)
                .with_object_type("Address")
                .with_default(json!({"city": "Oslo"})),
        )
        .with_field(
            DataModelField::new("carrier", FieldType::Object)
                .with_object_type("Carrier")
                .with_default(json!("new Carrier()")),
        );
    let source = generate_class(&model).unwrap();

    assert!(source.contains("     * Free text, never contains *&#47; markers\n     */\n"));
    assert_eq!(source.matches("*/").count(), 1);
    assert!(source.contains("        this.address = null;\n"));
    assert!(source.contains("        this.carrier = new Carrier();\n"));
    assert!(!source.contains("Oslo"));
}

#[test]
fn test_model_without_fields() {
    let source = generate_class(&DataModel::new("Marker", "com.example")).unwrap();
    assert!(source.contains("return true;\n    }"));
    assert!(source.contains("return java.util.Objects.hash();"));
    assert!(source.contains("return \"Marker{\" +\n            \"}\";"));
}

#[test]
fn test_invalid_names_are_rejected() {
    let lower = DataModel::new("customer", "com.example");
    assert_eq!(
        generate_class(&lower).unwrap_err(),
        ModelError::InvalidClassName {
            name: "customer".to_string()
        }
    );

    for bad in ["first-name", "2nd", "class"] {
        let model = DataModel::new("Customer", "com.example")
            .with_field(DataModelField::new(bad, FieldType::String));
        match generate_class(&model) {
            Err(ModelError::InvalidFieldName { model, field }) => {
                assert_eq!(model, "Customer");
                assert_eq!(field, bad);
            }
            other => panic!("Expected InvalidFieldName for '{}', got {:?}", bad, other),
        }
    }
}

#[test]
fn test_generate_all_keys_by_path() {
    let models = vec![
        create_customer_model(),
        DataModel::new("Address", "com.example.model"),
    ];
    let sources = generate_all(&models).unwrap();

    let paths: Vec<&str> = sources.keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec!["com/example/model/Address.java", "com/example/model/Customer.java"]
    );
    assert_eq!(class_file_path(&models[0]), "com/example/model/Customer.java");
}

#[test]
fn test_generate_all_names_the_failing_model() {
    let mut broken = DataModel::new("bad", "com.example");
    broken.id = "m2".to_string();
    let models = vec![create_customer_model(), broken];

    let err = generate_all(&models).unwrap_err();
    match &err {
        ModelError::ModelFailed {
            model_id,
            model_name,
            source,
        } => {
            assert_eq!(model_id, "m2");
            assert_eq!(model_name, "bad");
            assert!(matches!(**source, ModelError::InvalidClassName { .. }));
        }
        other => panic!("Expected ModelFailed, got {:?}", other),
    }
    assert!(err.to_string().contains("'m2' (bad)"));
}

#[test]
fn test_models_deserialize_from_editor_json() {
    let model: DataModel = serde_json::from_value(json!({
        "id": "m1",
        "name": "Customer",
        "packageName": "com.example.model",
        "fields": [
            { "name": "name", "type": "string", "required": true },
            { "name": "tags", "type": "array", "itemsType": "string", "defaultValue": [] }
        ]
    }))
    .unwrap();

    assert_eq!(model.version, "1.0.0");
    assert_eq!(model.fields[1].field_type, FieldType::Array);
    assert_eq!(model.fields[1].items_type.as_deref(), Some("string"));
    assert!(generate_class(&model).is_ok());
}
