use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declared data model: one generated class per model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub package_name: String,
    #[serde(default)]
    pub fields: Vec<DataModelField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_model_version")]
    pub version: String,
}

fn default_model_version() -> String {
    "1.0.0".to_string()
}

impl DataModel {
    pub fn new(name: &str, package_name: &str) -> Self {
        Self {
            id: name.to_lowercase(),
            name: name.to_string(),
            package_name: package_name.to_string(),
            fields: Vec::new(),
            description: None,
            version: default_model_version(),
        }
    }

    pub fn with_field(mut self, field: DataModelField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &DataModelField> {
        self.fields.iter().filter(|f| f.required)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Object,
    Array,
}

impl FieldType {
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            "string" => Some(FieldType::String),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            "date" => Some(FieldType::Date),
            "enum" => Some(FieldType::Enum),
            "object" => Some(FieldType::Object),
            "array" => Some(FieldType::Array),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelField {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
}

impl DataModelField {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            field_type,
            required: false,
            default_value: None,
            description: None,
            enum_values: None,
            items_type: None,
            object_type: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_items_type(mut self, items_type: &str) -> Self {
        self.items_type = Some(items_type.to_string());
        self
    }

    pub fn with_object_type(mut self, object_type: &str) -> Self {
        self.object_type = Some(object_type.to_string());
        self
    }
}
