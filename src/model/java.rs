use super::definition::{DataModel, DataModelField, FieldType};
use crate::error::ModelError;
use crate::value::escape_string;
use itertools::Itertools;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, error};

static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9_$]*$").unwrap());
static FIELD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").unwrap());

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

const INDENT: &str = "    ";

/// Generates the Java source of one data model.
///
/// Fails if the model name is not a valid class name or any field name is not
/// a valid, non-reserved Java identifier.
pub fn generate_class(model: &DataModel) -> Result<String, ModelError> {
    validate_model(model)?;

    let mut sections = Vec::new();
    sections.extend(model.fields.iter().map(field_declaration));
    sections.push(constructors(model));
    for field in &model.fields {
        sections.push(getter(field));
        sections.push(setter(field));
    }
    sections.push(to_string_method(model));
    sections.push(equals_method(model));
    sections.push(hash_code_method(model));

    let mut source = String::new();
    if !model.package_name.is_empty() {
        source.push_str(&format!("package {};\n\n", model.package_name));
    }
    let imports = imports_for(model);
    if !imports.is_empty() {
        source.push_str(&imports.join("\n"));
        source.push_str("\n\n");
    }
    source.push_str(&format!("public class {} {{\n\n", model.name));
    source.push_str(&sections.join("\n\n"));
    source.push_str("\n}\n");
    Ok(source)
}

/// Generates every model, keyed by the source file path inside an archive.
///
/// Stops at the first model that fails validation; the returned error names it.
pub fn generate_all(models: &[DataModel]) -> Result<BTreeMap<String, String>, ModelError> {
    let mut sources = BTreeMap::new();
    for model in models {
        match generate_class(model) {
            Ok(source) => {
                debug!(model = %model.name, fields = model.fields.len(), "Generated data model class");
                sources.insert(class_file_path(model), source);
            }
            Err(err) => {
                error!(model = %model.name, %err, "Failed to generate data model class");
                return Err(ModelError::ModelFailed {
                    model_id: model.id.clone(),
                    model_name: model.name.clone(),
                    source: Box::new(err),
                });
            }
        }
    }
    Ok(sources)
}

pub fn class_file_name(model: &DataModel) -> String {
    format!("{}.java", model.name)
}

/// Path of the model's source file: package directories plus class file name.
pub fn class_file_path(model: &DataModel) -> String {
    if model.package_name.is_empty() {
        class_file_name(model)
    } else {
        format!("{}/{}", model.package_name.replace('.', "/"), class_file_name(model))
    }
}

pub fn is_valid_class_name(name: &str) -> bool {
    CLASS_NAME_RE.is_match(name)
}

pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME_RE.is_match(name) && !JAVA_RESERVED.contains(&name)
}

fn validate_model(model: &DataModel) -> Result<(), ModelError> {
    if !is_valid_class_name(&model.name) {
        return Err(ModelError::InvalidClassName {
            name: model.name.clone(),
        });
    }
    match model.fields.iter().find(|f| !is_valid_field_name(&f.name)) {
        Some(field) => Err(ModelError::InvalidFieldName {
            model: model.name.clone(),
            field: field.name.clone(),
        }),
        None => Ok(()),
    }
}

fn imports_for(model: &DataModel) -> Vec<&'static str> {
    model
        .fields
        .iter()
        .flat_map(|field| {
            let mut imports = Vec::new();
            let item_is_date = field.field_type == FieldType::Array
                && field.items_type.as_deref() == Some("date");
            if field.field_type == FieldType::Date || item_is_date {
                imports.push("import java.time.LocalDateTime;");
            }
            if field.field_type == FieldType::Array {
                imports.push("import java.util.List;");
                imports.push("import java.util.ArrayList;");
            }
            imports
        })
        .unique()
        .collect()
}

/// Java type of a field as declared in the class.
pub fn java_type(field: &DataModelField) -> String {
    match field.field_type {
        FieldType::String | FieldType::Enum => "String".to_string(),
        FieldType::Number => "double".to_string(),
        FieldType::Boolean => "boolean".to_string(),
        FieldType::Date => "LocalDateTime".to_string(),
        FieldType::Object => non_empty(&field.object_type).unwrap_or("Object").to_string(),
        FieldType::Array => format!(
            "List<{}>",
            non_empty(&field.items_type).map_or("Object".to_string(), item_type)
        ),
    }
}

/// Element type for `List<...>`; primitives are boxed, unknown names pass through.
fn item_type(items_type: &str) -> String {
    match FieldType::parse(items_type) {
        Some(FieldType::String | FieldType::Enum) => "String".to_string(),
        Some(FieldType::Number) => "Double".to_string(),
        Some(FieldType::Boolean) => "Boolean".to_string(),
        Some(FieldType::Date) => "LocalDateTime".to_string(),
        Some(FieldType::Object) => "Object".to_string(),
        Some(FieldType::Array) => "List<Object>".to_string(),
        None => items_type.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_primitive(field: &DataModelField) -> bool {
    matches!(field.field_type, FieldType::Number | FieldType::Boolean)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn field_declaration(field: &DataModelField) -> String {
    let declaration = format!("{}private {} {};", INDENT, java_type(field), field.name);
    match non_empty(&field.description) {
        Some(description) => format!(
            "{i}/**\n{i} * {}\n{i} */\n{}",
            description.replace("*/", "*&#47;"),
            declaration,
            i = INDENT
        ),
        None => declaration,
    }
}

/// Initializer for a field in the no-arg constructor, if it needs one.
fn initializer(field: &DataModelField) -> Option<String> {
    let default = field.default_value.as_ref().filter(|v| !v.is_null());
    match (default, field.field_type) {
        (_, FieldType::Array) => Some("new ArrayList<>()".to_string()),
        (Some(value), _) => Some(format_default_value(field.field_type, value)),
        (None, _) => None,
    }
}

fn format_default_value(field_type: FieldType, value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match field_type {
        FieldType::String | FieldType::Enum => format!("\"{}\"", escape_string(&text)),
        FieldType::Number => match value {
            Value::Number(n) => n.to_string(),
            _ => text
                .trim()
                .parse::<f64>()
                .map_or("0".to_string(), |n| n.to_string()),
        },
        FieldType::Boolean => match value {
            Value::Bool(b) => b.to_string(),
            _ => (text.trim() == "true").to_string(),
        },
        FieldType::Date if text.trim().is_empty() => "LocalDateTime.now()".to_string(),
        FieldType::Date => format!("LocalDateTime.parse(\"{}\")", escape_string(text.trim())),
        // Only a string default is taken as a Java expression.
        FieldType::Object => match value {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            _ => "null".to_string(),
        },
        FieldType::Array => "new ArrayList<>()".to_string(),
    }
}

fn default_assignments<'f>(fields: impl Iterator<Item = &'f DataModelField>) -> String {
    fields
        .filter_map(|field| {
            initializer(field).map(|init| format!("{i}{i}this.{} = {};\n", field.name, init, i = INDENT))
        })
        .collect()
}

fn constructors(model: &DataModel) -> String {
    let mut out = format!(
        "{i}public {}() {{\n{}{i}}}",
        model.name,
        default_assignments(model.fields.iter()),
        i = INDENT
    );

    let required: Vec<&DataModelField> = model.required_fields().collect();
    if !required.is_empty() {
        let params = required
            .iter()
            .map(|f| format!("{} {}", java_type(f), f.name))
            .join(", ");
        let assignments: String = required
            .iter()
            .map(|f| format!("{i}{i}this.{} = {};\n", f.name, f.name, i = INDENT))
            .collect();
        out.push_str(&format!(
            "\n\n{i}public {}({}) {{\n{}{}{i}}}",
            model.name,
            params,
            assignments,
            default_assignments(model.fields.iter().filter(|f| !f.required)),
            i = INDENT
        ));
    }
    out
}

fn getter(field: &DataModelField) -> String {
    format!(
        "{i}public {} get{}() {{\n{i}{i}return {};\n{i}}}",
        java_type(field),
        capitalize(&field.name),
        field.name,
        i = INDENT
    )
}

fn setter(field: &DataModelField) -> String {
    format!(
        "{i}public void set{}({} {}) {{\n{i}{i}this.{} = {};\n{i}}}",
        capitalize(&field.name),
        java_type(field),
        field.name,
        field.name,
        field.name,
        i = INDENT
    )
}

fn to_string_method(model: &DataModel) -> String {
    let parts: String = model
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let separator = if index == 0 { "" } else { ", " };
            format!(
                "{i}{i}{i}\"{}{}=\" + {} +\n",
                separator,
                field.name,
                field.name,
                i = INDENT
            )
        })
        .collect();
    format!(
        "{i}@Override\n{i}public String toString() {{\n{i}{i}return \"{}{{\" +\n{}{i}{i}{i}\"}}\";\n{i}}}",
        model.name,
        parts,
        i = INDENT
    )
}

fn equals_method(model: &DataModel) -> String {
    let comparison = if model.fields.is_empty() {
        "true".to_string()
    } else {
        model
            .fields
            .iter()
            .map(|field| {
                if is_primitive(field) {
                    format!("{} == that.{}", field.name, field.name)
                } else {
                    format!("java.util.Objects.equals({}, that.{})", field.name, field.name)
                }
            })
            .join(&format!(" &&\n{}", INDENT.repeat(3)))
    };
    format!(
        "{i}@Override\n{i}public boolean equals(Object o) {{\n\
         {i}{i}if (this == o) return true;\n\
         {i}{i}if (o == null || getClass() != o.getClass()) return false;\n\
         {i}{i}{name} that = ({name}) o;\n\
         {i}{i}return {};\n{i}}}",
        comparison,
        name = model.name,
        i = INDENT
    )
}

fn hash_code_method(model: &DataModel) -> String {
    format!(
        "{i}@Override\n{i}public int hashCode() {{\n{i}{i}return java.util.Objects.hash({});\n{i}}}",
        model.fields.iter().map(|f| f.name.as_str()).join(", "),
        i = INDENT
    )
}
