use thiserror::Error;

/// Errors that can occur while compiling a rule graph into rule units.
///
/// Compilation is fail-fast: the first invalid node or cycle aborts the whole
/// compile and no partial output is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Node '{node_id}' has an invalid configuration: {message}")]
    InvalidConfig { node_id: String, message: String },

    #[error("Cycle detected in rule flow: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },
}

impl CompileError {
    pub(crate) fn invalid_config(node_id: &str, message: impl Into<String>) -> Self {
        CompileError::InvalidConfig {
            node_id: node_id.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur when converting an editor document (or any custom
/// format) into a `RuleGraph`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Failed to parse rule flow JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to read rule flow file: {0}")]
    ReadError(String),

    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    InvalidNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has a malformed '{type_name}' configuration: {message}")]
    InvalidConfig {
        node_id: String,
        type_name: String,
        message: String,
    },

    #[error("Invalid rule flow: {0}")]
    ValidationError(String),
}

/// Errors raised by the data-model class generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error(
        "Invalid class name: '{name}'. Class names must start with an uppercase letter and can only contain letters, digits, underscores, and dollar signs"
    )]
    InvalidClassName { name: String },

    #[error(
        "Invalid field name '{field}' in model '{model}'. Field names must start with a letter, underscore, or dollar sign, can only contain letters, digits, underscores, and dollar signs, and must not be a reserved word"
    )]
    InvalidFieldName { model: String, field: String },

    #[error("Failed to generate data model '{model_id}' ({model_name}): {source}")]
    ModelFailed {
        model_id: String,
        model_name: String,
        #[source]
        source: Box<ModelError>,
    },
}

/// Errors that can occur while assembling a rule archive or export bundle.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Data model generation failed: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to write archive entry: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while building archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize flow snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
