//! Data models declared alongside a rule flow and the Java classes generated
//! for them.
pub mod definition;
pub mod java;

pub use definition::{DataModel, DataModelField, FieldType};
pub use java::{class_file_path, generate_all, generate_class};
