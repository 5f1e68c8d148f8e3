//! Packaging of compiled rules into a deployable jar and a plain export zip.
use crate::error::ArchiveError;
use crate::model::{self, DataModel};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

mod descriptors;
mod export;

pub use export::{default_bundle_name, export_bundle};

/// Build metadata for a rule archive. Every field has a default, so an empty
/// JSON object is a valid configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    pub version: String,
    pub vendor: String,
    pub description: String,
    #[serde(alias = "includeKModule")]
    pub include_kmodule: bool,
    pub drools_version: String,
    pub java_version: String,
    /// Fixed build timestamp; the current time is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<DateTime<Utc>>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            vendor: "Web Rules".to_string(),
            description: "Generated Drools Rules".to_string(),
            include_kmodule: true,
            drools_version: "8.44.0.Final".to_string(),
            java_version: "21".to_string(),
            build_time: None,
        }
    }
}

impl BuildConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn build_timestamp(&self) -> String {
        self.build_time
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Assembles a rule archive from DRL text, data models and build metadata.
pub struct ArchiveBuilder<'a> {
    dsl: &'a str,
    package_name: &'a str,
    rule_name: &'a str,
    data_models: &'a [DataModel],
    config: BuildConfig,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(dsl: &'a str, package_name: &'a str, rule_name: &'a str) -> Self {
        Self {
            dsl,
            package_name,
            rule_name,
            data_models: &[],
            config: BuildConfig::default(),
        }
    }

    pub fn with_data_models(mut self, data_models: &'a [DataModel]) -> Self {
        self.data_models = data_models;
        self
    }

    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Writes the archive into a fresh in-memory buffer.
    ///
    /// Entries, in order: `META-INF/MANIFEST.MF`, the DRL file under the package
    /// path, `META-INF/kmodule.xml` when enabled, one source per data model and
    /// `pom.xml`. Any data model that fails to generate aborts the build.
    pub fn build(&self) -> Result<Vec<u8>, ArchiveError> {
        let sources = model::generate_all(self.data_models)?;
        let build_time = self.config.build_timestamp();

        let mut archive = ArchiveWriter::new();
        archive.add(
            "META-INF/MANIFEST.MF",
            &descriptors::manifest(self.rule_name, &self.config, &build_time),
        )?;
        archive.add(&self.drl_path(), self.dsl)?;
        if self.config.include_kmodule {
            archive.add(
                "META-INF/kmodule.xml",
                &descriptors::kmodule(self.rule_name, self.package_name),
            )?;
        }
        for (path, source) in &sources {
            archive.add(path, source)?;
        }
        archive.add(
            "pom.xml",
            &descriptors::pom(self.rule_name, self.package_name, &self.config),
        )?;

        let entries = archive.entries;
        let bytes = archive.finish()?;
        info!(
            rule = self.rule_name,
            entries,
            models = sources.len(),
            bytes = bytes.len(),
            "Built rule archive"
        );
        Ok(bytes)
    }

    pub fn drl_path(&self) -> String {
        if self.package_name.is_empty() {
            format!("{}.drl", self.rule_name)
        } else {
            format!("{}/{}.drl", self.package_name.replace('.', "/"), self.rule_name)
        }
    }
}

/// Builds a rule archive in one call. See [`ArchiveBuilder::build`].
pub fn build_archive(
    dsl: &str,
    package_name: &str,
    rule_name: &str,
    data_models: &[DataModel],
    config: BuildConfig,
) -> Result<Vec<u8>, ArchiveError> {
    ArchiveBuilder::new(dsl, package_name, rule_name)
        .with_data_models(data_models)
        .with_config(config)
        .build()
}

/// Conventional file name of a rule archive: `<rule-name>-<version>.jar`.
pub fn default_archive_name(rule_name: &str, version: &str) -> String {
    format!("{}-{}.jar", slug(rule_name), version)
}

/// Lowercases a rule name and joins its words with `-`.
pub(crate) fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// In-memory zip writer with deflate compression for every entry.
struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    entries: usize,
}

impl ArchiveWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    fn add(&mut self, name: &str, contents: &str) -> Result<(), ArchiveError> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(contents.as_bytes())?;
        self.entries += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archive_name() {
        assert_eq!(default_archive_name("Credit  Check", "2.0.1"), "credit-check-2.0.1.jar");
    }

    #[test]
    fn test_build_config_defaults_from_empty_json() {
        let config: BuildConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BuildConfig::default());

        let config: BuildConfig =
            serde_json::from_str(r#"{"version": "2.0.0", "includeKModule": false}"#).unwrap();
        assert_eq!(config.version, "2.0.0");
        assert!(!config.include_kmodule);
        assert_eq!(config.vendor, "Web Rules");
    }
}
