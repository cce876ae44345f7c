use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::settings::DocumentFormat;
use crate::core::{GitConfig, Value};

/// A trait that defines the behavior for building a [`GitConfig`] from a
/// document produced by an exporter (or written by hand).
pub trait ConfigImporter {
    /// Builds a configuration from the document text.
    fn import_str(&self, content: &str) -> Result<GitConfig>;

    /// Reads `path` and builds a configuration from its contents.
    fn import_file(&self, path: &Path) -> Result<GitConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read import file {}", path.display()))?;
        self.import_str(&content)
    }
}

/// Imports JSON, YAML or TOML documents shaped like the exporter's output:
/// a table of dotted section names, each a table of variable names mapping
/// to a scalar or a list of scalars.
pub struct DocumentImporter {
    format: DocumentFormat,
}

impl DocumentImporter {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    /// Reads the document into a format-neutral tree. JSON keeps the
    /// document's key order.
    fn read_document(&self, content: &str) -> Result<serde_json::Value> {
        let document: serde_json::Value = match self.format {
            DocumentFormat::Json => serde_json::from_str(content).context("Failed to parse JSON")?,
            DocumentFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML")?,
            DocumentFormat::Toml => toml::from_str(content).context("Failed to parse TOML")?,
        };
        Ok(document)
    }
}

impl ConfigImporter for DocumentImporter {
    fn import_str(&self, content: &str) -> Result<GitConfig> {
        let document = self.read_document(content)?;
        let sections = document
            .as_object()
            .context("Import document must be a table of sections")?;

        let mut config = GitConfig::new();
        for (section, variables) in sections {
            let variables = variables
                .as_object()
                .with_context(|| format!("Section '{section}' must be a table of variables"))?;

            for (name, values) in variables {
                let key = format!("{section}.{name}");
                let values = match values {
                    serde_json::Value::Array(items) => items.iter().map(to_value).collect(),
                    scalar => to_value(scalar).map(|value| vec![value]),
                }
                .with_context(|| format!("Invalid value for '{key}'"))?;

                config
                    .add(&key, values)
                    .with_context(|| format!("Invalid entry '{key}'"))?;
            }
        }

        debug!(sections = config.len(), "imported document");
        Ok(config)
    }
}

/// Document strings hold the text as git would print it, so they are stored
/// in a form that renders back to exactly that text.
fn to_value(item: &serde_json::Value) -> Result<Value, crate::core::GitConfigError> {
    match Value::try_from(item)? {
        Value::String(text) => Ok(Value::from_text(&text)),
        other => Ok(other),
    }
}
