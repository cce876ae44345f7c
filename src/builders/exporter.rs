use anyhow::Context;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::core::settings::DocumentFormat;
use crate::core::{GitConfig, Value, VariableName};

/// A trait that defines how a [`GitConfig`] is turned into a document in
/// another format.
pub trait ConfigExporter {
    /// Renders `config` as a document.
    ///
    /// The document is a table keyed by the dotted section name
    /// (`remote.origin`), each holding a table of variable name to the list
    /// of its values. Section and variable order are preserved.
    fn export(&self, config: &GitConfig) -> anyhow::Result<String>;
}

/// Exports to JSON, YAML or TOML through serde.
pub struct DocumentExporter {
    format: DocumentFormat,
}

impl DocumentExporter {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }
}

impl ConfigExporter for DocumentExporter {
    fn export(&self, config: &GitConfig) -> anyhow::Result<String> {
        let document = SectionsView(config);
        let content = match self.format {
            DocumentFormat::Json => {
                serde_json::to_string_pretty(&document).context("Failed to serialize to JSON")?
            }
            DocumentFormat::Yaml => {
                serde_yaml::to_string(&document).context("Failed to serialize to YAML")?
            }
            DocumentFormat::Toml => {
                toml::to_string_pretty(&document).context("Failed to serialize to TOML")?
            }
        };
        Ok(content)
    }
}

struct SectionsView<'a>(&'a GitConfig);

impl Serialize for SectionsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (section, variables) in self.0.sections() {
            map.serialize_entry(&section.dotted(), &VariablesView(&variables))?;
        }
        map.end()
    }
}

struct VariablesView<'a, 'b>(&'b [(&'a VariableName, &'a [Value])]);

impl Serialize for VariablesView<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in self.0 {
            map.serialize_entry(name.as_str(), &ValuesView(values))?;
        }
        map.end()
    }
}

struct ValuesView<'a>(&'a [Value]);

impl Serialize for ValuesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for value in self.0 {
            match value {
                // strings are exported decoded, the way git would print them
                Value::String(_) => seq.serialize_element(&value.to_string())?,
                other => seq.serialize_element(other)?,
            }
        }
        seq.end()
    }
}
