use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::builders::exporter::{ConfigExporter, DocumentExporter};
use crate::builders::importer::{ConfigImporter, DocumentImporter};
use crate::builders::reporter::{ConfigReporter, ConfigSummary, ConsoleReporter};
use crate::core::settings::{DocumentFormat, Settings, SettingsManager};
use crate::core::{GitConfig, Value};

/// How command-line text is turned into a typed [`Value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueKind {
    #[default]
    String,
    Bool,
    Int,
    Uint,
    Float,
}

/// Picks the config file to operate on: the explicit path, then the settings
/// default, then the user's global git config.
pub fn resolve_config_path(explicit: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    if let Some(path) = explicit.or_else(|| settings.default_file.clone()) {
        return Ok(path);
    }
    match git2::Config::find_global() {
        Ok(path) => Ok(path),
        Err(err) => {
            debug!(%err, "libgit2 found no global config, falling back to ~/.gitconfig");
            dirs::home_dir()
                .map(|home| home.join(".gitconfig"))
                .context("Could not locate the global git config; pass --file")
        }
    }
}

/// Reads and parses `path`. A missing file is an empty configuration.
pub fn load_config(path: &Path) -> Result<GitConfig> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file does not exist yet");
            return Ok(GitConfig::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    GitConfig::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn save_config(path: &Path, config: &GitConfig) -> Result<()> {
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Converts command-line text into a value of the requested kind.
pub fn parse_value(kind: ValueKind, text: &str) -> Result<Value> {
    let value = match kind {
        ValueKind::String => Value::from_text(text),
        ValueKind::Bool => Value::Bool(
            text.parse()
                .with_context(|| format!("'{text}' is not a boolean"))?,
        ),
        ValueKind::Int => Value::Int(
            text.parse()
                .with_context(|| format!("'{text}' is not an integer"))?,
        ),
        ValueKind::Uint => Value::Uint(
            text.parse()
                .with_context(|| format!("'{text}' is not an unsigned integer"))?,
        ),
        ValueKind::Float => Value::Float(
            text.parse()
                .with_context(|| format!("'{text}' is not a number"))?,
        ),
    };
    Ok(value)
}

pub fn get_value(path: &Path, key: &str) -> Result<String> {
    let config = load_config(path)?;
    let value = config.get(key).with_context(|| format!("Cannot read '{key}'"))?;
    Ok(value.to_string())
}

pub fn get_all_values(path: &Path, key: &str) -> Result<Vec<String>> {
    let config = load_config(path)?;
    let values = config
        .get_all(key)
        .with_context(|| format!("Cannot read '{key}'"))?;
    Ok(values.iter().map(ToString::to_string).collect())
}

/// Stores `texts` under `key`, replacing the current values or, with
/// `append`, adding to them.
pub fn set_values(
    path: &Path,
    key: &str,
    kind: ValueKind,
    texts: &[String],
    append: bool,
) -> Result<()> {
    let values = texts
        .iter()
        .map(|text| parse_value(kind, text))
        .collect::<Result<Vec<_>>>()?;

    let mut config = load_config(path)?;
    let stored = if append {
        config.add(key, values)
    } else {
        config.set(key, values)
    };
    stored.with_context(|| format!("Cannot write '{key}'"))?;

    save_config(path, &config)?;
    info!(path = %path.display(), key, append, "updated config");
    Ok(())
}

pub fn unset_key(path: &Path, key: &str) -> Result<()> {
    let mut config = load_config(path)?;
    config
        .unset(key)
        .with_context(|| format!("Cannot unset '{key}'"))?;
    save_config(path, &config)?;
    info!(path = %path.display(), key, "unset key");
    Ok(())
}

pub fn list_entries(path: &Path, name_only: bool) -> Result<Vec<String>> {
    let config = load_config(path)?;
    Ok(ConsoleReporter::new(name_only).list(&config))
}

pub fn find_entries(path: &Path, pattern: &str, name_only: bool) -> Result<Vec<String>> {
    let pattern = regex::Regex::new(pattern).context("Invalid key pattern")?;
    let config = load_config(path)?;
    Ok(ConsoleReporter::new(name_only).list_matching(&config, &pattern))
}

/// Parses `path` strictly: unlike the other commands a missing file is an error.
pub fn check_file(path: &Path) -> Result<ConfigSummary> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config =
        GitConfig::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(ConsoleReporter::new(false).summarize(&config))
}

/// Guesses a document format from a file extension.
pub fn infer_format(path: &Path) -> Option<DocumentFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(DocumentFormat::Json),
        "yaml" | "yml" => Some(DocumentFormat::Yaml),
        "toml" => Some(DocumentFormat::Toml),
        _ => None,
    }
}

/// Renders the config at `path` as a document, writing it to `output` when given.
pub fn export_config(path: &Path, format: DocumentFormat, output: Option<&Path>) -> Result<String> {
    let config = load_config(path)?;
    let document = DocumentExporter::new(format).export(&config)?;
    if let Some(output) = output {
        fs::write(output, &document).context("Failed to write export file")?;
        info!(output = %output.display(), ?format, "exported config");
    }
    Ok(document)
}

/// Merges the document at `source` into the config at `path`.
///
/// Imported values are appended to existing keys, or replace them when
/// `replace` is set. Returns the number of keys imported.
pub fn import_config(
    path: &Path,
    source: &Path,
    format: DocumentFormat,
    replace: bool,
) -> Result<usize> {
    let imported = DocumentImporter::new(format).import_file(source)?;
    let mut config = load_config(path)?;

    let keys = imported.keys();
    for key in &keys {
        let key = key.to_string();
        let values = imported.get_all(&key)?.to_vec();
        if replace {
            config.set(&key, values)?;
        } else {
            config.add(&key, values)?;
        }
    }

    save_config(path, &config)?;
    info!(path = %path.display(), keys = keys.len(), replace, "imported document");
    Ok(keys.len())
}

pub fn initialize_settings(manager: &SettingsManager) -> Result<bool> {
    manager.initialize()
}
