use regex::Regex;

use crate::core::GitConfig;

/// Counts describing the contents of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSummary {
    pub sections: usize,
    pub keys: usize,
    pub values: usize,
}

pub trait ConfigReporter {
    /// One line per stored value.
    fn list(&self, config: &GitConfig) -> Vec<String>;

    /// One line per stored value whose canonical key matches `pattern`.
    fn list_matching(&self, config: &GitConfig, pattern: &Regex) -> Vec<String>;

    fn summarize(&self, config: &GitConfig) -> ConfigSummary;
}

/// Formats entries the way `git config` prints them: `key=value` for
/// listings, `key value` for regex lookups.
pub struct ConsoleReporter {
    /// Print keys only, without their values.
    pub name_only: bool,
}

impl ConsoleReporter {
    pub fn new(name_only: bool) -> Self {
        Self { name_only }
    }

    /// Rendered `(key, value)` pairs in config order, one per stored value.
    fn entries(config: &GitConfig) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for (section, variables) in config.sections() {
            for (name, values) in variables {
                let key = format!("{}.{}", section.dotted(), name);
                entries.extend(values.iter().map(|value| (key.clone(), value.to_string())));
            }
        }
        entries
    }
}

impl ConfigReporter for ConsoleReporter {
    fn list(&self, config: &GitConfig) -> Vec<String> {
        Self::entries(config)
            .into_iter()
            .map(|(key, value)| {
                if self.name_only {
                    key
                } else {
                    format!("{key}={value}")
                }
            })
            .collect()
    }

    fn list_matching(&self, config: &GitConfig, pattern: &Regex) -> Vec<String> {
        Self::entries(config)
            .into_iter()
            .filter(|(key, _)| pattern.is_match(key))
            .map(|(key, value)| {
                if self.name_only {
                    key
                } else {
                    format!("{key} {value}")
                }
            })
            .collect()
    }

    fn summarize(&self, config: &GitConfig) -> ConfigSummary {
        let mut summary = ConfigSummary {
            sections: 0,
            keys: 0,
            values: 0,
        };
        for (_, variables) in config.sections() {
            summary.sections += 1;
            summary.keys += variables.len();
            summary.values += variables.iter().map(|(_, values)| values.len()).sum::<usize>();
        }
        summary
    }
}
