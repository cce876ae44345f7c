use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::core::errors::{GitConfigError, ParseError};
use crate::core::key::{Key, Section, VariableName};
use crate::core::ordered_map::OrderedMap;
use crate::core::parser;
use crate::core::value::Value;

type Variables = OrderedMap<VariableName, Vec<Value>>;

/// In-memory model of a git config file.
///
/// Sections, the variables inside each section and the values of each
/// variable all keep the order in which they were first added. A section is
/// dropped as soon as its last variable is unset.
#[derive(Debug, Clone, Default)]
pub struct GitConfig {
    data: OrderedMap<Section, Variables>,
}

impl GitConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the raw contents of a config file. See [`parser::parse`].
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        parser::parse(input)
    }

    /// Retrieves the value of `key`.
    ///
    /// When the key holds several values the last one wins.
    ///
    /// # Errors
    /// `InvalidKey`, `InvalidVariableName`, `InvalidSection` or
    /// `InvalidSubsection` when `key` is malformed, `KeyNotFound` when it is
    /// absent.
    pub fn get(&self, key: &str) -> Result<Value, GitConfigError> {
        let values = self.get_all(key)?;
        Ok(values.last().cloned().unwrap_or_default())
    }

    /// Retrieves every value of `key`, in assignment order.
    pub fn get_all(&self, key: &str) -> Result<&[Value], GitConfigError> {
        let Key { section, name } = Key::parse(key)?;
        self.data
            .get(&section)
            .and_then(|variables| variables.get(&name))
            .map(Vec::as_slice)
            .ok_or(GitConfigError::KeyNotFound)
    }

    /// Assigns `values` to `key`, replacing whatever it held.
    /// To append to an existing key use [`GitConfig::add`].
    ///
    /// # Errors
    /// `EmptyValue` when `values` is empty, `InvalidVariableValue` when a
    /// string is badly escaped, and the key errors of [`GitConfig::get`].
    pub fn set<I, V>(&mut self, key: &str, values: I) -> Result<(), GitConfigError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Self::checked_values(values)?;
        let Key { section, name } = Key::parse(key)?;
        self.data
            .get_or_insert_with(section, OrderedMap::new)
            .put(name, values);
        Ok(())
    }

    /// Appends `values` to `key`, creating it if it doesn't exist yet.
    pub fn add<I, V>(&mut self, key: &str, values: I) -> Result<(), GitConfigError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Self::checked_values(values)?;
        let Key { section, name } = Key::parse(key)?;
        self.append_all(section, name, values);
        Ok(())
    }

    /// Removes `key`. If it was the only variable of its section, the
    /// section goes too.
    pub fn unset(&mut self, key: &str) -> Result<(), GitConfigError> {
        let Key { section, name } = Key::parse(key)?;
        let variables = self
            .data
            .get_mut(&section)
            .ok_or(GitConfigError::KeyNotFound)?;
        if !variables.remove(&name) {
            return Err(GitConfigError::KeyNotFound);
        }
        if variables.is_empty() {
            self.data.remove(&section);
        }
        Ok(())
    }

    /// Writes the configuration to `path`, overwriting any existing file.
    ///
    /// A failure part way through leaves the file contents undefined.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), sections = self.len(), "saved git config");
        Ok(())
    }

    /// Serializes every section in order, one `\tname = value` line per value.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (section, variables) in self.data.iter() {
            writeln!(writer, "{section}")?;
            for (name, values) in variables.iter() {
                for value in values {
                    writeln!(writer, "\t{name} = {}", value.encoded())?;
                }
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    /// Every key, sections first-come first-served, variables likewise.
    pub fn keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.data.iter().map(|(_, v)| v.len()).sum());
        for (section, variables) in self.data.iter() {
            keys.extend(variables.keys().map(|name| Key {
                section: section.clone(),
                name: name.clone(),
            }));
        }
        keys
    }

    /// Sections in order, each with its variables and their values.
    pub fn sections(&self) -> impl Iterator<Item = (&Section, Vec<(&VariableName, &[Value])>)> {
        self.data.iter().map(|(section, variables)| {
            let entries = variables
                .iter()
                .map(|(name, values)| (name, values.as_slice()))
                .collect();
            (section, entries)
        })
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append-only insert used while parsing; values are trusted as-is.
    pub(crate) fn append(&mut self, section: Section, name: VariableName, value: Value) {
        self.append_all(section, name, vec![value]);
    }

    fn append_all(&mut self, section: Section, name: VariableName, values: Vec<Value>) {
        self.data
            .get_or_insert_with(section, OrderedMap::new)
            .get_or_insert_with(name, Vec::new)
            .extend(values);
    }

    fn checked_values<I, V>(values: I) -> Result<Vec<Value>, GitConfigError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(GitConfigError::EmptyValue);
        }
        for value in &values {
            value.validate()?;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GitConfig {
        let mut config = GitConfig::new();
        config.set("foo.foo", ["foo"]).unwrap();
        config.set("foo.bar", ["foo", "bar"]).unwrap();
        config.set("foo.bar.baz", ["foo"]).unwrap();
        config.set("foo.bool", [true, false]).unwrap();
        config.set("foo.int", [1, 2, 3]).unwrap();
        config
    }

    fn key_strings(config: &GitConfig) -> Vec<String> {
        config.keys().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_set_rejects_empty_values() {
        let mut config = GitConfig::new();
        assert_eq!(
            config.set("foo.foo", Vec::<Value>::new()),
            Err(GitConfigError::EmptyValue)
        );
        assert!(config.is_empty());
    }

    #[test]
    fn test_set_rejects_invalid_keys() {
        let mut config = GitConfig::new();
        assert_eq!(config.set("foo", ["bar"]), Err(GitConfigError::InvalidKey));
        assert_eq!(config.set("foo", ["bar", "baz"]), Err(GitConfigError::InvalidKey));
        assert_eq!(
            config.set("foo.1bar", ["baz"]),
            Err(GitConfigError::InvalidVariableName)
        );
        assert_eq!(
            config.add("fo!o.bar", ["baz"]),
            Err(GitConfigError::InvalidSection)
        );
        assert_eq!(
            config.add("foo.sub\n.bar", ["baz"]),
            Err(GitConfigError::InvalidSubsection)
        );
    }

    #[test]
    fn test_set_rejects_malformed_strings() {
        let mut config = GitConfig::new();
        assert_eq!(
            config.set("foo.bar", ["ok", r"bad\q"]),
            Err(GitConfigError::InvalidVariableValue)
        );
        assert!(config.get("foo.bar").is_err());
    }

    #[test]
    fn test_get_returns_last_value() {
        let config = sample();
        assert_eq!(config.get("foo.foo").unwrap(), Value::from("foo"));
        assert_eq!(config.get("foo.bar").unwrap(), Value::from("bar"));
        assert_eq!(config.get("foo.bar.baz").unwrap(), Value::from("foo"));
        assert_eq!(config.get("foo.bool").unwrap(), Value::Bool(false));
        assert_eq!(config.get("foo.baz"), Err(GitConfigError::KeyNotFound));
        assert_eq!(config.get("nope.baz"), Err(GitConfigError::KeyNotFound));
    }

    #[test]
    fn test_get_all_returns_every_value() {
        let mut config = sample();
        config.add("foo.bar", [Value::from("1"), Value::from(2), Value::from("3")]).unwrap();
        assert_eq!(
            config.get_all("foo.bar").unwrap(),
            &[
                Value::from("foo"),
                Value::from("bar"),
                Value::from("1"),
                Value::Int(2),
                Value::from("3"),
            ]
        );
        assert_eq!(
            config.get_all("foo.int").unwrap(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_set_then_add_accumulates() {
        let mut config = GitConfig::new();
        config.set("a.b", ["v1"]).unwrap();
        config.add("a.b", ["v2"]).unwrap();
        assert_eq!(config.get("a.b").unwrap(), Value::from("v2"));
        assert_eq!(
            config.get_all("a.b").unwrap(),
            &[Value::from("v1"), Value::from("v2")]
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut config = GitConfig::new();
        config.set("a.first", ["1"]).unwrap();
        config.set("a.second", ["2", "3"]).unwrap();
        config.set("a.first", ["x"]).unwrap();
        config.set("a.second", ["y"]).unwrap();
        assert_eq!(key_strings(&config), vec!["a.first", "a.second"]);
        assert_eq!(config.get_all("a.second").unwrap(), &[Value::from("y")]);
    }

    #[test]
    fn test_keys_follow_insertion_order() {
        let mut config = GitConfig::new();
        config.set("zeta.b", ["1"]).unwrap();
        config.set("alpha.z", ["1"]).unwrap();
        config.set("zeta.a", ["1"]).unwrap();
        config.add("alpha.sub.y", ["1"]).unwrap();
        assert_eq!(
            key_strings(&config),
            vec!["zeta.b", "zeta.a", "alpha.z", "alpha.sub.y"]
        );
    }

    #[test]
    fn test_unset_removes_empty_sections() {
        let mut config = GitConfig::new();
        config.set("foo.bar", ["boo"]).unwrap();
        config.set("foo.baz", ["blablabla"]).unwrap();
        config.set("bar.foo", ["uwu"]).unwrap();

        config.unset("foo.bar").unwrap();
        assert_eq!(config.get("foo.bar"), Err(GitConfigError::KeyNotFound));
        assert_eq!(config.get("foo.baz").unwrap().to_string(), "blablabla");

        config.unset("bar.foo").unwrap();
        assert_eq!(config.get("bar.foo"), Err(GitConfigError::KeyNotFound));
        assert_eq!(key_strings(&config), vec!["foo.baz"]);
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_unset_missing_key_has_no_side_effects() {
        let mut config = sample();
        let before = key_strings(&config);
        for _ in 0..2 {
            assert_eq!(config.unset("foo.baz"), Err(GitConfigError::KeyNotFound));
            assert_eq!(config.unset("nope.baz"), Err(GitConfigError::KeyNotFound));
        }
        assert_eq!(key_strings(&config), before);
    }

    #[test]
    fn test_write_to_renders_sections_and_values() {
        let mut config = GitConfig::new();
        config.set("user.name", ["Jane Doe"]).unwrap();
        config.set("remote.origin.fetch", ["a", "b"]).unwrap();
        config.set("core.pager", ["less ; more"]).unwrap();
        let text = String::from_utf8(config.to_bytes()).unwrap();
        assert_eq!(
            text,
            "[user]\n\tname = Jane Doe\n[remote \"origin\"]\n\tfetch = a\n\tfetch = b\n[core]\n\tpager = \"less ; more\"\n"
        );
    }

    #[test]
    fn test_save_then_parse_round_trips() {
        let mut config = GitConfig::new();
        config.set("a.text", ["hello world"]).unwrap();
        config.add("a.text", ["  padded  ", ""]).unwrap();
        config.set("a.escaped", [r#"say \"hi\""#, r"C:\\dir", "tab\\\there"]).unwrap();
        config.set("a.sub.flags", [Value::from(true), Value::from(-7), Value::from(2.5)]).unwrap();
        config.set("b.comment", ["x # y ; z"]).unwrap();

        let parsed = GitConfig::parse(&config.to_bytes()).unwrap();
        assert_eq!(parsed.keys(), config.keys());
        for key in config.keys() {
            let key = key.to_string();
            let expected: Vec<String> = config.get_all(&key).unwrap().iter().map(ToString::to_string).collect();
            let actual: Vec<String> = parsed.get_all(&key).unwrap().iter().map(ToString::to_string).collect();
            assert_eq!(actual, expected, "values of {key}");
        }
    }
}
