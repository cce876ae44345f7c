use std::fmt;
use std::str::FromStr;

use crate::core::errors::GitConfigError;

/// Bytes allowed in a variable name after its leading letter.
pub(crate) fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

/// The whitespace class used by the scanner and the value encoder.
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Section name (and maybe subsection) of a config entry.
///
/// An empty `subsection` means the section has none, so `[foo]` and a key
/// spelled `foo..name` address the same section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Section {
    pub name: String,
    pub subsection: String,
}

impl Section {
    /// Converts `text` into a `Section`.
    ///
    /// Everything before the first `.` is the section name, which may only
    /// contain ASCII alphanumerics, `-` and `.`. Everything after it is the
    /// subsection, which may contain any character except newline and NUL.
    /// `"url.git@github.com"` yields name `url` and subsection `git@github.com`.
    pub fn new(text: &str) -> Result<Self, GitConfigError> {
        let (name, subsection) = match text.split_once('.') {
            Some((name, subsection)) => (name, subsection),
            None => (text, ""),
        };
        let section = Self {
            name: name.to_string(),
            subsection: subsection.to_string(),
        };
        if !section.is_valid_name() {
            return Err(GitConfigError::InvalidSection);
        }
        if !section.is_valid_subsection() {
            return Err(GitConfigError::InvalidSubsection);
        }
        Ok(section)
    }

    /// Joins name and subsection with a dot, the way keys spell them.
    pub fn dotted(&self) -> String {
        if self.subsection.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.subsection)
        }
    }

    fn is_valid_name(&self) -> bool {
        !self.name.is_empty()
            && self
                .name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    }

    fn is_valid_subsection(&self) -> bool {
        !self.subsection.contains(['\n', '\0'])
    }
}

/// Renders the section header line, `[name]` or `[name "subsection"]`.
/// `\` and `"` in the subsection are escaped.
impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subsection.is_empty() {
            write!(f, "[{}]", self.name)
        } else {
            let escaped = self.subsection.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "[{} \"{}\"]", self.name, escaped)
        }
    }
}

impl FromStr for Section {
    type Err = GitConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Name of a config variable: an ASCII letter followed by alphanumerics or `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableName(String);

impl VariableName {
    pub fn new(name: &str) -> Result<Self, GitConfigError> {
        let valid = name
            .as_bytes()
            .first()
            .is_some_and(|first| first.is_ascii_alphabetic())
            && name.bytes().all(is_name_byte);
        if !valid {
            return Err(GitConfigError::InvalidVariableName);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fully-qualified variable identifier: section, optional subsection and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub section: Section,
    pub name: VariableName,
}

impl Key {
    /// Splits `key` on its last `.` into a section (prefix) and a variable
    /// name (suffix), validating both.
    pub fn parse(key: &str) -> Result<Self, GitConfigError> {
        let (section, name) = key.rsplit_once('.').ok_or(GitConfigError::InvalidKey)?;
        let name = VariableName::new(name)?;
        let section = Section::new(section)?;
        Ok(Self { section, name })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section.dotted(), self.name)
    }
}

impl FromStr for Key {
    type Err = GitConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
