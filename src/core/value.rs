use serde::Serialize;
use std::fmt;

use crate::core::errors::GitConfigError;
use crate::core::key::is_space;

/// Value of a config variable.
///
/// String values hold the raw bytes as written in the file, escapes and
/// quotes included; [`fmt::Display`] renders the decoded text. The other kinds
/// render through their usual textual form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl Value {
    /// The stored representation: raw text for strings, the usual textual
    /// form for everything else.
    pub fn value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
        }
    }

    /// A string value that renders as exactly `text`.
    ///
    /// Backslashes and double quotes are escaped; every other character,
    /// newlines and tabs included, is stored literally.
    pub fn from_text(text: &str) -> Self {
        let mut raw = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '\\' => raw.push_str("\\\\"),
                '"' => raw.push_str("\\\""),
                other => raw.push(other),
            }
        }
        Value::String(raw)
    }

    /// Checks a caller-supplied value before it is stored.
    ///
    /// Only strings carry rules: see [`validate_value`].
    pub fn validate(&self) -> Result<(), GitConfigError> {
        match self {
            Value::String(s) => validate_value(s),
            _ => Ok(()),
        }
    }

    /// Renders the value the way it is written after `name = ` in a file.
    ///
    /// The decoded text is re-escaped and quoted when needed, so parsing the
    /// output yields a value that renders to the same text again.
    pub fn encoded(&self) -> String {
        encode(&self.to_string())
    }
}

/// Validates whether `s` may be stored as a string value.
///
/// Values may contain any character and may span multiple lines. A `\` must be
/// followed by `\`, `"`, or a literal newline, tab or backspace character; a
/// `\` as the very last character is tolerated.
pub fn validate_value(s: &str) -> Result<(), GitConfigError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            match bytes.get(i + 1) {
                None => break,
                Some(b'\\' | b'"') => i += 1,
                Some(b'\n' | b'\t' | 0x08) => {}
                Some(_) => return Err(GitConfigError::InvalidVariableValue),
            }
        }
        i += 1;
    }
    Ok(())
}

fn decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let mut byte = bytes[i];
        match byte {
            // quotes only steer how the raw text was scanned
            b'"' => {
                i += 1;
                continue;
            }
            b'\\' => {
                let decoded = match bytes.get(i + 1) {
                    Some(b'"') => Some(b'"'),
                    Some(b'\\') => Some(b'\\'),
                    Some(b'n') => Some(b'\n'),
                    Some(b'b') => Some(0x08),
                    Some(b't') => Some(b'\t'),
                    _ => None,
                };
                if let Some(decoded) = decoded {
                    byte = decoded;
                    i += 1;
                }
            }
            _ => {}
        }
        out.push(byte);
        i += 1;
    }
    // only ASCII bytes are ever dropped or substituted, so UTF-8 stays intact
    String::from_utf8_lossy(&out).into_owned()
}

fn encode(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text.bytes().next().is_some_and(is_space)
        || text.bytes().next_back().is_some_and(is_space)
        || text.contains([';', '#']);

    let mut out = String::with_capacity(text.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            other => out.push(other),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(&decode(s)),
            other => f.write_str(&other.value()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from_number!(Int as i64: i8, i16, i32, i64, isize);
impl_from_number!(Uint as u64: u8, u16, u32, u64, usize);
impl_from_number!(Float as f64: f32, f64);

/// Converts a foreign JSON scalar; arrays, objects and `null` have no
/// counterpart and fail with `InvalidValueType`.
impl TryFrom<&serde_json::Value> for Value {
    type Error = GitConfigError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::Uint(u))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or(GitConfigError::InvalidValueType)
                }
            }
            _ => Err(GitConfigError::InvalidValueType),
        }
    }
}
