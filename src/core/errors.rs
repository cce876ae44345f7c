use thiserror::Error;

/// Every way an operation on the config-file core can fail.
///
/// The variants carry no payload so callers can compare them directly
/// (`assert_eq!(err, GitConfigError::KeyNotFound)`). Location details for
/// malformed input are attached by [`ParseError`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitConfigError {
    #[error("invalid key format")]
    InvalidKey,
    #[error("could not find the given key")]
    KeyNotFound,
    #[error("invalid value type")]
    InvalidValueType,
    #[error("empty value")]
    EmptyValue,
    #[error("illegal characters in section")]
    InvalidSection,
    #[error("illegal characters in subsection")]
    InvalidSubsection,
    #[error("illegal characters in variable name")]
    InvalidVariableName,
    #[error("illegal characters in variable value")]
    InvalidVariableValue,
    #[error("illegal characters in line")]
    InvalidLine,
}

/// Returned by the parser when the input is malformed.
///
/// `line` is the raw text of the offending line (without its terminator) and
/// `line_number` is 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {line} (line {line_number})")]
pub struct ParseError {
    #[source]
    pub kind: GitConfigError,
    pub line: String,
    pub line_number: usize,
}
