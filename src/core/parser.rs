use tracing::{debug, trace};

use crate::core::errors::{GitConfigError, ParseError};
use crate::core::gitconfig::GitConfig;
use crate::core::key::{Section, VariableName, is_name_byte, is_space};
use crate::core::value::Value;

/// Parses the contents of a config file.
///
/// The input is scanned once, line by line. On failure the returned
/// [`ParseError`] carries the raw text of the offending line and its 1-based
/// line number.
pub fn parse(input: &[u8]) -> Result<GitConfig, ParseError> {
    let mut cursor = Cursor::new(input);
    let config = cursor.parse()?;
    debug!(
        bytes = input.len(),
        lines = cursor.line,
        sections = config.len(),
        "parsed git config"
    );
    Ok(config)
}

/// Position of the scanner inside the input.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// 1-based number of the line being scanned.
    line: usize,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(byte)
    }

    /// Consumes everything up to, but not including, the next newline.
    fn skip_to_line_end(&mut self) {
        while self.peek().is_some_and(|b| b != b'\n') {
            self.advance();
        }
    }

    fn skip_space(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.advance();
        }
    }

    fn skip_inline_space(&mut self) {
        while self.peek().is_some_and(|b| b != b'\n' && is_space(b)) {
            self.advance();
        }
    }

    /// Raw text of the current line, without its terminator.
    fn line_text(&self) -> String {
        let rest = &self.data[self.pos..];
        let mut end = self.pos + rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        if end > self.line_start && self.data[end - 1] == b'\r' {
            end -= 1;
        }
        String::from_utf8_lossy(&self.data[self.line_start..end]).into_owned()
    }

    fn error(&self, kind: GitConfigError) -> ParseError {
        ParseError {
            kind,
            line: self.line_text(),
            line_number: self.line,
        }
    }

    fn parse(&mut self) -> Result<GitConfig, ParseError> {
        let mut config = GitConfig::new();
        let mut section: Option<Section> = None;

        loop {
            self.skip_space();
            match self.peek() {
                None => break,
                Some(b'[') => {
                    let parsed = self.parse_section().map_err(|kind| self.error(kind))?;
                    trace!(line = self.line, section = %parsed, "section header");
                    section = Some(parsed);
                }
                Some(b';' | b'#') => self.skip_to_line_end(),
                Some(b) if b.is_ascii_alphabetic() => {
                    let Some(current) = section.as_ref() else {
                        return Err(self.error(GitConfigError::InvalidSection));
                    };
                    let (name, value) = self.parse_variable().map_err(|kind| self.error(kind))?;
                    trace!(line = self.line, %name, "assignment");
                    config.append(current.clone(), name, value);
                }
                Some(_) => return Err(self.error(GitConfigError::InvalidLine)),
            }
        }

        Ok(config)
    }

    /// `[name]` or `[name "subsection"]`; the rest of the line is discarded.
    fn parse_section(&mut self) -> Result<Section, GitConfigError> {
        let mut text = Vec::new();
        self.advance(); // '['

        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(GitConfigError::InvalidSection),
                Some(b']') => {
                    self.advance();
                    break;
                }
                Some(b' ') => {
                    self.advance();
                    if self.advance() != Some(b'"') {
                        return Err(GitConfigError::InvalidLine);
                    }
                    text.push(b'.');
                    self.parse_subsection(&mut text)?;
                    break;
                }
                Some(b) => {
                    self.advance();
                    text.push(b);
                }
            }
        }

        let section = Section::new(&String::from_utf8_lossy(&text))?;
        self.skip_to_line_end();
        Ok(section)
    }

    /// Reads the quoted subsection body up to its closing, unescaped `"`.
    /// An escaping `\` is dropped and the byte after it kept, except that
    /// `\n` is rejected.
    fn parse_subsection(&mut self, text: &mut Vec<u8>) -> Result<(), GitConfigError> {
        loop {
            let byte = match self.peek() {
                None | Some(b'\n') => return Err(GitConfigError::InvalidSubsection),
                Some(b'"') => return Ok(()),
                Some(b) => b,
            };
            self.advance();
            if byte != b'\\' {
                text.push(byte);
                continue;
            }
            match self.peek() {
                Some(b'n') => return Err(GitConfigError::InvalidKey),
                None | Some(b'\n') => return Err(GitConfigError::InvalidSubsection),
                Some(escaped) => {
                    self.advance();
                    text.push(escaped);
                }
            }
        }
    }

    /// `name = value`. A bare `name` ended by a newline has an empty value.
    fn parse_variable(&mut self) -> Result<(VariableName, Value), GitConfigError> {
        let mut name = String::new();
        let mut space_found = false;

        loop {
            let Some(byte) = self.peek() else { break };
            if byte == b'\n' && !name.is_empty() {
                break;
            }
            self.advance();
            if space_found && is_name_byte(byte) {
                return Err(GitConfigError::InvalidVariableName);
            }
            if byte == b'=' {
                break;
            }
            if is_space(byte) {
                space_found = true;
                continue;
            }
            if !is_name_byte(byte) {
                return Err(GitConfigError::InvalidVariableName);
            }
            name.push(byte as char);
        }

        let name = VariableName::new(&name)?;
        self.skip_inline_space();
        let value = self.parse_value()?;
        Ok((name, value))
    }

    /// Accumulates one logical value, following `\` continuations.
    fn parse_value(&mut self) -> Result<Value, GitConfigError> {
        let mut buf = Vec::new();
        let mut quoted = false;
        let mut same_line_as_key = true;

        while let Some(byte) = self.advance() {
            if byte == b'\n' {
                break;
            }
            if !quoted && (byte == b';' || byte == b'#') {
                self.skip_to_line_end();
                break;
            }
            if byte == b'\\' {
                match self.peek() {
                    None => break,
                    Some(b'\n' | b'\r') => {
                        self.skip_to_line_end();
                        if self.advance().is_none() {
                            break;
                        }
                        same_line_as_key = false;
                        continue;
                    }
                    Some(escaped @ (b't' | b'b' | b'n' | b'\\' | b'"')) => {
                        if !quoted && escaped == b'n' {
                            self.line = self.line.saturating_sub(1);
                        }
                        self.advance();
                        buf.push(byte);
                        buf.push(escaped);
                        continue;
                    }
                    Some(_) if same_line_as_key => {
                        return Err(GitConfigError::InvalidVariableValue);
                    }
                    Some(_) => return Err(GitConfigError::InvalidLine),
                }
            }
            if byte == b'"' {
                quoted = !quoted;
            }
            buf.push(byte);
        }

        while buf.last().is_some_and(|&b| is_space(b)) {
            buf.pop();
        }
        Ok(Value::String(String::from_utf8_lossy(&buf).into_owned()))
    }
}
