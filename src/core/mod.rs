// This file is the module declaration file for the `core` module.
// It declares the submodules that make up the git config-file core and
// re-exports the handful of types callers need.

// `errors` module:
// The error taxonomy of the core. `GitConfigError` names every structural,
// content and lookup failure; `ParseError` wraps one of them together with the
// raw text and 1-based number of the offending line.
pub mod errors;

// `gitconfig` module:
// The in-memory model (`GitConfig`): an ordered map of sections, each an
// ordered map of variable names to value sequences. It exposes get, get_all,
// set, add, unset, keys and save.
pub mod gitconfig;

// `key` module:
// `Section`, `VariableName` and `Key`, plus the character classes that
// decide what a valid section, subsection and variable name look like.
pub mod key;

// `ordered_map` module:
// `OrderedMap<K, V>`, the insertion-ordered container used at both nesting
// levels of `GitConfig`.
pub mod ordered_map;

// `parser` module:
// The single-pass byte scanner that turns the contents of a config file into
// a `GitConfig`, reporting malformed lines with their line number.
pub mod parser;

// `settings` module:
// The tool's own settings (`settings.toml`): which config file to operate on
// by default and which format `export` uses.
pub mod settings;

// `value` module:
// `Value`, the closed set of value kinds, with the escape validation and
// decoding rules for strings.
pub mod value;

pub use errors::{GitConfigError, ParseError};
pub use gitconfig::GitConfig;
pub use key::{Key, Section, VariableName};
pub use value::Value;
