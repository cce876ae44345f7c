//! Read, edit and write git config files while keeping the order of their
//! sections, variables and values.
//!
//! ```no_run
//! use git_sw::core::GitConfig;
//!
//! let mut config = GitConfig::parse(&std::fs::read("/home/me/.gitconfig")?)?;
//! config.set("user.email", ["me@work.example"])?;
//! config.save("/home/me/.gitconfig")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod builders;
pub mod core;
pub mod logging;
pub mod utils;

#[cfg(test)]
mod tests;
