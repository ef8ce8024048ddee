//! Shared configuration loader for the llmd toolchain.
//!
//! `defaults/llmd.default.toml` is embedded into every binary so documented
//! and effective defaults cannot drift apart. Applications layer user files
//! and per-key overrides on top via [`Loader`] before deserializing into
//! [`LlmdConfig`], whose `compile` section is the compiler core's own
//! [`CompileOptions`] record.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

pub use config::{ConfigError, ValueKind};
use llmd_compiler::CompileOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/llmd.default.toml");

/// Well-known user configuration locations, tried in order.
pub const DEFAULT_LOCATIONS: &[&str] = &["llmd.toml", "config/llmd.toml"];

/// Top-level configuration consumed by llmd applications.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmdConfig {
    pub compile: CompileOptions,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. A missing file is an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (skipped if absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LlmdConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LlmdConfig, ConfigError> {
    Loader::new().build()
}
