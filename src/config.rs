//! Build configuration.
//!
//! An optional `gb-web.toml` at the project root overrides the stock
//! tool names and flags. No file means stock defaults; unknown keys are
//! rejected to catch typos early.
//!
//! ```toml
//! # All options are optional — defaults shown below
//!
//! verbose = false           # Print each tool invocation
//!
//! [tools]
//! compiler = "gopherjs"     # Client compiler executable
//! generator = "pagegen"     # Page generator executable
//! compiler_flags = ["-m"]   # Flags between `build` and `-o`
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the optional config file, looked up in the project root.
pub const CONFIG_FILE: &str = "gb-web.toml";

/// Build configuration loaded from `gb-web.toml`.
///
/// All fields have defaults; a config file need only specify the values
/// it wants to override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// External tool names and flags.
    pub tools: ToolsConfig,
    /// Default verbosity; the `--verbose` flag also enables it.
    pub verbose: bool,
}

/// External tool configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Compiler executable name (or path).
    pub compiler: String,
    /// Page generator executable name (or path).
    pub generator: String,
    /// Flags passed to the compiler between `build` and `-o`.
    pub compiler_flags: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            compiler: "gopherjs".to_string(),
            generator: "pagegen".to_string(),
            compiler_flags: vec!["-m".to_string()],
        }
    }
}

impl BuildConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tools.compiler.is_empty() {
            return Err(ConfigError::Validation(
                "tools.compiler must not be empty".into(),
            ));
        }
        if self.tools.generator.is_empty() {
            return Err(ConfigError::Validation(
                "tools.generator must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from the project root, falling back to defaults
/// when no config file exists.
pub fn load_config(project: &Path) -> Result<BuildConfig, ConfigError> {
    let path = project.join(CONFIG_FILE);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        BuildConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Operator-output volume, resolved once from CLI flags and config and
/// threaded into the stages that print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors and tool diagnostics only.
    Quiet,
    /// Stage banners plus tool diagnostics.
    Normal,
    /// Banners, per-job lines, and tool diagnostics.
    Verbose,
}

impl Verbosity {
    pub fn job_lines(self) -> bool {
        matches!(self, Self::Verbose)
    }

    pub fn banners(self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.tools.compiler, "gopherjs");
        assert_eq!(config.tools.generator, "pagegen");
        assert_eq!(config.tools.compiler_flags, vec!["-m"]);
        assert!(!config.verbose);
    }

    #[test]
    fn partial_config_overrides_only_named_values() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join(CONFIG_FILE),
            "[tools]\ncompiler = \"gopherjs-next\"\n",
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.tools.compiler, "gopherjs-next");
        assert_eq!(config.tools.generator, "pagegen");
        assert_eq!(config.tools.compiler_flags, vec!["-m"]);
    }

    #[test]
    fn verbose_can_default_on_from_config() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "verbose = true\n");

        let config = load_config(tmp.path()).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "compilr = \"typo\"\n");

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "[tools\n");

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn empty_compiler_fails_validation() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(CONFIG_FILE), "[tools]\ncompiler = \"\"\n");

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_flags_are_allowed() {
        let tmp = TempDir::new().unwrap();
        write_file(
            &tmp.path().join(CONFIG_FILE),
            "[tools]\ncompiler_flags = []\n",
        );

        let config = load_config(tmp.path()).unwrap();
        assert!(config.tools.compiler_flags.is_empty());
    }

    #[test]
    fn verbosity_gates() {
        assert!(Verbosity::Verbose.job_lines());
        assert!(Verbosity::Verbose.banners());
        assert!(!Verbosity::Normal.job_lines());
        assert!(Verbosity::Normal.banners());
        assert!(!Verbosity::Quiet.banners());
    }
}
