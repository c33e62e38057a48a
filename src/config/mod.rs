//! Generator configuration: optional TOML file layered under CLI flags.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [generate] and [format]
//! ├── error      # ConfigError
//! └── mod.rs     # Config (this file)
//! ```
//!
//! Precedence is CLI flag, then config file, then built-in default.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{DEFAULT_OUTPUT, DEFAULT_PKGNAME, FormatConfig, GenerateConfig};

use crate::cli::Cli;
use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root structure of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub generate: GenerateConfig,
    pub format: FormatConfig,
}

impl FileConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }
}

/// Fully resolved settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub roots: Vec<PathBuf>,
    pub pkgname: String,
    /// Output basename; files are `<output>data.rs` and `<output>.rs`.
    pub output: String,
    pub compress: bool,
    pub report_skipped: bool,
    /// Formatter program and arguments, `None` when formatting is off.
    pub formatter: Option<Vec<String>>,
}

impl Config {
    /// Load the config file named by `--config` (if any) and apply CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file)?)
    }

    /// Combine CLI flags with file settings and validate the result.
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let FileConfig { generate, format } = file;

        let roots = if cli.roots.is_empty() {
            generate.roots
        } else {
            cli.roots.clone()
        };

        let formatter = (format.enable && !cli.no_fmt && !format.command.is_empty())
            .then_some(format.command);

        let config = Self {
            roots,
            pkgname: cli
                .pkgname
                .clone()
                .or(generate.pkgname)
                .unwrap_or_else(|| DEFAULT_PKGNAME.to_string()),
            output: cli
                .output
                .clone()
                .or(generate.output)
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            compress: !(cli.no_compress || generate.no_compress),
            report_skipped: cli.report_skipped || generate.report_skipped,
            formatter,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.roots.is_empty() {
            return Err(ConfigError::Validation(
                "no input roots given (pass ROOT arguments or set generate.roots)".into(),
            ));
        }
        if !is_rust_ident(&self.pkgname) {
            return Err(ConfigError::Validation(format!(
                "pkgname `{}` is not a valid Rust module name",
                self.pkgname
            )));
        }
        if self.output.is_empty() || self.output.ends_with(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "output `{}` must name a file basename",
                self.output
            )));
        }
        Ok(())
    }

    /// `<output>data.rs`
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(format!("{}data.rs", self.output))
    }

    /// `<output>.rs`
    pub fn runtime_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.rs", self.output))
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Whether `name` can be used as a module name (`mod <name>;`).
pub fn is_rust_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name != "_"
        && !KEYWORDS.contains(&name)
}
