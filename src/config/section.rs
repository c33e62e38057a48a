//! `[generate]` and `[format]` sections.
//!
//! # Example
//!
//! ```toml
//! [generate]
//! roots = ["static"]          # Input roots, walked in order
//! pkgname = "assets"          # Module name the host mounts the runtime as
//! output = "src/assets"       # Writes src/assetsdata.rs and src/assets.rs
//! no_compress = false         # Never store gzip copies
//! report_skipped = false      # Warn about files that could not be read
//!
//! [format]
//! enable = true
//! command = ["rustfmt", "--edition", "2021"]
//! ```

use serde::Deserialize;
use std::path::PathBuf;

/// Default module name for the generated files.
pub const DEFAULT_PKGNAME: &str = "main";

/// Default output basename.
pub const DEFAULT_OUTPUT: &str = "assets";

/// Generation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub roots: Vec<PathBuf>,
    pub pkgname: Option<String>,
    pub output: Option<String>,
    pub no_compress: bool,
    pub report_skipped: bool,
}

/// Post-format settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub enable: bool,
    /// Program and leading arguments; the generated file path is appended.
    pub command: Vec<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            enable: true,
            command: vec!["rustfmt".into(), "--edition".into(), "2021".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults() {
        let config = FormatConfig::default();
        assert!(config.enable);
        assert_eq!(config.command[0], "rustfmt");
    }

    #[test]
    fn test_generate_partial_section() {
        let config: GenerateConfig = toml::from_str("pkgname = \"web\"").unwrap();
        assert_eq!(config.pkgname.as_deref(), Some("web"));
        assert!(config.roots.is_empty());
        assert!(!config.no_compress);
    }
}
