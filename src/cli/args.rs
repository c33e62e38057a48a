//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Embed files as Rust source with an HTTP serving runtime
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to embed, walked in the order given
    #[arg(value_name = "ROOT", value_hint = clap::ValueHint::AnyPath)]
    pub roots: Vec<PathBuf>,

    /// Module name the host crate mounts the generated runtime as (default: main)
    #[arg(long, visible_alias = "pkg")]
    pub pkgname: Option<String>,

    /// Output basename; writes `<OUTPUT>data.rs` and `<OUTPUT>.rs` (default: assets)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<String>,

    /// Never store gzip copies
    #[arg(long = "nc", visible_alias = "nz")]
    pub no_compress: bool,

    /// Config file path
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Skip running the formatter on the generated files
    #[arg(long)]
    pub no_fmt: bool,

    /// Warn about files that were skipped because they could not be read
    #[arg(long)]
    pub report_skipped: bool,

    /// Print per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::parse_from([
            "bindata", "-v", "--color", "never", "-C", "bindata.toml", "static", "img",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config, Some(PathBuf::from("bindata.toml")));
        assert_eq!(cli.roots, [PathBuf::from("static"), PathBuf::from("img")]);
        assert!(cli.pkgname.is_none());
        assert!(!cli.no_compress);
    }
}
