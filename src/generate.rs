//! Generation pipeline: walk → encode → emit → format.

use crate::config::Config;
use crate::emit::{self, Asset};
use crate::encode::Encoded;
use crate::walk::{self, Entry};
use crate::{debug, format, log, warn};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::error::Error;

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub assets: usize,
    pub compressed: usize,
    pub skipped: usize,
    pub failed_roots: usize,
}

/// Run the generator once. Per-file problems are reported, not fatal.
pub fn run(config: &Config) -> Result<Summary> {
    let report = walk::walk(&config.roots);

    for err in &report.failed_roots {
        warn!("walk"; "{}", error_chain(err));
    }
    if config.report_skipped {
        for skipped in &report.skipped {
            warn!("walk"; "skipped {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    let entries = unique(report.entries);
    let assets = encode_all(entries, config.compress)?;

    let registry = emit::emit(config, &assets)
        .with_context(|| format!("Failed to write output `{}`", config.output))?;

    if let Some(command) = &config.formatter {
        format::format_file(command, &config.data_path());
        format::format_file(command, &config.runtime_path());
    }

    let summary = Summary {
        assets: registry.len(),
        compressed: registry.compressed_count(),
        skipped: report.skipped.len(),
        failed_roots: report.failed_roots.len(),
    };
    log!(
        "generate";
        "{} assets ({} compressed) -> {}, {}",
        summary.assets,
        summary.compressed,
        config.runtime_path().display(),
        config.data_path().display()
    );
    debug!(
        "generate";
        "{} files skipped, {} roots failed",
        summary.skipped,
        summary.failed_roots
    );
    Ok(summary)
}

/// Drop later entries whose logical path was already seen.
fn unique(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen = FxHashSet::default();
    entries
        .into_iter()
        .filter(|entry| {
            let first = seen.insert(entry.path.clone());
            if !first {
                debug!("walk"; "duplicate path {}, keeping the first", entry.path);
            }
            first
        })
        .collect()
}

/// gzip in parallel; output keeps ingest order.
fn encode_all(entries: Vec<Entry>, compress: bool) -> Result<Vec<Asset>> {
    entries
        .into_par_iter()
        .map(|entry| -> Result<Asset> {
            let encoded = Encoded::choose(&entry.bytes, compress)
                .with_context(|| format!("Failed to compress `{}`", entry.path))?;
            Ok(Asset {
                path: entry.path,
                mtime: entry.mtime,
                bytes: entry.bytes,
                encoded,
            })
        })
        .collect()
}

/// `err` followed by its source chain, `: `-separated.
fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
