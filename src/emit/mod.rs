//! Generated-file writers.
//!
//! # Module Structure
//!
//! ```text
//! emit/
//! ├── header     # banner templates for both files
//! ├── data       # <o>data.rs: statics and accessors
//! ├── runtime    # <o>.rs: runtime source and asset table
//! └── mod.rs     # file creation (this file)
//! ```
//!
//! The data file is written first because writing it assigns symbols; the
//! runtime file's table is built from the resulting registry.

mod data;
mod header;
mod runtime;

pub use data::Asset;

use header::HeaderVars;

use crate::config::Config;
use crate::registry::Registry;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Output file errors.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot create `{}`", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write `<o>data.rs` then `<o>.rs`, returning the filled registry.
pub fn emit(config: &Config, assets: &[Asset]) -> Result<Registry, EmitError> {
    let data_path = config.data_path();
    let vars = HeaderVars {
        pkgname: config.pkgname.clone(),
        data_file: data_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string(),
    };

    let mut registry = Registry::new();
    write_file(&data_path, |out| {
        data::write_data(out, &vars, assets, &mut registry)
    })?;
    write_file(&config.runtime_path(), |out| {
        runtime::write_runtime(out, &vars, &registry)
    })?;
    Ok(registry)
}

fn write_file<F>(path: &Path, body: F) -> Result<(), EmitError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(|source| EmitError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|source| EmitError::Write {
            path: path.to_path_buf(),
            source,
        })
}
