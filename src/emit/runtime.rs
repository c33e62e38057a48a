//! `<o>.rs`: header, the fixed runtime, and the sorted asset table.

use super::header::{HeaderVars, RUNTIME_HEADER};
use crate::registry::Registry;
use crate::runtime::SOURCE;
use std::io::{self, Write};

pub fn write_runtime<W: Write>(
    out: &mut W,
    vars: &HeaderVars,
    registry: &Registry,
) -> io::Result<()> {
    out.write_all(RUNTIME_HEADER.render(vars).as_bytes())?;
    out.write_all(SOURCE.as_bytes())?;
    writeln!(out)?;
    writeln!(out, "include!({:?});", vars.data_file)?;
    writeln!(out)?;

    writeln!(out, "static BINDATA_ENTRIES: &[(&str, AssetFile)] = &[")?;
    for (path, record) in registry.sorted() {
        writeln!(
            out,
            "    ({path:?}, AssetFile {{ data: {}, zip: {}, size: {}, zip_size: {}, time: {} }}),",
            record.symbol.plain_accessor(),
            record.symbol.zip_accessor(),
            record.size,
            record.zip_size,
            record.mtime,
        )?;
    }
    writeln!(out, "];")?;
    writeln!(out)?;
    writeln!(out, "static BINDATA: AssetFs = AssetFs::new(BINDATA_ENTRIES);")?;
    Ok(())
}
