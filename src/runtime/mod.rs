//! Read-side runtime copied verbatim into every generated `<o>.rs`.
//!
//! `template.rs` is compiled here as part of the crate so the exact text the
//! generator emits is also the text these tests exercise. Within this crate
//! the generated table is empty; tests build their own [`AssetFs`] tables.

#![allow(dead_code)]

include!("template.rs");

/// Source text of the runtime, emitted between the header and the table.
pub const SOURCE: &str = include_str!("template.rs");

static BINDATA_ENTRIES: &[(&str, AssetFile)] = &[];
static BINDATA: AssetFs = AssetFs::new(BINDATA_ENTRIES);
