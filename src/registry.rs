//! In-memory table of ingested assets, keyed by logical path.

use rustc_hash::FxHashMap;
use std::fmt;

/// Generator-assigned identifier `bf<N>` (1-based, in ingest order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// Static holding the plain bytes: `__bf<N>`.
    pub fn plain_static(self) -> String {
        format!("__{self}")
    }

    /// Accessor returning the plain bytes: `_bf<N>`.
    pub fn plain_accessor(self) -> String {
        format!("_{self}")
    }

    /// Static holding the gzip bytes: `__cbf<N>`.
    pub fn zip_static(self) -> String {
        format!("__c{self}")
    }

    /// Accessor returning the gzip bytes (or the plain alias): `_cbf<N>`.
    pub fn zip_accessor(self) -> String {
        format!("_c{self}")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bf{}", self.0)
    }
}

/// One embedded asset as it appears in the generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRecord {
    pub symbol: Symbol,
    pub size: u64,
    /// 0 when the compressed form is not stored.
    pub zip_size: u64,
    /// Seconds since the Unix epoch.
    pub mtime: i64,
}

impl AssetRecord {
    pub fn is_compressed(&self) -> bool {
        self.zip_size > 0
    }
}

/// Logical path -> record.
#[derive(Debug, Default)]
pub struct Registry {
    records: FxHashMap<String, AssetRecord>,
    next: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next symbol in ingest order.
    pub fn next_symbol(&mut self) -> Symbol {
        self.next += 1;
        Symbol::new(self.next)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    /// Insert a record. Returns `false` (and keeps the existing record) when
    /// the path is already registered.
    pub fn insert(&mut self, path: String, record: AssetRecord) -> bool {
        if self.records.contains_key(&path) {
            return false;
        }
        self.records.insert(path, record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of records with a stored compressed form.
    pub fn compressed_count(&self) -> usize {
        self.records.values().filter(|r| r.is_compressed()).count()
    }

    /// Records in lexicographic (byte) order of logical path.
    pub fn sorted(&self) -> Vec<(&str, &AssetRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(path, record)| (path.as_str(), record))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
