//! `<o>data.rs`: one byte-string static and accessor per asset.

use super::header::{DATA_HEADER, HeaderVars};
use crate::encode::{self, Encoded};
use crate::registry::{AssetRecord, Registry};
use std::io::{self, Write};

/// An ingested file with its compression decision made.
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: String,
    pub mtime: i64,
    pub bytes: Vec<u8>,
    pub encoded: Encoded,
}

/// Write the data file and register every asset in `registry`.
///
/// Assets whose logical path is already registered are left out.
pub fn write_data<W: Write>(
    out: &mut W,
    vars: &HeaderVars,
    assets: &[Asset],
    registry: &mut Registry,
) -> io::Result<()> {
    out.write_all(DATA_HEADER.render(vars).as_bytes())?;

    for asset in assets {
        if registry.contains(&asset.path) {
            continue;
        }
        let symbol = registry.next_symbol();
        let plain = symbol.plain_static();

        write!(out, "static {plain}: &[u8] = b\"")?;
        encode::write_escaped(out, &asset.bytes)?;
        writeln!(out, "\";")?;
        writeln!(
            out,
            "fn {}() -> &'static [u8] {{ {plain} }}",
            symbol.plain_accessor()
        )?;

        match asset.encoded.compressed() {
            Some(zipped) => {
                let zip = symbol.zip_static();
                write!(out, "static {zip}: &[u8] = b\"")?;
                encode::write_escaped(out, zipped)?;
                writeln!(out, "\";")?;
                writeln!(
                    out,
                    "fn {}() -> &'static [u8] {{ {zip} }}",
                    symbol.zip_accessor()
                )?;
            }
            None => writeln!(
                out,
                "fn {}() -> &'static [u8] {{ {plain} }}",
                symbol.zip_accessor()
            )?,
        }
        writeln!(out)?;

        registry.insert(
            asset.path.clone(),
            AssetRecord {
                symbol,
                size: asset.bytes.len() as u64,
                zip_size: asset.encoded.compressed_size() as u64,
                mtime: asset.mtime,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Symbol;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn vars() -> HeaderVars {
        HeaderVars {
            pkgname: "main".into(),
            data_file: "assetsdata.rs".into(),
        }
    }

    fn asset(path: &str, bytes: &[u8], compress: bool) -> Asset {
        Asset {
            path: path.to_string(),
            mtime: 1_718_461_845,
            bytes: bytes.to_vec(),
            encoded: Encoded::choose(bytes, compress).unwrap(),
        }
    }

    fn record(registry: &Registry, path: &str) -> AssetRecord {
        registry
            .sorted()
            .into_iter()
            .find(|(key, _)| *key == path)
            .map(|(_, record)| *record)
            .unwrap()
    }

    fn render(assets: &[Asset]) -> (String, Registry) {
        let mut registry = Registry::new();
        let mut out = Vec::new();
        write_data(&mut out, &vars(), assets, &mut registry).unwrap();
        (String::from_utf8(out).unwrap(), registry)
    }

    /// Decode the `b"..."` literal assigned to `name`.
    fn literal(text: &str, name: &str) -> Option<Vec<u8>> {
        let start = format!("static {name}: &[u8] = b\"");
        let line = text.lines().find(|l| l.starts_with(&start))?;
        let body = line.strip_prefix(&start)?.strip_suffix("\";")?;
        body.as_bytes()
            .chunks(4)
            .map(|c| {
                assert_eq!(&c[..2], b"\\x");
                u8::from_str_radix(std::str::from_utf8(&c[2..]).unwrap(), 16).ok()
            })
            .collect()
    }

    #[test]
    fn test_small_text_suppressed() {
        let (text, registry) = render(&[asset("a.txt", b"hi", true)]);
        assert!(text.contains("static __bf1: &[u8] = b\"\\x68\\x69\";"));
        assert!(text.contains("fn _bf1() -> &'static [u8] { __bf1 }"));
        assert!(text.contains("fn _cbf1() -> &'static [u8] { __bf1 }"));
        assert!(!text.contains("__cbf1"));

        let record = record(&registry, "a.txt");
        assert_eq!(record.size, 2);
        assert_eq!(record.zip_size, 0);
    }

    #[test]
    fn test_compressible_stored_and_decodes() {
        let bytes = vec![b'A'; 10000];
        let (text, registry) = render(&[asset("big.txt", &bytes, true)]);

        assert_eq!(literal(&text, "__bf1").unwrap(), bytes);
        let zipped = literal(&text, "__cbf1").unwrap();
        assert!(text.contains("fn _cbf1() -> &'static [u8] { __cbf1 }"));

        let mut out = Vec::new();
        GzDecoder::new(zipped.as_slice()).read_to_end(&mut out).unwrap();
        assert_eq!(out, bytes);

        let record = record(&registry, "big.txt");
        assert_eq!(record.zip_size, zipped.len() as u64);
        assert!(record.zip_size < record.size);
    }

    #[test]
    fn test_no_compress_aliases_everything() {
        let bytes = vec![b'A'; 10000];
        let (text, registry) = render(&[asset("big.txt", &bytes, false)]);
        assert!(literal(&text, "__cbf1").is_none());
        assert!(text.contains("fn _cbf1() -> &'static [u8] { __bf1 }"));
        assert_eq!(registry.compressed_count(), 0);
    }

    #[test]
    fn test_binary_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let (text, _) = render(&[asset("all.bin", &bytes, false)]);
        assert_eq!(literal(&text, "__bf1").unwrap(), bytes);
    }

    #[test]
    fn test_empty_file() {
        let (text, registry) = render(&[asset("empty", b"", true)]);
        assert!(text.contains("static __bf1: &[u8] = b\"\";"));
        assert_eq!(record(&registry, "empty").size, 0);
        assert!(!record(&registry, "empty").is_compressed());
    }

    #[test]
    fn test_symbols_follow_ingest_order() {
        let (text, registry) = render(&[
            asset("z.txt", b"z", true),
            asset("a.txt", b"a", true),
            asset("z.txt", b"again", true),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(record(&registry, "z.txt").symbol, Symbol::new(1));
        assert_eq!(record(&registry, "a.txt").symbol, Symbol::new(2));
        assert_eq!(literal(&text, "__bf1").unwrap(), b"z");
        assert!(literal(&text, "__bf3").is_none());
    }

    #[test]
    fn test_header_has_no_inner_attributes() {
        let (text, _) = render(&[]);
        assert!(text.starts_with("// Code generated by bindata. DO NOT EDIT."));
        assert!(!text.contains("#!["));
        assert!(!text.contains("//!"));
    }
}
