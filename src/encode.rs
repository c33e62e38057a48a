//! Payload encoding: gzip, the size heuristic, and byte-literal escaping.
//!
//! The escaped form is what goes between the quotes of a Rust byte string
//! (`b"..."`). Every byte becomes `\xNN` with lowercase hex digits, so the
//! output never depends on how the bytes would decode as text.

use flate2::{Compression, write::GzEncoder};
use std::io::{self, Write};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Result of encoding one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// Only the plain bytes are stored; the compressed accessor aliases them.
    Plain,
    /// gzip output that is strictly smaller than the plain bytes.
    Compressed(Vec<u8>),
}

impl Encoded {
    /// Apply the size heuristic to `bytes`.
    ///
    /// With `compress == false` gzip is never run.
    pub fn choose(bytes: &[u8], compress: bool) -> io::Result<Self> {
        if !compress {
            return Ok(Self::Plain);
        }
        let zipped = gzip(bytes)?;
        if bytes.len() > zipped.len() {
            Ok(Self::Compressed(zipped))
        } else {
            Ok(Self::Plain)
        }
    }

    /// Compressed size as recorded in the table (0 when suppressed).
    pub fn compressed_size(&self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Compressed(bytes) => bytes.len(),
        }
    }

    pub fn compressed(&self) -> Option<&[u8]> {
        match self {
            Self::Plain => None,
            Self::Compressed(bytes) => Some(bytes),
        }
    }
}

/// Compress `bytes` as a single-member gzip stream at the default level.
pub fn gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Write `bytes` as a run of `\xNN` sequences, in fixed-size chunks.
pub fn write_escaped<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    let mut buf = [0u8; 4096];
    for chunk in bytes.chunks(buf.len() / 4) {
        for (i, &b) in chunk.iter().enumerate() {
            let at = i * 4;
            buf[at] = b'\\';
            buf[at + 1] = b'x';
            buf[at + 2] = HEX[usize::from(b >> 4)];
            buf[at + 3] = HEX[usize::from(b & 0x0f)];
        }
        out.write_all(&buf[..chunk.len() * 4])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn escape(bytes: &[u8]) -> String {
        let mut out = Vec::new();
        write_escaped(&mut out, bytes).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn gunzip(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_escape_lowercase_hex() {
        assert_eq!(escape(&[0x00, 0xff, b'h', 0x0a]), "\\x00\\xff\\x68\\x0a");
        assert_eq!(escape(&[]), "");
    }

    #[test]
    fn test_escape_fixed_expansion() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(escape(&bytes).len(), bytes.len() * 4);
    }

    #[test]
    fn test_escape_across_chunks() {
        // Longer than one chunk to cover the chunk boundary.
        let bytes: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 256) as u8).collect();
        let expected: String = bytes.iter().map(|b| format!("\\x{b:02x}")).collect();
        assert_eq!(escape(&bytes), expected);
    }

    #[test]
    fn test_gzip_decodes_to_input() {
        let input = b"hello hello hello hello";
        assert_eq!(gunzip(&gzip(input).unwrap()), input);
    }

    #[test]
    fn test_small_payload_suppressed() {
        let encoded = Encoded::choose(b"hi", true).unwrap();
        assert_eq!(encoded, Encoded::Plain);
        assert_eq!(encoded.compressed_size(), 0);
        assert!(encoded.compressed().is_none());
    }

    #[test]
    fn test_compressible_payload_stored() {
        let input = vec![b'A'; 10000];
        let encoded = Encoded::choose(&input, true).unwrap();
        let size = encoded.compressed_size();
        assert!(size > 0 && size < 10000);
        assert_eq!(gunzip(encoded.compressed().unwrap()), input);
    }

    #[test]
    fn test_compression_disabled() {
        let input = vec![b'A'; 10000];
        assert_eq!(Encoded::choose(&input, false).unwrap(), Encoded::Plain);
    }

    #[test]
    fn test_empty_payload_suppressed() {
        assert_eq!(Encoded::choose(&[], true).unwrap(), Encoded::Plain);
    }
}
