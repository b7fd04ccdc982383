//! How an item's bytes are rendered by `Display`. Purely cosmetic; the
//! table never looks at it when comparing or hashing.

use core::fmt;

/// Printable kind remembered per key (and per value in a `Dict`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Lowercase hex, e.g. `0x00ff`.
    #[default]
    Bytes,
    /// UTF-8, with invalid sequences replaced.
    Utf8,
    /// Little-endian integers. Fall back to `Bytes` on a length mismatch.
    I32,
    I64,
    U32,
    U64,
}

impl Format {
    pub(crate) fn render(self, bytes: &[u8]) -> Rendered<'_> {
        Rendered {
            format: self,
            bytes,
        }
    }
}

pub(crate) struct Rendered<'a> {
    format: Format,
    bytes: &'a [u8],
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bytes;
        match self.format {
            Format::Utf8 => return write!(f, "{:?}", String::from_utf8_lossy(b)),
            Format::I32 => {
                if let Ok(a) = <[u8; 4]>::try_from(b) {
                    return write!(f, "{}", i32::from_le_bytes(a));
                }
            }
            Format::I64 => {
                if let Ok(a) = <[u8; 8]>::try_from(b) {
                    return write!(f, "{}", i64::from_le_bytes(a));
                }
            }
            Format::U32 => {
                if let Ok(a) = <[u8; 4]>::try_from(b) {
                    return write!(f, "{}", u32::from_le_bytes(a));
                }
            }
            Format::U64 => {
                if let Ok(a) = <[u8; 8]>::try_from(b) {
                    return write!(f, "{}", u64::from_le_bytes(a));
                }
            }
            Format::Bytes => {}
        }
        f.write_str("0x")?;
        for byte in b {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
