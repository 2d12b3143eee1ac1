//! Text encodings a document can be declared in.

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Encodings understood by the offset scan. Names follow the labels editors show in their
/// status bar, with the common codec aliases accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf16LeBom,
    Utf16BeBom,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Human readable label, also accepted by [`FromStr`].
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf8Bom => "UTF-8 with BOM",
            Encoding::Utf16Le => "UTF-16 LE",
            Encoding::Utf16Be => "UTF-16 BE",
            Encoding::Utf16LeBom => "UTF-16 LE with BOM",
            Encoding::Utf16BeBom => "UTF-16 BE with BOM",
            Encoding::Latin1 => "Western (ISO 8859-1)",
            Encoding::Ascii => "ASCII",
        }
    }

    /// Byte order mark written at the start of files in this encoding.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16LeBom => &[0xFF, 0xFE],
            Encoding::Utf16BeBom => &[0xFE, 0xFF],
            _ => &[],
        }
    }

    /// Width in bytes of one code unit.
    pub fn unit_width(&self) -> usize {
        if self.is_utf16() { 2 } else { 1 }
    }

    pub fn is_utf16(&self) -> bool {
        matches!(
            self,
            Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Utf16LeBom | Encoding::Utf16BeBom
        )
    }

    fn is_big_endian(&self) -> bool {
        matches!(self, Encoding::Utf16Be | Encoding::Utf16BeBom)
    }

    /// Assemble a code unit from its raw bytes. `bytes` holds exactly [`Self::unit_width`] bytes.
    pub fn unit_value(&self, bytes: &[u8]) -> u16 {
        match bytes {
            [single] => u16::from(*single),
            [first, second] if self.is_big_endian() => u16::from_be_bytes([*first, *second]),
            [first, second] => u16::from_le_bytes([*first, *second]),
            _ => 0,
        }
    }

    /// Number of bytes `text` occupies once encoded.
    ///
    /// The text is expected to come out of [`Self::decode`], so every character is representable.
    pub fn encoded_len(&self, text: &str) -> u64 {
        let len = match self {
            Encoding::Utf8 | Encoding::Utf8Bom => text.len(),
            Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Utf16LeBom | Encoding::Utf16BeBom => {
                text.encode_utf16().count() * 2
            }
            Encoding::Latin1 | Encoding::Ascii => text.chars().count(),
        };
        len as u64
    }

    /// Decode raw bytes that do not include a byte order mark. Returns `None` when the bytes are
    /// not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => String::from_utf8(bytes.to_vec()).ok(),
            Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Utf16LeBom | Encoding::Utf16BeBom => {
                if bytes.len() % 2 != 0 {
                    return None;
                }
                let units = bytes.chunks_exact(2).map(|pair| self.unit_value(pair));
                char::decode_utf16(units).collect::<Result<String, _>>().ok()
            }
            Encoding::Latin1 => Some(bytes.iter().map(|&byte| char::from(byte)).collect()),
            Encoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&byte| char::from(byte)).collect()),
        }
    }

    /// Decode a whole file, skipping the byte order mark when the encoding declares one.
    pub fn decode_document(&self, bytes: &[u8]) -> Option<String> {
        let body = bytes.strip_prefix(self.bom()).unwrap_or(bytes);
        self.decode(body)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "utf8" | "undefined" => Ok(Encoding::Utf8),
            "utf8withbom" | "utf8sig" => Ok(Encoding::Utf8Bom),
            "utf16le" => Ok(Encoding::Utf16Le),
            "utf16be" => Ok(Encoding::Utf16Be),
            "utf16lewithbom" => Ok(Encoding::Utf16LeBom),
            "utf16bewithbom" => Ok(Encoding::Utf16BeBom),
            "westerniso88591" | "iso88591" | "latin1" => Ok(Encoding::Latin1),
            "ascii" | "usascii" => Ok(Encoding::Ascii),
            _ => Err(DomainError::UnsupportedEncoding(value.trim().to_string())),
        }
    }
}
