//! Image format sniffing.
//!
//! A file's header is trusted over its name: `read` only consults the
//! extension when the first bytes match no known signature.

use crate::IoResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PNG file signature.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// JPEG start-of-image marker followed by the first segment marker.
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Longest signature, i.e. how many header bytes are worth reading.
const SNIFF_LEN: usize = PNG_SIGNATURE.len();

/// Image formats cornermark can decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
    /// Anything else.
    Unknown,
}

impl Format {
    const KNOWN: [Format; 2] = [Format::Png, Format::Jpeg];

    fn signature(self) -> &'static [u8] {
        match self {
            Format::Png => PNG_SIGNATURE,
            Format::Jpeg => JPEG_SOI,
            Format::Unknown => &[],
        }
    }

    /// Lowercase file extensions mapped to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Png => &["png"],
            Format::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            Format::Unknown => &[],
        }
    }

    /// Sniffs the file header, then falls back to the extension.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let sniffed = Self::from_magic_bytes(path)?;
        Ok(if sniffed == Format::Unknown {
            Self::from_extension(path)
        } else {
            sniffed
        })
    }

    /// Format implied by the path's extension, case-insensitive.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return Format::Unknown;
        };
        Self::KNOWN
            .into_iter()
            .find(|f| f.extensions().iter().any(|known| ext.eq_ignore_ascii_case(known)))
            .unwrap_or(Format::Unknown)
    }

    /// Reads up to the longest signature from the file and sniffs it.
    pub fn from_magic_bytes<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let mut header = Vec::with_capacity(SNIFF_LEN);
        File::open(path)?
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut header)?;
        Ok(Self::from_bytes(&header))
    }

    /// Format whose signature prefixes `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|f| bytes.starts_with(f.signature()))
            .unwrap_or(Format::Unknown)
    }

    /// Preferred extension when writing; empty for [`Format::Unknown`].
    pub fn extension(&self) -> &'static str {
        self.extensions().first().copied().unwrap_or("")
    }

    /// Returns `true` if the format keeps an alpha channel on write.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, Format::Png)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Unknown => "unknown",
        })
    }
}
