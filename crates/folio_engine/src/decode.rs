use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use folio_logging::folio_warn;

/// One step of the decoding fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackEncoding {
    Utf8,
    /// A fixed legacy encoding, e.g. windows-1252.
    Label(&'static Encoding),
    /// Let chardetng guess a regional legacy encoding from the bytes.
    Detect,
}

impl FallbackEncoding {
    /// UTF-8 first, then the Western European 8-bit code page.
    pub fn default_chain() -> Vec<FallbackEncoding> {
        vec![FallbackEncoding::Utf8, FallbackEncoding::Label(WINDOWS_1252)]
    }
}

impl fmt::Display for FallbackEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackEncoding::Utf8 => f.write_str("UTF-8"),
            FallbackEncoding::Label(enc) => f.write_str(enc.name()),
            FallbackEncoding::Detect => f.write_str("auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding label {0:?}")]
pub struct UnknownEncoding(pub String);

impl FromStr for FallbackEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.eq_ignore_ascii_case("auto") || label.eq_ignore_ascii_case("detect") {
            return Ok(FallbackEncoding::Detect);
        }
        match Encoding::for_label(label.as_bytes()) {
            Some(enc) if enc == UTF_8 => Ok(FallbackEncoding::Utf8),
            Some(enc) => Ok(FallbackEncoding::Label(enc)),
            None => Err(UnknownEncoding(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not valid text in any of: {tried}")]
    Exhausted { tried: String },
}

/// Text extracted from one file, or the placeholder that stands in for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedContent {
    Text {
        text: String,
        encoding: &'static str,
    },
    Placeholder {
        text: String,
        reason: String,
    },
}

impl DecodedContent {
    pub fn as_str(&self) -> &str {
        match self {
            DecodedContent::Text { text, .. } | DecodedContent::Placeholder { text, .. } => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, DecodedContent::Placeholder { .. })
    }
}

/// Placeholder text for a file that could not be read or decoded.
pub fn placeholder(label: &str, reason: &str) -> String {
    format!("<error: {label}: {reason}>")
}

#[derive(Debug, Clone)]
pub struct Decoder {
    chain: Vec<FallbackEncoding>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(FallbackEncoding::default_chain())
    }
}

impl Decoder {
    /// An empty chain falls back to [`FallbackEncoding::default_chain`].
    pub fn new(chain: Vec<FallbackEncoding>) -> Self {
        let chain = if chain.is_empty() {
            FallbackEncoding::default_chain()
        } else {
            chain
        };
        Self { chain }
    }

    pub fn chain(&self) -> &[FallbackEncoding] {
        &self.chain
    }

    /// Decode raw bytes using: BOM -> each fallback in order. Returns the
    /// text and the name of the encoding that succeeded.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<(String, &'static str), DecodeError> {
        // 1) A BOM is authoritative when the bytes agree with it.
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            if let Some(text) = decode_strict(&bytes[bom_len..], encoding) {
                return Ok((text, encoding.name()));
            }
        }

        // 2) The configured chain, first success wins.
        for step in &self.chain {
            let encoding = match *step {
                FallbackEncoding::Utf8 => UTF_8,
                FallbackEncoding::Label(enc) => enc,
                FallbackEncoding::Detect => {
                    let mut detector = EncodingDetector::new();
                    detector.feed(bytes, true);
                    detector.guess(None, true)
                }
            };
            if let Some(text) = decode_strict(bytes, encoding) {
                return Ok((text, encoding.name()));
            }
        }

        Err(DecodeError::Exhausted {
            tried: self
                .chain
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Read and decode one file. Never fails: unreadable or undecodable files
    /// yield a placeholder naming the file and the reason.
    pub fn decode_file(&self, path: &Path, label: &str) -> DecodedContent {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => return self.placeholder_for(label, err.to_string()),
        };
        match self.decode_bytes(&bytes) {
            Ok((text, encoding)) => DecodedContent::Text { text, encoding },
            Err(err) => self.placeholder_for(label, err.to_string()),
        }
    }

    fn placeholder_for(&self, label: &str, reason: String) -> DecodedContent {
        folio_warn!("Substituting placeholder for {}: {}", label, reason);
        DecodedContent::Placeholder {
            text: placeholder(label, &reason),
            reason,
        }
    }
}

fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}
