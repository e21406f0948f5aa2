//! Best-effort character encoding detection for uploaded files
//!
//! Detection never fails: when nothing points at a specific encoding the
//! answer is UTF-8. Input that is neither UTF-8 nor UTF-16 goes to
//! `chardetng`'s statistical detector.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Number of leading bytes inspected for the UTF-16 NUL-pattern heuristic
const SNIFF_WINDOW: usize = 4096;

/// Share of code units (percent) that must carry a NUL byte on one side
/// before BOM-less input is treated as UTF-16.
const UTF16_NUL_THRESHOLD_PERCENT: usize = 30;

/// How the encoding guess was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Byte-order mark, or the bytes validated as UTF-8
    Certain,
    /// Statistical guess
    Heuristic,
    /// Nothing to go on; defaulted to UTF-8
    Fallback,
}

/// Result of [`detect_encoding`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub confidence: Confidence,
    /// Length of the byte-order mark to skip before decoding
    pub bom_length: usize,
}

impl DetectedEncoding {
    fn new(encoding: &'static Encoding, confidence: Confidence) -> Self {
        Self {
            encoding,
            confidence,
            bom_length: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Guess the text encoding of `bytes`
pub fn detect_encoding(bytes: &[u8]) -> DetectedEncoding {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return DetectedEncoding {
            encoding,
            confidence: Confidence::Certain,
            bom_length,
        };
    }

    if bytes.is_empty() {
        return DetectedEncoding::new(UTF_8, Confidence::Fallback);
    }

    // NUL bytes are valid UTF-8, so UTF-16 has to be ruled out first
    if let Some(encoding) = sniff_utf16(bytes) {
        return DetectedEncoding::new(encoding, Confidence::Heuristic);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return DetectedEncoding::new(UTF_8, Confidence::Certain);
    }

    DetectedEncoding::new(guess_legacy_encoding(bytes), Confidence::Heuristic)
}

/// Statistical guess among legacy single- and multi-byte encodings
fn guess_legacy_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, false)
}

/// ASCII-heavy UTF-16 text has a NUL in every other byte: odd offsets for
/// little-endian, even offsets for big-endian.
fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    let units = window.len() / 2;
    if units < 2 {
        return None;
    }

    let (mut even_nuls, mut odd_nuls) = (0usize, 0usize);
    for pair in window.chunks_exact(2) {
        if pair[0] == 0 {
            even_nuls += 1;
        }
        if pair[1] == 0 {
            odd_nuls += 1;
        }
    }

    let threshold = units * UTF16_NUL_THRESHOLD_PERCENT / 100;
    if odd_nuls > threshold && even_nuls * 4 < odd_nuls {
        Some(UTF_16LE)
    } else if even_nuls > threshold && odd_nuls * 4 < even_nuls {
        Some(UTF_16BE)
    } else {
        None
    }
}
