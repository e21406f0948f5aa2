//! Decode uploaded bytes and parse them into a header-keyed table
//!
//! The pipeline is a chain of named fallback steps:
//!
//! 1. [`decode`]: decode with the detected encoding, or fall back to UTF-8
//!    with invalid sequences dropped
//! 2. [`normalize_line_endings`]: `\r\n` and bare `\r` become `\n`
//! 3. [`parse_table`]: tab-delimited first, comma-delimited when the tab parse
//!    yields a single column or fails structurally
//!
//! Missing-value tokens such as `NA` or `null` read as empty cells. Blank rows
//! are dropped and short rows are padded with empty cells, so every row in a
//! [`Table`] has exactly one cell per header.

use std::borrow::Cow;
use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::encoding::DetectedEncoding;
use super::ProcessingError;

/// Field separator used to parse a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
        }
    }
}

/// Text produced by [`decode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// True when the detected encoding failed and lossy UTF-8 was used
    pub lossy: bool,
}

/// Decode `bytes` with the detected encoding.
///
/// Malformed input never fails: it is re-decoded as UTF-8 with invalid byte
/// sequences dropped. A leading byte-order mark is removed either way.
pub fn decode(bytes: &[u8], detected: DetectedEncoding) -> DecodedText {
    let body = bytes.get(detected.bom_length..).unwrap_or_default();

    match detected
        .encoding
        .decode_without_bom_handling_and_without_replacement(body)
    {
        Some(text) => DecodedText {
            text: strip_bom(text.into_owned()),
            lossy: false,
        },
        None => {
            debug!(
                encoding = detected.name(),
                "Decoding failed, falling back to lossy UTF-8"
            );
            DecodedText {
                text: strip_bom(decode_utf8_dropping_invalid(bytes)),
                lossy: true,
            }
        },
    }
}

/// Decode as UTF-8, silently dropping every invalid byte sequence
pub fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Convert `\r\n` and bare `\r` line endings to `\n`
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// A parsed table: unique headers plus rows of equal width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: Delimiter,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (the header row is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Delimiter the table was finally parsed with
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |cells| Row {
            headers: &self.headers,
            cells,
        })
    }
}

/// One data row, viewed as a header → cell mapping
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell under `header`, or `None` when the table has no such column
    pub fn get(&self, header: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
    }
}

/// Decode, normalize and parse uploaded bytes into a [`Table`]
pub fn parse_bytes(bytes: &[u8], detected: DetectedEncoding) -> Result<Table, ProcessingError> {
    let decoded = decode(bytes, detected);
    let text = normalize_line_endings(&decoded.text);
    parse_table(&text)
}

/// Parse text, inferring whether the delimiter is tab or comma
pub fn parse_table(text: &str) -> Result<Table, ProcessingError> {
    match parse_delimited(text, Delimiter::Tab) {
        Ok(table) if table.column_count() == 1 => {
            debug!("Tab parse produced a single column, re-parsing as comma-delimited");
            parse_delimited(text, Delimiter::Comma)
        },
        Ok(table) => Ok(table),
        Err(e) => {
            debug!(error = %e, "Tab parse failed, falling back to comma-delimited");
            parse_delimited(text, Delimiter::Comma)
        },
    }
}

/// Parse text with a fixed delimiter.
///
/// The first record is the header row. Rows with more cells than headers are
/// a structural error. Missing-value tokens ([`NULL_TOKENS`]) become empty
/// cells, rows left entirely empty are dropped and shorter rows are padded.
pub fn parse_delimited(text: &str, delimiter: Delimiter) -> Result<Table, ProcessingError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => unique_headers(&record?),
        None => {
            return Ok(Table {
                headers: Vec::new(),
                rows: Vec::new(),
                delimiter,
            })
        },
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;

        if record.len() > headers.len() {
            return Err(ProcessingError::Structural {
                expected: headers.len(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
            });
        }

        let mut cells: Vec<String> = record
            .iter()
            .map(|cell| if is_null_token(cell) { "" } else { cell })
            .map(str::to_string)
            .collect();

        if cells.iter().all(String::is_empty) {
            continue;
        }

        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    Ok(Table {
        headers,
        rows,
        delimiter,
    })
}

/// Cell values read as missing data. Matching is exact and case-sensitive;
/// header cells are never treated as missing.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when `cell` stands for a missing value
pub fn is_null_token(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell)
}

/// Name blank headers `Unnamed: N` and suffix repeats with `.1`, `.2`, ...
/// so every header addresses exactly one column.
fn unique_headers(record: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(record.len());

    for (index, raw) in record.iter().enumerate() {
        let base = if raw.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ingest::encoding::detect_encoding;
    use encoding_rs::{UTF_16LE, UTF_8};

    #[test]
    fn test_decode_valid_utf8() {
        let bytes = "Title\nCafé\n".as_bytes();
        let decoded = decode(bytes, detect_encoding(bytes));
        assert_eq!(decoded.text, "Title\nCafé\n");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFURL,Title\n";
        let decoded = decode(bytes, detect_encoding(bytes));
        assert_eq!(decoded.text, "URL,Title\n");
    }

    #[test]
    fn test_decode_windows_1252() {
        let bytes = b"Title\nCaf\xe9 au lait\n";
        let decoded = decode(bytes, detect_encoding(bytes));
        assert_eq!(decoded.text, "Title\nCafé au lait\n");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_decode_failure_falls_back_to_lossy_utf8() {
        // Odd byte count is malformed UTF-16
        let bytes = b"A\0B\0C";
        let detected = DetectedEncoding {
            encoding: UTF_16LE,
            confidence: crate::ingest::encoding::Confidence::Heuristic,
            bom_length: 0,
        };
        let decoded = decode(bytes, detected);
        assert!(decoded.lossy);
        assert_eq!(decoded.text, "A\0B\0C");
    }

    #[test]
    fn test_lossy_utf8_drops_invalid_sequences() {
        assert_eq!(decode_utf8_dropping_invalid(b"ab\xffcd\xc3"), "abcd");
        assert_eq!(decode_utf8_dropping_invalid("é".as_bytes()), "é");
    }

    #[test]
    fn test_decode_utf8_never_reports_lossy_for_valid_input() {
        let detected = DetectedEncoding {
            encoding: UTF_8,
            confidence: crate::ingest::encoding::Confidence::Fallback,
            bom_length: 0,
        };
        assert!(!decode(b"", detected).lossy);
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tab_delimited() {
        let table = parse_table("Title\tLink\nHello\thttp://x\n").unwrap();
        assert_eq!(table.delimiter(), Delimiter::Tab);
        assert_eq!(table.headers(), ["Title", "Link"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_single_column_tab_parse_retries_with_comma() {
        let table = parse_table("URL,Headline\nhttp://x,Hello\n").unwrap();
        assert_eq!(table.delimiter(), Delimiter::Comma);
        assert_eq!(table.column_count(), 2);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Headline"), Some("Hello"));
    }

    #[test]
    fn test_structural_tab_failure_falls_back_to_comma() {
        // Tab header has 1 column but row 2 has 2 tab cells
        let text = "URL,Headline\nhttp://x,Hello\tWorld\n";
        assert!(matches!(
            parse_delimited(text, Delimiter::Tab),
            Err(ProcessingError::Structural { .. })
        ));
        let table = parse_table(text).unwrap();
        assert_eq!(table.delimiter(), Delimiter::Comma);
        assert_eq!(table.rows().next().unwrap().get("Headline"), Some("Hello\tWorld"));
    }

    #[test]
    fn test_structural_failure_under_both_delimiters() {
        let err = parse_table("a,b\n1,2,3\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error tokenizing data. Expected 2 fields in line 2, saw 3"
        );
    }

    #[test]
    fn test_header_only_yields_zero_rows() {
        let table = parse_table("URL,Headline,Author,Date\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn test_blank_input_yields_zero_rows() {
        assert!(parse_table("").unwrap().is_empty());
        assert!(parse_table("\n\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_blank_rows_dropped() {
        let table = parse_table("URL,Title\n,\nhttp://x,Hi\n\n,\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_null_tokens_become_empty_cells() {
        let table = parse_table("URL,Headline,Author\nhttp://x,null,NaN\n").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("URL"), Some("http://x"));
        assert_eq!(row.get("Headline"), Some(""));
        assert_eq!(row.get("Author"), Some(""));
    }

    #[test]
    fn test_rows_of_only_null_tokens_are_dropped() {
        let table = parse_table("URL,Headline\nN/A,NA\n#N/A,<NA>\nhttp://x,Hi\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows().next().unwrap().get("URL"), Some("http://x"));
    }

    #[test]
    fn test_null_tokens_match_exactly() {
        let table = parse_table("Headline,Author\nNA ,Nancy\nNone,none\n").unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("Headline"), Some("NA "));
        assert_eq!(rows[1].get("Headline"), Some(""));
        assert_eq!(rows[1].get("Author"), Some("none"));
    }

    #[test]
    fn test_null_tokens_in_header_are_kept() {
        let table = parse_table("NA,URL\nx,http://x\n").unwrap();
        assert_eq!(table.headers(), ["NA", "URL"]);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse_table("URL,Title,Author\nhttp://x\n").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("URL"), Some("http://x"));
        assert_eq!(row.get("Title"), Some(""));
        assert_eq!(row.get("Author"), Some(""));
        assert_eq!(row.get("Date"), None);
    }

    #[test]
    fn test_quoted_fields() {
        let text = "Title,URL\n\"Hello, world\",http://x\n\"multi\nline\",http://y\n";
        let table = parse_table(text).unwrap();
        let titles: Vec<_> = table.rows().map(|r| r.get("Title").unwrap()).collect();
        assert_eq!(titles, ["Hello, world", "multi\nline"]);
    }

    #[test]
    fn test_duplicate_and_blank_headers_are_disambiguated() {
        let table = parse_table("Title,Title,,Title\na,b,c,d\n").unwrap();
        assert_eq!(table.headers(), ["Title", "Title.1", "Unnamed: 2", "Title.2"]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Title"), Some("a"));
        assert_eq!(row.get("Title.1"), Some("b"));
    }

    #[test]
    fn test_parse_bytes_crlf_and_bare_cr() {
        let bytes = b"URL,Title\r\nhttp://x,Hi\rhttp://y,Yo\r\n";
        let table = parse_bytes(bytes, detect_encoding(bytes)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows().nth(1).unwrap().get("URL"), Some("http://y"));
    }
}
