//! Forgiving CSV parser for menu files, with encoding auto-detection.
//!
//! The parser is a two-state machine over characters (plain / quoted). It
//! never fails: stray quotes and ragged rows degrade to best-effort values.
//!
//! - `,` separates fields, `\n` ends a record, `\r` is always dropped
//! - `"` opens a quoted run; inside it `""` is a literal quote, and commas
//!   and newlines are literal
//! - the first record is the header row (cells trimmed, case kept)
//! - rows whose cells are all blank are dropped
//! - columns with an empty header are unreachable; short rows fill with `""`

use serde::Serialize;

use crate::models::RawRecord;

/// Output of [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedCsv {
    /// Header cells, trimmed, in file order.
    pub headers: Vec<String>,
    /// One record per non-blank data row.
    pub records: Vec<RawRecord>,
}

/// Result of decoding and parsing raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub parsed: ParsedCsv,
    /// Detected encoding.
    pub encoding: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Plain,
    Quoted,
}

/// A record holding one empty field and nothing else.
fn is_lone_empty(row: &[String]) -> bool {
    row.len() == 1 && row[0].trim().is_empty()
}

/// Split text into rows of raw cells. Lone-empty records are dropped
/// wherever they appear.
fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Plain;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' {
            continue;
        }
        match state {
            State::Quoted => {
                if ch == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        state = State::Plain;
                    }
                } else {
                    field.push(ch);
                }
            }
            State::Plain => match ch {
                '"' => state = State::Quoted,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    let done = std::mem::take(&mut row);
                    if !is_lone_empty(&done) {
                        rows.push(done);
                    }
                }
                _ => field.push(ch),
            },
        }
    }

    row.push(field);
    if !is_lone_empty(&row) {
        rows.push(row);
    }

    rows
}

/// Parse CSV text into trimmed headers and header-keyed records.
///
/// # Example
/// ```
/// use winelist::parse;
///
/// let parsed = parse("x,y,z\na,\"b,c\",d\n");
/// assert_eq!(parsed.headers, vec!["x", "y", "z"]);
/// assert_eq!(parsed.records[0].get("y"), Some("b,c"));
/// ```
pub fn parse(text: &str) -> ParsedCsv {
    let mut rows = tokenize(text).into_iter();

    let headers: Vec<String> = match rows.next() {
        Some(h) => h.iter().map(|c| c.trim().to_string()).collect(),
        None => return ParsedCsv::default(),
    };

    let mut records = Vec::new();

    for cells in rows {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let mut fields: Vec<(String, String)> = Vec::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = cells.get(i).cloned().unwrap_or_default();
            // Repeated header: the later column wins.
            match fields.iter_mut().find(|(k, _)| k == header) {
                Some(slot) => slot.1 = value,
                None => fields.push((header.clone(), value)),
            }
        }

        records.push(RawRecord::new(fields));
    }

    ParsedCsv { headers, records }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding, dropping a UTF-8 BOM.
///
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            // Valid UTF-8 wins even if chardet guessed a legacy charset.
            match std::str::from_utf8(bytes) {
                Ok(s) => s.to_string(),
                Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
            }
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decode raw bytes (auto-detected encoding) and parse them.
pub fn parse_bytes(bytes: &[u8]) -> ParseResult {
    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding);
    ParseResult {
        parsed: parse(&text),
        encoding,
    }
}
