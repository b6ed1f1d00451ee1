//! Reading pasted spreadsheet selections
//!
//! A paste is newline-separated, tab-delimited text. Cells are trimmed and
//! blank lines (no non-empty cell) are dropped. Quotes are taken literally:
//! spreadsheet copies do not quote tab-separated cells.

/// Decode raw bytes from a file or stdin into text.
///
/// Strips a UTF-8 BOM. Bytes that are not valid UTF-8 are assumed to come
/// from a legacy spreadsheet export and decoded as Windows-1252.
pub fn decode_paste(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Split a paste into non-blank lines of trimmed cells
pub fn read_lines(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .map(|record| record.iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect()
}

/// Value of a cell, empty when the line is shorter
pub fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(String::as_str).unwrap_or("")
}

/// Number of non-empty cells on a line
pub fn filled_count(cells: &[String]) -> usize {
    cells.iter().filter(|c| !c.is_empty()).count()
}

/// Join the non-empty parts with `sep`
pub fn join_non_empty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
