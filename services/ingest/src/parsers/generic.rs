//! Generic column mapper for units without a hand-written parser
//!
//! Columns are matched to the unit's declared fields by position. Dates and
//! fees are recognized from the field name alone.

use tracing::debug;

use super::RowParser;
use crate::date::{normalize_date, strip_thousands};
use crate::paste::{cell, read_lines};
use crate::rows::ParsedRow;

/// Fields that are never filled from a paste (ratings, attachments)
pub const NON_IMPORTABLE_FIELDS: &[&str] = &[
    "ratingQuality",
    "ratingTimeliness",
    "ratingCourtesy",
    "ratingOverall",
    "customerRating",
    "attachmentData",
    "attachmentName",
];

/// A first line with any of these in a cell is a header (lowercase)
const HEADER_HINTS: &[&str] = &["applicant", "name", "province", "date"];

/// Trailing cell added to a serialized header whose field names carry no hint
const HEADER_MARKER_CELL: &str = "Field Name";

const DATE_HINTS: &[&str] = &["date", "validity", "expiry"];

const PROVINCE_FIELD: &str = "province";

pub struct GenericParser {
    unit: String,
    fields: Vec<String>,
}

impl GenericParser {
    pub fn new<S: AsRef<str>>(unit: &str, fields: &[S]) -> Self {
        let fields = fields
            .iter()
            .map(|f| f.as_ref().to_string())
            .filter(|f| !NON_IMPORTABLE_FIELDS.contains(&f.as_str()))
            .collect();
        Self {
            unit: unit.to_string(),
            fields,
        }
    }

    fn map_line(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let mut row = ParsedRow::with_fields(&self.fields);
        for (idx, field) in self.fields.iter().enumerate() {
            let raw = cell(cells, idx);
            let value = if is_date_field(field) {
                normalize_date(raw)
            } else if is_amount_field(field) {
                strip_thousands(raw)
            } else {
                raw.trim().to_string()
            };
            row.insert(field, value);
        }

        if !row.has_values() {
            return None;
        }

        if self.fields.iter().any(|f| f == PROVINCE_FIELD) && row.get(PROVINCE_FIELD).is_empty() {
            row.insert(PROVINCE_FIELD, default_province.trim());
        }
        Some(row)
    }
}

impl RowParser for GenericParser {
    fn unit(&self) -> &str {
        &self.unit
    }

    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }

    fn parse(&self, text: &str, default_province: &str) -> Vec<ParsedRow> {
        let lines = read_lines(text);
        let skip = usize::from(lines.first().is_some_and(|first| looks_like_header(first)));

        let rows: Vec<ParsedRow> = lines
            .iter()
            .skip(skip)
            .filter_map(|cells| self.map_line(cells, default_province))
            .collect();
        debug!(unit = %self.unit, rows = rows.len(), header = skip == 1, "parsed paste");
        rows
    }

    fn serialize(&self, rows: &[ParsedRow]) -> String {
        // First line always sniffs as a header
        let mut header: Vec<String> = self.fields.clone();
        if !looks_like_header(&header) {
            header.push(HEADER_MARKER_CELL.to_string());
        }
        let mut out = header.join("\t");
        out.push('\n');
        for row in rows {
            let values: Vec<&str> = self.fields.iter().map(|f| row.get(f)).collect();
            out.push_str(&values.join("\t"));
            out.push('\n');
        }
        out
    }
}

pub fn looks_like_header(cells: &[String]) -> bool {
    cells.iter().any(|c| {
        let lower = c.to_lowercase();
        HEADER_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

pub fn is_date_field(field: &str) -> bool {
    let lower = field.to_lowercase();
    DATE_HINTS.iter().any(|hint| lower.contains(hint))
}

/// `amount`, `totalAmount`, `fee`, `registrationFee`; not `feedType`
pub fn is_amount_field(field: &str) -> bool {
    let lower = field.to_lowercase();
    lower.contains("amount") || lower.ends_with("fee")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(fields: &[&str]) -> GenericParser {
        GenericParser::new("test-unit", fields)
    }

    #[test]
    fn test_positional_mapping_with_default_province() {
        let p = parser(&["applicant", "province", "dateFiled"]);
        let rows = p.parse("Jane Doe\t\t2024-03-01", "Palawan");

        assert_eq!(rows.len(), 1);
        let expected: ParsedRow = [
            ("applicant", "Jane Doe"),
            ("province", "Palawan"),
            ("dateFiled", "2024-03-01T00:00:00.000Z"),
        ]
        .into_iter()
        .collect();
        assert_eq!(rows[0], expected);
    }

    #[test]
    fn test_header_line_skipped() {
        let p = parser(&["applicant", "province", "dateFiled"]);
        let text = "Applicant\tProvince\tDate Filed\nJane Doe\tRomblon\t03/01/2024\n";
        let rows = p.parse(text, "");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("province"), "Romblon");
        assert_eq!(rows[0].get("dateFiled"), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_first_line_without_hints_is_data() {
        let p = parser(&["applicant", "commodity"]);
        let rows = p.parse("Juan\tRice\nAna\tCorn\n", "");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_non_importable_fields_excluded() {
        let p = parser(&["applicant", "ratingOverall", "attachmentName", "fee"]);
        assert_eq!(p.fields(), vec!["applicant", "fee"]);

        let rows = p.parse("Juan\t1,250.50\t5\n", "");
        assert_eq!(rows[0].get("fee"), "1250.50");
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_amount_and_date_heuristics() {
        assert!(is_amount_field("amount"));
        assert!(is_amount_field("totalAmount"));
        assert!(is_amount_field("registrationFee"));
        assert!(!is_amount_field("feedType"));
        assert!(is_date_field("dateFiled"));
        assert!(is_date_field("inspectionDate"));
        assert!(is_date_field("validity"));
        assert!(!is_date_field("applicant"));
    }

    #[test]
    fn test_empty_rows_dropped_before_province_backfill() {
        let p = parser(&["applicant", "province"]);
        let rows = p.parse("\t\t\nJuan\t\n", "Palawan");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("province"), "Palawan");
    }

    #[test]
    fn test_extra_and_missing_columns() {
        let p = parser(&["applicant", "province", "dateFiled"]);
        let rows = p.parse("Juan\nAna\tRomblon\t01/02/2024\textra\n", "");
        assert_eq!(rows[0].get("dateFiled"), "");
        assert_eq!(rows[1].get("dateFiled"), "2024-01-02T00:00:00.000Z");
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_unparsed_date_kept() {
        let p = parser(&["applicant", "dateFiled"]);
        let rows = p.parse("Juan\tTBD\n", "");
        assert_eq!(rows[0].get("dateFiled"), "TBD");
    }

    #[test]
    fn test_empty_input() {
        let p = parser(&["applicant"]);
        assert!(p.parse("", "Palawan").is_empty());
    }

    #[test]
    fn test_serialized_header_always_sniffed() {
        let p = parser(&["commodity", "variety"]);
        let first = p.parse("Crop Name\tVariety\nDate Palm\tMedjool\n", "");
        assert_eq!(first.len(), 1);

        let text = p.serialize(&first);
        assert!(text.starts_with("commodity\tvariety\tField Name\n"));
        assert_eq!(p.parse(&text, ""), first);
    }

    #[test]
    fn test_reparse_of_serialized_rows_is_identical() {
        let p = parser(&["applicant", "province", "dateFiled", "amount"]);
        let first = p.parse("Jane Doe\t\t2024-03-01\t1,000\nJuan\tRomblon\t\t\n", "Palawan");
        let second = p.parse(&p.serialize(&first), "Palawan");
        assert_eq!(first, second);
    }
}
