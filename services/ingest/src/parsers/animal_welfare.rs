//! Animal welfare facility registrations
//!
//! Two layouts share one unit: the 14-column new-application sheet and the
//! 12-column renewal sheet, which has no classification or issue date. The
//! layout is chosen per row by width.

use tracing::debug;

use super::{extract_columns, first_non_empty, header_line, serialize_row, Column, RowParser};
use crate::province::{resolve_province, AliasTable};
use crate::rows::ParsedRow;
use crate::section::{data_rows, SectionRules};

pub const UNIT: &str = "animal-welfare";

const NEW_COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::text("Name of Facility", "facilityName"),
    Column::text("Name of Owner/Operator", "ownerName"),
    Column::text("Address", "address"),
    Column::text("Type of Facility", "facilityType"),
    Column::text("Classification", "classification"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::date("Date of Inspection", "dateOfInspection"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
    Column::date("Date Issued", "dateIssued"),
    Column::date("Validity", "validity"),
];

const RENEWAL_COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::text("Name of Facility", "facilityName"),
    Column::text("Name of Owner/Operator", "ownerName"),
    Column::text("Address", "address"),
    Column::text("Type of Facility", "facilityType"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::date("Date of Inspection", "dateOfInspection"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
    Column::date("Validity", "validity"),
];

const FIELDS: &[&str] = &[
    "registrationNo",
    "facilityName",
    "ownerName",
    "address",
    "province",
    "facilityType",
    "classification",
    "applicationType",
    "dateOfApplication",
    "dateOfInspection",
    "orNo",
    "orDate",
    "amount",
    "dateIssued",
    "validity",
];

const NEW_APPLICATION: &str = "New";
const RENEWAL: &str = "Renewal";

const RULES: SectionRules = SectionRules {
    header_required: "registration no",
    header_any: &["name of facility", "name of establishment"],
    footnote_prefixes: &["(if renewal)", "(1st semester)", "(2nd semester)", "(for new", "note:"],
    min_columns: 10,
    header_cells: &[(0, "No."), (1, "Registration No.")],
    sub_header_labels: &[],
    identifying_columns: &[1, 2, 3],
};

const ALIASES: AliasTable = &[
    ("occ. mindoro", "Occidental Mindoro"),
    ("occidental", "Occidental Mindoro"),
    ("or. mindoro", "Oriental Mindoro"),
    ("oriental", "Oriental Mindoro"),
    ("calapan", "Oriental Mindoro"),
    ("puerto princesa", "Palawan"),
];

pub struct AnimalWelfareParser;

impl AnimalWelfareParser {
    fn layout(cells: &[String]) -> (&'static [Column], &'static str) {
        if cells.len() >= NEW_COLUMNS.len() {
            (NEW_COLUMNS, NEW_APPLICATION)
        } else {
            (RENEWAL_COLUMNS, RENEWAL)
        }
    }

    fn extract(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let (columns, application_type) = Self::layout(cells);

        let mut row = ParsedRow::with_fields(FIELDS);
        extract_columns(cells, columns, &mut row);
        if !row.has_values() {
            return None;
        }

        let province = first_non_empty([
            resolve_province(row.get("address"), ALIASES),
            default_province.to_string(),
        ]);

        row.insert("province", province);
        row.insert("applicationType", application_type);
        Some(row)
    }
}

impl RowParser for AnimalWelfareParser {
    fn unit(&self) -> &str {
        UNIT
    }

    fn fields(&self) -> Vec<String> {
        FIELDS.iter().map(|f| f.to_string()).collect()
    }

    fn parse(&self, text: &str, default_province: &str) -> Vec<ParsedRow> {
        let rows: Vec<ParsedRow> = data_rows(text, &RULES)
            .iter()
            .filter_map(|cells| self.extract(cells, default_province))
            .collect();
        debug!(unit = UNIT, rows = rows.len(), "parsed paste");
        rows
    }

    fn serialize(&self, rows: &[ParsedRow]) -> String {
        let mut out = header_line(NEW_COLUMNS);
        out.push('\n');
        for (idx, row) in rows.iter().enumerate() {
            let columns = if row.get("applicationType") == RENEWAL {
                RENEWAL_COLUMNS
            } else {
                NEW_COLUMNS
            };
            out.push_str(&serialize_row(columns, idx + 1, row));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_row(values: &[&str]) -> String {
        let mut cells = values.to_vec();
        cells.resize(NEW_COLUMNS.len(), "");
        cells.join("\t")
    }

    fn renewal_row(values: &[&str]) -> String {
        let mut cells = values.to_vec();
        cells.resize(RENEWAL_COLUMNS.len(), "");
        cells.join("\t")
    }

    fn new_sample() -> String {
        new_row(&[
            "1",
            "AW-2024-001",
            "Happy Paws Clinic",
            "Maria Santos",
            "Brgy. Ilaya, Calapan City, Oriental Mindoro",
            "Veterinary Clinic",
            "Class A",
            "02/01/2024",
            "02/10/2024",
            "7654321",
            "02/01/2024",
            "2,000.00",
            "02/15/2024",
            "02/15/2027",
        ])
    }

    fn renewal_sample() -> String {
        renewal_row(&[
            "1",
            "AW-2019-010",
            "Pet Haven",
            "Jose Rizal",
            "Brgy. Bagong Silang, Puerto Princesa City",
            "Pet Shop",
            "03/01/2024",
            "03/05/2024",
            "1112223",
            "03/01/2024",
            "1,000",
            "03/10/2027",
        ])
    }

    #[test]
    fn test_new_application_layout() {
        let text = format!("{}\n{}\n", header_line(NEW_COLUMNS), new_sample());
        let rows = AnimalWelfareParser.parse(&text, "");

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("registrationNo"), "AW-2024-001");
        assert_eq!(row.get("applicationType"), "New");
        assert_eq!(row.get("classification"), "Class A");
        assert_eq!(row.get("province"), "Oriental Mindoro");
        assert_eq!(row.get("amount"), "2000.00");
        assert_eq!(row.get("dateIssued"), "2024-02-15T00:00:00.000Z");
        assert_eq!(row.get("validity"), "2027-02-15T00:00:00.000Z");
    }

    #[test]
    fn test_renewal_layout() {
        let text = format!("{}\n{}\n", header_line(RENEWAL_COLUMNS), renewal_sample());
        let rows = AnimalWelfareParser.parse(&text, "");

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("applicationType"), "Renewal");
        assert_eq!(row.get("classification"), "");
        assert_eq!(row.get("dateIssued"), "");
        assert_eq!(row.get("orNo"), "1112223");
        assert_eq!(row.get("amount"), "1000");
        assert_eq!(row.get("validity"), "2027-03-10T00:00:00.000Z");
        assert_eq!(row.get("province"), "Palawan");
    }

    #[test]
    fn test_new_and_renewal_tables_in_one_paste() {
        let text = [
            "ANIMAL WELFARE FACILITIES".to_string(),
            "NEW APPLICATION".to_string(),
            header_line(NEW_COLUMNS),
            new_sample(),
            "RENEWAL APPLICATION".to_string(),
            header_line(RENEWAL_COLUMNS),
            renewal_sample(),
            "(if renewal) previous registration number is retained".to_string(),
        ]
        .join("\n");

        let rows = AnimalWelfareParser.parse(&text, "");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("applicationType"), "New");
        assert_eq!(rows[1].get("applicationType"), "Renewal");
    }

    #[test]
    fn test_calapan_alias_resolves() {
        let text = format!(
            "{}\n{}\n",
            header_line(RENEWAL_COLUMNS),
            renewal_row(&["1", "AW-1", "Clinic", "Owner", "Calapan City"])
        );
        let rows = AnimalWelfareParser.parse(&text, "Palawan");
        assert_eq!(rows[0].get("province"), "Oriental Mindoro");
    }

    #[test]
    fn test_default_province_when_address_unresolved() {
        let text = format!(
            "{}\n{}\n",
            header_line(RENEWAL_COLUMNS),
            renewal_row(&["1", "AW-2", "Clinic", "Owner", "Poblacion"])
        );
        let rows = AnimalWelfareParser.parse(&text, "Romblon");
        assert_eq!(rows[0].get("province"), "Romblon");
    }

    #[test]
    fn test_padding_rows_dropped() {
        let text = format!(
            "{}\n{}\n{}\n",
            header_line(NEW_COLUMNS),
            new_row(&["2", "", "", "", "Calapan"]),
            new_sample()
        );
        let rows = AnimalWelfareParser.parse(&text, "");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_zero_or_one_line() {
        assert!(AnimalWelfareParser.parse("", "").is_empty());
        assert!(AnimalWelfareParser.parse(&new_sample(), "").is_empty());
    }

    #[test]
    fn test_reparse_of_serialized_rows_is_identical() {
        let text = [
            header_line(NEW_COLUMNS),
            new_sample(),
            renewal_sample(),
            renewal_row(&["3", "AW-3", "Shelter", "Owner", "Odiongan"]),
        ]
        .join("\n");

        let first = AnimalWelfareParser.parse(&text, "Romblon");
        let second = AnimalWelfareParser.parse(&AnimalWelfareParser.serialize(&first), "Romblon");
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }
}
