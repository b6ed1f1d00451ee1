//! Livestock handler registrations (traders, shippers, transport handlers)
//!
//! The base sheet has 11 columns. Offices that also track certification add
//! three trailing columns (certificate no., date issued, date transmitted),
//! giving the 14-column layout.

use tracing::debug;

use super::{extract_columns, first_non_empty, header_line, serialize_row, Column, RowParser};
use crate::province::{resolve_province, AliasTable};
use crate::rows::ParsedRow;
use crate::section::{data_rows, SectionRules};

pub const UNIT: &str = "livestock-handlers";

const BASE_COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::text("Name of Applicant", "applicantName"),
    Column::text("Business Name", "businessName"),
    Column::text("Address", "address"),
    Column::text("Type of Handler", "handlerType"),
    Column::text("Species", "species"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
];

const EXTENDED_COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::text("Name of Applicant", "applicantName"),
    Column::text("Business Name", "businessName"),
    Column::text("Address", "address"),
    Column::text("Type of Handler", "handlerType"),
    Column::text("Species", "species"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
    Column::text("Certificate No.", "certificateNo"),
    Column::date("Date Issued", "dateIssued"),
    Column::date("Date Transmitted", "dateTransmitted"),
];

const CERTIFICATION_FIELDS: &[&str] = &["certificateNo", "dateIssued", "dateTransmitted"];

const FIELDS: &[&str] = &[
    "registrationNo",
    "applicantName",
    "businessName",
    "address",
    "province",
    "handlerType",
    "species",
    "dateOfApplication",
    "orNo",
    "orDate",
    "amount",
    "certificateNo",
    "dateIssued",
    "dateTransmitted",
];

const RULES: SectionRules = SectionRules {
    header_required: "registration no",
    header_any: &["name of applicant", "name of handler"],
    footnote_prefixes: &["(trader", "(shipper", "(1st semester)", "(2nd semester)", "legend"],
    min_columns: 8,
    header_cells: &[(0, "No."), (1, "Registration No."), (2, "Name of Applicant")],
    sub_header_labels: &[],
    identifying_columns: &[1, 2],
};

const ALIASES: AliasTable = &[
    ("mindoro occ", "Occidental Mindoro"),
    ("occ. mindoro", "Occidental Mindoro"),
    ("occidental", "Occidental Mindoro"),
    ("mindoro or", "Oriental Mindoro"),
    ("or. mindoro", "Oriental Mindoro"),
    ("oriental", "Oriental Mindoro"),
    ("pto. princesa", "Palawan"),
    ("puerto princesa", "Palawan"),
];

pub struct LivestockHandlersParser;

impl LivestockHandlersParser {
    fn extract(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let columns = if cells.len() >= EXTENDED_COLUMNS.len() {
            EXTENDED_COLUMNS
        } else {
            BASE_COLUMNS
        };

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
        Some(row)
    }
}

impl RowParser for LivestockHandlersParser {
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
        let mut out = header_line(EXTENDED_COLUMNS);
        out.push('\n');
        for (idx, row) in rows.iter().enumerate() {
            let certified = CERTIFICATION_FIELDS.iter().any(|f| !row.get(f).is_empty());
            let columns = if certified { EXTENDED_COLUMNS } else { BASE_COLUMNS };
            out.push_str(&serialize_row(columns, idx + 1, row));
            out.push('\n');
        }
        out
    }
}
