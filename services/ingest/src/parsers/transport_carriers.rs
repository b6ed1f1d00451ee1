//! Livestock transport carrier registrations (one row per vehicle)

use tracing::debug;

use super::{extract_columns, first_non_empty, serialize_rows, Column, RowParser};
use crate::province::{resolve_province, AliasTable};
use crate::rows::ParsedRow;
use crate::section::{data_rows, SectionRules};

pub const UNIT: &str = "transport-carriers";

const COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::text("Name of Operator", "operatorName"),
    Column::text("Address", "address"),
    Column::text("Plate No.", "plateNo"),
    Column::text("Type of Vehicle", "vehicleType"),
    Column::text("Capacity", "capacity"),
    Column::text("Route", "route"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::date("Date of Inspection", "dateOfInspection"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
    Column::date("Date Issued", "dateIssued"),
    Column::date("Validity", "validity"),
];

const FIELDS: &[&str] = &[
    "registrationNo",
    "operatorName",
    "address",
    "province",
    "plateNo",
    "vehicleType",
    "capacity",
    "route",
    "dateOfApplication",
    "dateOfInspection",
    "orNo",
    "orDate",
    "amount",
    "dateIssued",
    "validity",
];

const RULES: SectionRules = SectionRules {
    header_required: "registration no",
    header_any: &["name of operator", "plate no"],
    footnote_prefixes: &["(if renewal)", "(1st semester)", "(2nd semester)", "(for hire", "note:"],
    min_columns: 8,
    header_cells: &[(0, "No."), (1, "Registration No."), (4, "Plate No.")],
    sub_header_labels: &[],
    identifying_columns: &[1, 2, 4],
};

const ALIASES: AliasTable = &[
    ("occidental", "Occidental Mindoro"),
    ("san jose", "Occidental Mindoro"),
    ("oriental", "Oriental Mindoro"),
    ("calapan", "Oriental Mindoro"),
    ("pto. princesa", "Palawan"),
    ("puerto princesa", "Palawan"),
];

pub struct TransportCarriersParser;

impl TransportCarriersParser {
    fn extract(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let mut row = ParsedRow::with_fields(FIELDS);
        extract_columns(cells, COLUMNS, &mut row);
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

impl RowParser for TransportCarriersParser {
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
        serialize_rows(COLUMNS, rows)
    }
}
