//! Plant nursery accreditation
//!
//! 18-column layout keyed by accreditation number rather than registration
//! number. Operator name and location are split like the feeds sheet and
//! recombined into `operatorName` and `completeAddress`.

use tracing::debug;

use super::{extract_columns, first_non_empty, serialize_rows, Column, RowParser};
use crate::paste::join_non_empty;
use crate::province::{resolve_province, AliasTable};
use crate::rows::ParsedRow;
use crate::section::{data_rows, SectionRules};

pub const UNIT: &str = "plant-nursery";

const COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Accreditation No.", "accreditationNo"),
    Column::text("Name of Nursery", "nurseryName"),
    Column::text("Last Name", "lastName"),
    Column::text("First Name", "firstName"),
    Column::text("Middle Name", "middleName"),
    Column::text("Barangay", "barangay"),
    Column::text("Municipality", "municipality"),
    Column::text("Province", "province"),
    Column::text("Area (sq. m.)", "area"),
    Column::text("Crops", "crops"),
    Column::date("Date of Application", "dateOfApplication"),
    Column::date("Date of Inspection", "dateOfInspection"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount", "amount"),
    Column::date("Date Accredited", "dateAccredited"),
    Column::date("Validity", "validity"),
];

const FIELDS: &[&str] = &[
    "accreditationNo",
    "nurseryName",
    "lastName",
    "firstName",
    "middleName",
    "operatorName",
    "barangay",
    "municipality",
    "province",
    "completeAddress",
    "area",
    "crops",
    "dateOfApplication",
    "dateOfInspection",
    "orNo",
    "orDate",
    "amount",
    "dateAccredited",
    "validity",
];

const RULES: SectionRules = SectionRules {
    header_required: "accreditation no",
    header_any: &["name of nursery", "name of operator"],
    footnote_prefixes: &["(if renewal)", "(1st semester)", "(2nd semester)", "(fruit", "(ornamental"],
    min_columns: 9,
    header_cells: &[(0, "No."), (1, "Accreditation No.")],
    sub_header_labels: &["Last Name", "First Name", "Middle Name", "Barangay", "Municipality", "Province"],
    identifying_columns: &[1, 2, 3],
};

const ALIASES: AliasTable = &[
    ("occ. mindoro", "Occidental Mindoro"),
    ("occidental", "Occidental Mindoro"),
    ("or. mindoro", "Oriental Mindoro"),
    ("oriental", "Oriental Mindoro"),
    ("puerto princesa", "Palawan"),
    ("odiongan", "Romblon"),
    ("boac", "Marinduque"),
];

pub struct PlantNurseryParser;

impl PlantNurseryParser {
    fn extract(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let mut row = ParsedRow::with_fields(FIELDS);
        extract_columns(cells, COLUMNS, &mut row);
        if !row.has_values() {
            return None;
        }

        let operator_name = join_non_empty(
            &[row.get("lastName"), row.get("firstName"), row.get("middleName")],
            ", ",
        );

        let raw_province = row.get("province").to_string();
        let locality = join_non_empty(&[row.get("barangay"), row.get("municipality")], ", ");
        let province = first_non_empty([
            resolve_province(&raw_province, ALIASES),
            resolve_province(&locality, ALIASES),
            raw_province,
            default_province.to_string(),
        ]);

        let complete_address = join_non_empty(
            &[row.get("barangay"), row.get("municipality"), &province],
            ", ",
        );

        row.insert("operatorName", operator_name);
        row.insert("province", province);
        row.insert("completeAddress", complete_address);
        Some(row)
    }
}

impl RowParser for PlantNurseryParser {
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
