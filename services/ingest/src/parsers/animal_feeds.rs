//! Animal feed establishment registrations
//!
//! Single 26-column layout. The owner is split over last/first/middle name
//! columns and the location over barangay/municipality/province columns;
//! both are recombined into `completeName` and `completeAddress`.

use tracing::debug;

use super::{extract_columns, first_non_empty, serialize_rows, Column, RowParser};
use crate::paste::join_non_empty;
use crate::province::{resolve_province, AliasTable};
use crate::rows::ParsedRow;
use crate::section::{data_rows, SectionRules};

pub const UNIT: &str = "animal-feeds";

const COLUMNS: &[Column] = &[
    Column::index("No."),
    Column::text("Registration No.", "registrationNo"),
    Column::date("Date", "date"),
    Column::text("Name of Establishment", "establishmentName"),
    Column::text("Last Name", "lastName"),
    Column::text("First Name", "firstName"),
    Column::text("Middle Name", "middleName"),
    Column::text("Barangay", "barangay"),
    Column::text("Municipality", "municipality"),
    Column::text("Province", "province"),
    Column::text("Contact No.", "contactNo"),
    Column::text("Email Address", "email"),
    Column::text("Type of Establishment", "establishmentType"),
    Column::text("Activity", "activity"),
    Column::text("Products", "products"),
    Column::text("Type of Application", "applicationType"),
    Column::text("OR No.", "orNo"),
    Column::date("OR Date", "orDate"),
    Column::amount("Amount Paid", "amount"),
    Column::date("Date of Inspection", "dateOfInspection"),
    Column::text("Inspected By", "inspectedBy"),
    Column::date("Date Evaluated", "dateEvaluated"),
    Column::date("Date Endorsed", "dateEndorsed"),
    Column::date("Date Approved", "dateApproved"),
    Column::text("Certificate No.", "certificateNo"),
    Column::date("Validity", "validity"),
];

const FIELDS: &[&str] = &[
    "registrationNo",
    "date",
    "establishmentName",
    "lastName",
    "firstName",
    "middleName",
    "completeName",
    "barangay",
    "municipality",
    "province",
    "completeAddress",
    "contactNo",
    "email",
    "establishmentType",
    "activity",
    "products",
    "applicationType",
    "orNo",
    "orDate",
    "amount",
    "dateOfInspection",
    "inspectedBy",
    "dateEvaluated",
    "dateEndorsed",
    "dateApproved",
    "certificateNo",
    "validity",
];

const RULES: SectionRules = SectionRules {
    header_required: "registration no",
    header_any: &["name of establishment"],
    footnote_prefixes: &[
        "(retailer",
        "(manufacturer",
        "(distributor",
        "(if renewal)",
        "(1st semester)",
        "(2nd semester)",
        "note:",
    ],
    min_columns: 8,
    header_cells: &[(0, "No."), (1, "Registration No."), (3, "Name of Establishment")],
    sub_header_labels: &["Last Name", "First Name", "Middle Name", "Barangay", "Municipality", "Province"],
    identifying_columns: &[1, 3, 4],
};

const ALIASES: AliasTable = &[
    ("occ. mindoro", "Occidental Mindoro"),
    ("occidental", "Occidental Mindoro"),
    ("or. mindoro", "Oriental Mindoro"),
    ("oriental", "Oriental Mindoro"),
    ("puerto princesa", "Palawan"),
];

pub struct AnimalFeedsParser;

impl AnimalFeedsParser {
    fn extract(&self, cells: &[String], default_province: &str) -> Option<ParsedRow> {
        let mut row = ParsedRow::with_fields(FIELDS);
        extract_columns(cells, COLUMNS, &mut row);
        if !row.has_values() {
            return None;
        }

        let complete_name = join_non_empty(
            &[row.get("lastName"), row.get("firstName"), row.get("middleName")],
            ", ",
        );

        // Province column first, then the locality columns, then whatever
        // was typed, then the caller's hint
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

        row.insert("completeName", complete_name);
        row.insert("province", province);
        row.insert("completeAddress", complete_address);
        Some(row)
    }
}

impl RowParser for AnimalFeedsParser {
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
