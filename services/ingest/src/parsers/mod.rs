//! Unit parsers
//!
//! One strategy per regulatory unit, each with its own column layout,
//! section rules and province alias table. Units without a custom parser
//! fall back to [`generic::GenericParser`], driven by the schema registry.

pub mod animal_feeds;
pub mod animal_welfare;
pub mod generic;
pub mod livestock_handlers;
pub mod plant_nursery;
pub mod transport_carriers;

use crate::date::{normalize_date, strip_thousands};
use crate::paste::cell;
use crate::registry::UnitRegistry;
use crate::rows::ParsedRow;

pub use animal_feeds::AnimalFeedsParser;
pub use animal_welfare::AnimalWelfareParser;
pub use generic::GenericParser;
pub use livestock_handlers::LivestockHandlersParser;
pub use plant_nursery::PlantNurseryParser;
pub use transport_carriers::TransportCarriersParser;

/// Capability shared by every unit parser
pub trait RowParser: Send + Sync {
    /// Unit identifier this parser handles
    fn unit(&self) -> &str;

    /// Output field names, in row order
    fn fields(&self) -> Vec<String>;

    /// Parse a pasted block. Never fails; unusable input gives no rows.
    fn parse(&self, text: &str, default_province: &str) -> Vec<ParsedRow>;

    /// Canonical tab-separated form of `rows`, readable by [`RowParser::parse`]
    fn serialize(&self, rows: &[ParsedRow]) -> String;
}

/// Units with a hand-written parser
pub const CUSTOM_UNITS: &[&str] = &[
    animal_feeds::UNIT,
    animal_welfare::UNIT,
    livestock_handlers::UNIT,
    transport_carriers::UNIT,
    plant_nursery::UNIT,
];

/// Hand-written parser for `unit`, if there is one
pub fn custom_parser(unit: &str) -> Option<Box<dyn RowParser>> {
    match unit {
        animal_feeds::UNIT => Some(Box::new(AnimalFeedsParser)),
        animal_welfare::UNIT => Some(Box::new(AnimalWelfareParser)),
        livestock_handlers::UNIT => Some(Box::new(LivestockHandlersParser)),
        transport_carriers::UNIT => Some(Box::new(TransportCarriersParser)),
        plant_nursery::UNIT => Some(Box::new(PlantNurseryParser)),
        _ => None,
    }
}

/// Parser for `unit`: the custom one, else the generic mapper over the
/// registry's field list, else `None` for an unknown unit
pub fn parser_for(unit: &str, registry: &UnitRegistry) -> Option<Box<dyn RowParser>> {
    custom_parser(unit).or_else(|| {
        registry
            .fields(unit)
            .map(|fields| Box::new(GenericParser::new(unit, fields)) as Box<dyn RowParser>)
    })
}

// =============================================================================
// Column layouts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    /// Running number; not imported
    Index,
    Text,
    Date,
    Amount,
}

/// One positional column of a layout
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn index(header: &'static str) -> Self {
        Self { header, field: "", kind: ColumnKind::Index }
    }

    pub const fn text(header: &'static str, field: &'static str) -> Self {
        Self { header, field, kind: ColumnKind::Text }
    }

    pub const fn date(header: &'static str, field: &'static str) -> Self {
        Self { header, field, kind: ColumnKind::Date }
    }

    pub const fn amount(header: &'static str, field: &'static str) -> Self {
        Self { header, field, kind: ColumnKind::Amount }
    }

    fn read(&self, raw: &str) -> String {
        match self.kind {
            ColumnKind::Index => String::new(),
            ColumnKind::Text => raw.trim().to_string(),
            ColumnKind::Date => normalize_date(raw),
            ColumnKind::Amount => strip_thousands(raw),
        }
    }
}

/// Copy positional cells into `row`, normalizing by column kind
pub(crate) fn extract_columns(cells: &[String], columns: &[Column], row: &mut ParsedRow) {
    for (idx, column) in columns.iter().enumerate() {
        if column.kind == ColumnKind::Index {
            continue;
        }
        row.insert(column.field, column.read(cell(cells, idx)));
    }
}

pub(crate) fn header_line(columns: &[Column]) -> String {
    columns.iter().map(|c| c.header).collect::<Vec<_>>().join("\t")
}

/// One row in layout order; the index column gets `number`
pub(crate) fn serialize_row(columns: &[Column], number: usize, row: &ParsedRow) -> String {
    columns
        .iter()
        .map(|c| match c.kind {
            ColumnKind::Index => number.to_string(),
            _ => row.get(c.field).to_string(),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

/// Header line followed by every row in a single layout
pub(crate) fn serialize_rows(columns: &[Column], rows: &[ParsedRow]) -> String {
    let mut out = header_line(columns);
    out.push('\n');
    for (idx, row) in rows.iter().enumerate() {
        out.push_str(&serialize_row(columns, idx + 1, row));
        out.push('\n');
    }
    out
}

/// First non-empty candidate, or empty
pub(crate) fn first_non_empty<I, S>(candidates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|c| c.as_ref().trim().to_string())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}
