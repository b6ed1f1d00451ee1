//! Unit schema registry
//!
//! Maps a unit identifier to its ordered field list. Built-in entries cover
//! the hand-parsed units (taken from their parsers) and the generic-only
//! units below. A JSON file can add units or replace field lists:
//!
//! ```json
//! { "units": { "seed-growers": ["applicant", "province", "dateFiled"] } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::parsers::{custom_parser, parser_for, CUSTOM_UNITS};
use crate::rows::ParsedRow;

/// Units handled only by the generic mapper
const GENERIC_UNITS: &[(&str, &[&str])] = &[
    (
        "organic-agriculture",
        &[
            "applicant",
            "farmName",
            "barangay",
            "municipality",
            "province",
            "commodity",
            "area",
            "dateFiled",
            "dateOfInspection",
            "certifyingBody",
            "amount",
            "ratingQuality",
            "ratingTimeliness",
            "attachmentName",
            "attachmentData",
        ],
    ),
    (
        "veterinary-drug-outlets",
        &[
            "applicant",
            "outletName",
            "address",
            "province",
            "licenseNo",
            "dateFiled",
            "dateIssued",
            "validity",
            "registrationFee",
            "ratingOverall",
            "attachmentName",
            "attachmentData",
        ],
    ),
    (
        "seed-growers",
        &[
            "applicant",
            "province",
            "municipality",
            "variety",
            "seedClass",
            "area",
            "dateFiled",
            "amount",
            "customerRating",
        ],
    ),
];

pub const NO_DATA_WARNING: &str =
    "No data parsed. Check that the header row was included in the paste.";

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    units: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: IndexMap<String, Vec<String>>,
}

impl UnitRegistry {
    pub fn builtin() -> Self {
        let mut units = IndexMap::new();
        for unit in CUSTOM_UNITS {
            if let Some(parser) = custom_parser(unit) {
                units.insert(unit.to_string(), parser.fields());
            }
        }
        for (unit, fields) in GENERIC_UNITS {
            units.insert(
                unit.to_string(),
                fields.iter().map(|f| f.to_string()).collect(),
            );
        }
        Self { units }
    }

    /// Built-ins with the units of a schema file merged over them
    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let file: SchemaFile = serde_json::from_str(content)?;
        let mut registry = Self::builtin();

        let mut overrides: Vec<(String, Vec<String>)> = file.units.into_iter().collect();
        overrides.sort_by(|a, b| a.0.cmp(&b.0));

        for (unit, fields) in overrides {
            if CUSTOM_UNITS.contains(&unit.as_str()) {
                warn!(unit = %unit, "schema file entry ignored; unit has a custom parser");
                continue;
            }
            registry.units.insert(unit, fields);
        }
        Ok(registry)
    }

    pub async fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| RegistryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let registry = Self::from_json(&content)?;
        info!(path = %path.display(), units = registry.units.len(), "loaded unit schema file");
        Ok(registry)
    }

    pub fn fields(&self, unit: &str) -> Option<&[String]> {
        self.units.get(unit).map(Vec::as_slice)
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.units.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_custom(unit: &str) -> bool {
        CUSTOM_UNITS.contains(&unit)
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parsed rows for preview, with a warning when nothing was recognized
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub unit: String,
    pub rows: Vec<ParsedRow>,
    pub warning: Option<String>,
}

/// Select the unit's parser and run it over a paste
pub fn parse_paste(
    registry: &UnitRegistry,
    unit: &str,
    text: &str,
    default_province: &str,
) -> Result<ParseOutcome, RegistryError> {
    let parser =
        parser_for(unit, registry).ok_or_else(|| RegistryError::UnknownUnit(unit.to_string()))?;

    let rows = parser.parse(text, default_province);
    let warning = if rows.is_empty() {
        warn!(unit, "paste produced no rows");
        Some(NO_DATA_WARNING.to_string())
    } else {
        None
    };

    Ok(ParseOutcome {
        unit: unit.to_string(),
        rows,
        warning,
    })
}
