//! Province resolution for free-text addresses
//!
//! The rightmost address component is the most likely to name the
//! province, so segments are scanned from the end. Each unit parser brings
//! its own alias table; the tables are not merged.

/// Canonical provinces of the region, in reference order
pub const PROVINCES: &[&str] = &[
    "Marinduque",
    "Occidental Mindoro",
    "Oriental Mindoro",
    "Palawan",
    "Romblon",
];

/// Lowercase substring -> canonical province
pub type AliasTable = &'static [(&'static str, &'static str)];

/// Canonical spelling of `text` if it names a province exactly (any case)
pub fn canonical_province(text: &str) -> Option<&'static str> {
    let text = text.trim();
    PROVINCES
        .iter()
        .copied()
        .find(|p| p.eq_ignore_ascii_case(text))
}

/// Best canonical province for an address, or empty when nothing matches
pub fn resolve_province(text: &str, aliases: AliasTable) -> String {
    let segments: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for segment in segments.iter().rev() {
        if let Some(province) = canonical_province(segment) {
            return province.to_string();
        }

        let lower = segment.to_lowercase();
        if let Some((_, province)) = aliases.iter().find(|(needle, _)| lower.contains(needle)) {
            return province.to_string();
        }
    }

    String::new()
}

/// A short row that only names a province ("ORIENTAL MINDORO", "Province of Palawan:")
pub fn is_province_heading(cells: &[String]) -> bool {
    let filled: Vec<&str> = cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    if filled.is_empty() || filled.len() > 2 {
        return false;
    }

    filled.iter().any(|cell| {
        let lower = cell.trim_end_matches(':').trim().to_lowercase();
        let name = lower.strip_prefix("province of").map(str::trim).unwrap_or(&lower);
        canonical_province(name).is_some()
    })
}
