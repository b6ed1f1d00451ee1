//! Section detection for pasted report blocks
//!
//! A paste usually holds more than a table: report titles, a period line,
//! province sub-headings, one or more header rows and a legend at the
//! bottom. Lines are classified one by one and fed through a two-state
//! machine; only `Data` lines seen while `InSection` are kept.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::paste::{filled_count, read_lines};
use crate::province::is_province_heading;

static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:19|20)\d{2}\s*[-–—]\s*(?:19|20)\d{2}\b").expect("year range pattern is valid")
});

const BOUNDARY_PHRASES: &[&str] = &["new application", "renewal application"];

/// Title-like lines carry at most this many filled cells
const MAX_TITLE_CELLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// Waiting for a header row
    Seeking,
    /// Header seen; data rows are accepted
    InSection,
}

/// What a single line turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    HeaderMarker,
    Boundary,
    Skipped,
    OutsideSection,
    RepeatedHeader,
    Padding,
    Data,
}

impl SectionState {
    pub fn next(self, kind: LineKind) -> Self {
        match kind {
            LineKind::HeaderMarker => SectionState::InSection,
            LineKind::Boundary => SectionState::Seeking,
            _ => self,
        }
    }
}

/// Per-unit detection heuristics
#[derive(Debug)]
pub struct SectionRules {
    /// Phrase every header row contains (lowercase)
    pub header_required: &'static str,
    /// At least one of these must also appear (lowercase)
    pub header_any: &'static [&'static str],
    /// Legend lines start with one of these (lowercase)
    pub footnote_prefixes: &'static [&'static str],
    pub min_columns: usize,
    /// (column, header text) pairs that mark a repeated header row
    pub header_cells: &'static [(usize, &'static str)],
    /// Second-row header labels (split name/address columns); a row with
    /// two or more of these cells is a header, wherever they sit
    pub sub_header_labels: &'static [&'static str],
    /// A row with all of these empty is padding
    pub identifying_columns: &'static [usize],
}

impl SectionRules {
    pub fn is_header_marker(&self, joined_lower: &str) -> bool {
        joined_lower.contains(self.header_required)
            && self.header_any.iter().any(|p| joined_lower.contains(p))
    }

    pub fn is_footnote(&self, cells: &[String]) -> bool {
        cells
            .iter()
            .find(|c| !c.is_empty())
            .map(|first| {
                let lower = first.to_lowercase();
                self.footnote_prefixes.iter().any(|p| lower.starts_with(p))
            })
            .unwrap_or(false)
    }

    pub fn is_repeated_header(&self, cells: &[String]) -> bool {
        let top = self.header_cells.iter().any(|(idx, text)| {
            cells
                .get(*idx)
                .is_some_and(|c| c.eq_ignore_ascii_case(text))
        });
        top || self.sub_header_count(cells) >= 2
    }

    fn sub_header_count(&self, cells: &[String]) -> usize {
        cells
            .iter()
            .filter(|c| {
                self.sub_header_labels
                    .iter()
                    .any(|label| c.eq_ignore_ascii_case(label))
            })
            .count()
    }

    pub fn is_padding(&self, cells: &[String]) -> bool {
        self.identifying_columns
            .iter()
            .all(|idx| cells.get(*idx).map_or(true, |c| c.is_empty()))
    }

    /// A title line that opens a new sub-table (period range, application
    /// kind). Sparse rows that still carry an identifying value are data.
    pub fn is_boundary(&self, cells: &[String], joined_lower: &str) -> bool {
        filled_count(cells) <= MAX_TITLE_CELLS
            && (cells.len() < self.min_columns || self.is_padding(cells))
            && (YEAR_RANGE.is_match(joined_lower)
                || BOUNDARY_PHRASES.iter().any(|p| joined_lower.contains(p)))
    }
}

pub fn classify(cells: &[String], state: SectionState, rules: &SectionRules) -> LineKind {
    let joined = cells.join(" ").to_lowercase();

    if rules.is_header_marker(&joined) {
        return LineKind::HeaderMarker;
    }
    if rules.is_boundary(cells, &joined) {
        return LineKind::Boundary;
    }
    if is_province_heading(cells) || rules.is_footnote(cells) || cells.len() < rules.min_columns {
        return LineKind::Skipped;
    }
    if state == SectionState::Seeking {
        return LineKind::OutsideSection;
    }
    if rules.is_repeated_header(cells) {
        return LineKind::RepeatedHeader;
    }
    if rules.is_padding(cells) {
        return LineKind::Padding;
    }
    LineKind::Data
}

/// Data rows of a paste, as trimmed cells. Empty for fewer than two lines.
pub fn data_rows(text: &str, rules: &SectionRules) -> Vec<Vec<String>> {
    let lines = read_lines(text);
    if lines.len() < 2 {
        return Vec::new();
    }

    let total = lines.len();
    let mut state = SectionState::Seeking;
    let mut rows = Vec::new();

    for cells in lines {
        let kind = classify(&cells, state, rules);
        state = state.next(kind);
        if kind == LineKind::Data {
            rows.push(cells);
        }
    }

    debug!(lines = total, rows = rows.len(), "section detection finished");
    rows
}
