//! Result normalization: canonical records, size parsing and display rows.
//!
//! Display truncation only ever produces new [`DisplayRow`] values. Canonical
//! fields used by filtering, export and magnet lookup are never shortened.

use serde::Serialize;

use crate::provider::RawResult;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Suffixes in match order; `GB` must be tried before `B`.
const SIZE_UNITS: [(&str, f64); 4] = [("GB", GIB), ("MB", MIB), ("KB", KIB), ("B", 1.0)];

/// Marker appended to truncated display cells.
pub const ELLIPSIS: &str = "...";

/// Column widths of the display projection.
pub mod widths {
    pub const SITE: usize = 14;
    pub const NAME: usize = 40;
    pub const SIZE: usize = 12;
    pub const SEEDS: usize = 8;
    pub const LEECHES: usize = 8;
    pub const DATE: usize = 16;
}

/// A raw row plus its parsed byte size.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalResult {
    pub raw: RawResult,
    /// Parsed from `raw.size_text`; 0 when unparsable. Used only for filtering.
    pub size_bytes: f64,
}

impl CanonicalResult {
    /// Flat export record with the fixed field order
    /// `site, name, size, seeds, leeches, date, magnet`.
    pub fn export_record(&self) -> ExportRecord<'_> {
        ExportRecord {
            site: &self.raw.site_name,
            name: &self.raw.name,
            size: &self.raw.size_text,
            seeds: &self.raw.seeds_text,
            leeches: &self.raw.leeches_text,
            date: &self.raw.date_text,
            magnet: self.raw.magnet.as_deref(),
        }
    }
}

/// Row handed to CSV/JSON exporters. Field order is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord<'a> {
    pub site: &'a str,
    pub name: &'a str,
    pub size: &'a str,
    pub seeds: &'a str,
    pub leeches: &'a str,
    pub date: &'a str,
    pub magnet: Option<&'a str>,
}

impl ExportRecord<'_> {
    /// Header line matching the serialized field order.
    pub const FIELDS: [&'static str; 7] =
        ["site", "name", "size", "seeds", "leeches", "date", "magnet"];
}

/// Truncated, presentation-only projection of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// One-based position in the result list
    pub index: usize,
    pub site: String,
    pub name: String,
    pub size: String,
    pub seeds: String,
    pub leeches: String,
    pub date: String,
}

/// Adds the parsed byte size to a raw row.
pub fn normalize(raw: RawResult) -> CanonicalResult {
    let size_bytes = parse_size(&raw.size_text);
    CanonicalResult { raw, size_bytes }
}

/// Normalizes a whole batch, keeping order.
pub fn normalize_all(raw: Vec<RawResult>) -> Vec<CanonicalResult> {
    raw.into_iter().map(normalize).collect()
}

/// Projects `result` for table rendering at one-based `index`.
pub fn project(index: usize, result: &CanonicalResult) -> DisplayRow {
    let raw = &result.raw;
    DisplayRow {
        index,
        site: truncate(&raw.site_name, widths::SITE),
        name: truncate(&raw.name, widths::NAME),
        size: truncate(&raw.size_text, widths::SIZE),
        seeds: truncate(&raw.seeds_text, widths::SEEDS),
        leeches: truncate(&raw.leeches_text, widths::LEECHES),
        date: truncate(&raw.date_text, widths::DATE),
    }
}

/// Projects a list, numbering rows from 1.
pub fn project_all(results: &[CanonicalResult]) -> Vec<DisplayRow> {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| project(i + 1, result))
        .collect()
}

/// Parses size text such as `"1.2 GB"` or `"500mb"` into bytes.
///
/// Suffixes are matched case-insensitively in the order GB, MB, KB, B;
/// bare numbers are bytes. Anything unparsable, including the `"-"`
/// sentinel and the empty string, yields 0.
pub fn parse_size(text: &str) -> f64 {
    let normalized = text.trim().to_ascii_uppercase();

    let (number, multiplier) = SIZE_UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            normalized
                .strip_suffix(suffix)
                .map(|number| (number.trim(), *multiplier))
        })
        .unwrap_or((normalized.as_str(), 1.0));

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value * multiplier,
        _ => 0.0,
    }
}

/// Shortens `text` to at most `max_len` characters, ending in [`ELLIPSIS`]
/// when anything was cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
