//! CSV and JSON export of canonical results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use undertow_core::{CanonicalResult, ExportRecord};

/// Writes a header row then one row per result. An absent magnet is an
/// empty field.
pub(crate) fn write_csv<W: Write>(writer: W, results: &[CanonicalResult]) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(ExportRecord::FIELDS)?;
    for result in results {
        writer.serialize(result.export_record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a pretty-printed JSON array; an absent magnet is `null`.
pub(crate) fn write_json<W: Write>(writer: W, results: &[CanonicalResult]) -> anyhow::Result<()> {
    let records: Vec<ExportRecord<'_>> = results.iter().map(CanonicalResult::export_record).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

/// Exports to `path` as CSV.
pub(crate) fn export_csv(path: &Path, results: &[CanonicalResult]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(BufWriter::new(file), results)
        .with_context(|| format!("writing CSV export to {}", path.display()))
}

/// Exports to `path` as JSON.
pub(crate) fn export_json(path: &Path, results: &[CanonicalResult]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, results)
        .and_then(|()| writer.flush().map_err(anyhow::Error::from))
        .with_context(|| format!("writing JSON export to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use undertow_core::{RawResult, normalize};

    use super::*;

    fn results() -> Vec<CanonicalResult> {
        vec![
            normalize(
                RawResult::new("Nyaa", "Show, Episode 1")
                    .with_size("350 MB")
                    .with_peers("10", "2")
                    .with_date("2024-02-03")
                    .with_magnet(Some("magnet:?xt=urn:btih:aaa".to_string())),
            ),
            normalize(RawResult::new("YTS", "Movie (1999)").with_date("1999")),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &results()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "site,name,size,seeds,leeches,date,magnet");
        assert_eq!(
            lines[1],
            "Nyaa,\"Show, Episode 1\",350 MB,10,2,2024-02-03,magnet:?xt=urn:btih:aaa"
        );
        assert_eq!(lines[2], "YTS,Movie (1999),-,-,-,1999,");
    }

    #[test]
    fn test_json_layout() {
        let mut out = Vec::new();
        write_json(&mut out, &results()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["magnet"], "magnet:?xt=urn:btih:aaa");
        assert!(value[1]["magnet"].is_null());

        let text = String::from_utf8(out).unwrap();
        let site = text.find("\"site\"").unwrap();
        let magnet = text.find("\"magnet\"").unwrap();
        assert!(site < magnet);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(export_csv(&path, &results()).is_err());
    }

    #[test]
    fn test_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("out.csv");
        let json_path = dir.path().join("out.json");

        export_csv(&csv_path, &results()).unwrap();
        export_json(&json_path, &results()).unwrap();

        assert!(std::fs::read_to_string(csv_path).unwrap().starts_with("site,"));
        assert!(std::fs::read_to_string(json_path).unwrap().starts_with('['));
    }
}
