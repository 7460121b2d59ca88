use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    common::ensure_parent_dir,
    record::{ProviderRecord, Snapshot},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

impl Snapshot {
    pub fn new(neurologists: Vec<ProviderRecord>, taken_at: DateTime<Utc>) -> Self {
        Self {
            last_updated: taken_at.format(TIMESTAMP_FORMAT).to_string(),
            total_count: neurologists.len(),
            neurologists,
        }
    }
}

/// Writes `records` as a fresh snapshot at `output_path`, replacing any
/// previous file. The JSON goes to a sibling temp file first and is renamed
/// into place.
pub fn save_snapshot(records: Vec<ProviderRecord>, output_path: &Path) -> Result<Snapshot> {
    let snapshot = Snapshot::new(records, Utc::now());
    write_snapshot(&snapshot, output_path)?;
    tracing::info!("Data saved to {}", output_path.display());
    Ok(snapshot)
}

pub fn write_snapshot(snapshot: &Snapshot, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;

    let file_name = output_path
        .file_name()
        .and_then(|x| x.to_str())
        .unwrap_or("neurologists.json");
    let tmp_path = output_path.with_file_name(format!("{file_name}.tmp"));

    let file = File::create(&tmp_path)
        .with_context(|| format!("Failed creating temp snapshot {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)
        .with_context(|| format!("Failed serializing snapshot to {}", tmp_path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed flushing snapshot {}", tmp_path.display()))?;
    drop(writer);

    fs::rename(&tmp_path, output_path).with_context(|| {
        format!(
            "Failed moving temp snapshot {} to {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Coordinates, Npi, Position};
    use chrono::TimeZone;

    fn record(npi: u64) -> ProviderRecord {
        ProviderRecord {
            npi: Npi(npi),
            name: "Jane Doe, MD".to_string(),
            credentials: "MD".to_string(),
            specialty: "Vascular Neurology".to_string(),
            is_vascular_neurology: true,
            organization: String::new(),
            address: "325 9th Ave".to_string(),
            city: "SEATTLE".to_string(),
            state: "WA".to_string(),
            zip: "98104".to_string(),
            phone: String::new(),
            position: Position::from(Some(Coordinates {
                latitude: 47.6045,
                longitude: -122.324,
            })),
            source: "NPPES".to_string(),
        }
    }

    #[test]
    fn timestamp_uses_utc_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let snapshot = Snapshot::new(vec![record(1)], at);
        assert_eq!(snapshot.last_updated, "2026-03-04 05:06:07 UTC");
        assert_eq!(snapshot.total_count, 1);
    }

    #[test]
    fn creates_parent_dirs_and_round_trips_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("neurologists.json");

        save_snapshot(vec![record(1), record(2)], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let parsed: Snapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.total_count, parsed.neurologists.len());
        assert_eq!(parsed.total_count, 2);
        assert!(text.starts_with("{\n  \"last_updated\""));
        assert!(!path.with_file_name("neurologists.json.tmp").exists());
    }

    #[test]
    fn overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neurologists.json");
        fs::write(&path, "stale").unwrap();

        save_snapshot(Vec::new(), &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["total_count"], 0);
        assert_eq!(parsed["neurologists"], serde_json::json!([]));
    }
}
