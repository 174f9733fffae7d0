//! Overlay export: a versioned JSON document plus CSV tables.
//!
//! Artifacts carry a `schema_version`; documents from a newer version are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chartscript_core::domain::{IndicatorResult, Marker};
use chartscript_core::fingerprint::InputFingerprint;
use chartscript_core::OverlaySet;
use serde::{Deserialize, Serialize};

use crate::loader::{DataSource, LoadedCandles};

pub const SCHEMA_VERSION: u32 = 1;

/// Everything needed to redraw a chart's overlays elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub schema_version: u32,
    pub symbol: String,
    pub source: DataSource,
    /// Set when the overlays were computed over synthetic candles.
    pub placeholder: bool,
    pub fingerprint: InputFingerprint,
    pub scripts: Vec<String>,
    pub overlays: OverlaySet,
}

impl ExportDocument {
    pub fn new(loaded: &LoadedCandles, scripts: &[String], overlays: OverlaySet) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            symbol: loaded.symbol.clone(),
            source: loaded.source.clone(),
            placeholder: loaded.placeholder,
            fingerprint: InputFingerprint::compute(&loaded.candles, scripts),
            scripts: scripts.to_vec(),
            overlays,
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(doc: &ExportDocument) -> Result<String> {
    serde_json::to_string_pretty(doc).context("failed to serialize overlay document to JSON")
}

/// Parse a document, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ExportDocument> {
    let doc: ExportDocument =
        serde_json::from_str(json).context("failed to deserialize overlay document from JSON")?;
    if doc.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            doc.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(doc)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: time, type, price
pub fn export_markers_csv(markers: &[Marker]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "type", "price"])?;
    for m in markers {
        wtr.write_record([
            m.time.to_string().as_str(),
            m.kind.as_str(),
            format!("{:.6}", m.price).as_str(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Long format, one row per point. Columns: result, line, time, value
pub fn export_series_csv(results: &[IndicatorResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["result", "line", "time", "value"])?;
    for result in results {
        for line in &result.lines {
            for p in &line.points {
                wtr.write_record([
                    result.name.as_str(),
                    line.label.as_str(),
                    p.time.to_string().as_str(),
                    format!("{:.6}", p.value).as_str(),
                ])?;
            }
        }
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact directories ───────────────────────────────────────────

/// Write `<output_dir>/<symbol>_<fingerprint>/` containing:
/// - `manifest.json`: the full document
/// - `markers.csv`
/// - `series.csv`
///
/// Returns the created directory.
pub fn save_artifacts(doc: &ExportDocument, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!("{}_{}", doc.symbol, doc.fingerprint.short()));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(doc)?;
    std::fs::write(run_dir.join("manifest.json"), json)
        .with_context(|| format!("failed to write manifest in {}", run_dir.display()))?;

    let markers = export_markers_csv(&doc.overlays.markers)?;
    std::fs::write(run_dir.join("markers.csv"), markers)
        .with_context(|| format!("failed to write markers in {}", run_dir.display()))?;

    let series = export_series_csv(&doc.overlays.results)?;
    std::fs::write(run_dir.join("series.csv"), series)
        .with_context(|| format!("failed to write series in {}", run_dir.display()))?;

    Ok(run_dir)
}

/// Load a document from an artifact directory's `manifest.json`.
pub fn load_artifacts(dir: &Path) -> Result<ExportDocument> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartscript_core::domain::{LineSeries, MarkerKind, ResultKind, SeriesPoint};

    fn doc() -> ExportDocument {
        ExportDocument {
            schema_version: SCHEMA_VERSION,
            symbol: "BBCA".into(),
            source: DataSource::Synthetic,
            placeholder: true,
            fingerprint: InputFingerprint("ab".repeat(32)),
            scripts: vec!["sma 2".into()],
            overlays: OverlaySet {
                results: vec![IndicatorResult {
                    name: "SMA 2".into(),
                    kind: ResultKind::Line,
                    lines: vec![LineSeries::new("SMA 2", "#2962FF", 2).with_points(vec![
                        SeriesPoint { time: 60, value: 1.5 },
                        SeriesPoint { time: 120, value: 2.5 },
                    ])],
                }],
                markers: vec![Marker {
                    time: 60,
                    kind: MarkerKind::StopSell,
                    price: 10.25,
                }],
            },
        }
    }

    #[test]
    fn markers_csv_layout() {
        let csv = export_markers_csv(&doc().overlays.markers).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["time,type,price", "60,stopSell,10.250000"]);
    }

    #[test]
    fn series_csv_has_one_row_per_point() {
        let csv = export_series_csv(&doc().overlays.results).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "result,line,time,value");
        assert_eq!(lines[2], "SMA 2,SMA 2,120,2.500000");
    }

    #[test]
    fn json_roundtrip_keeps_metadata() {
        let original = doc();
        let back = import_json(&export_json(&original).unwrap()).unwrap();
        assert_eq!(back.symbol, original.symbol);
        assert_eq!(back.source, DataSource::Synthetic);
        assert!(back.placeholder);
        assert_eq!(back.fingerprint, original.fingerprint);
        assert_eq!(back.overlays.markers, original.overlays.markers);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut newer = doc();
        newer.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&newer).unwrap();
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version"));
    }

    #[test]
    fn artifacts_roundtrip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = save_artifacts(&doc(), tmp.path()).unwrap();
        assert!(dir.ends_with("BBCA_abababababab"));
        assert!(dir.join("markers.csv").exists());
        assert!(dir.join("series.csv").exists());
        let loaded = load_artifacts(&dir).unwrap();
        assert_eq!(loaded.scripts, vec!["sma 2".to_string()]);
    }
}
