//! File export for the latest pipeline results: `summary.json` for the
//! summary and one CSV per extracted table.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::{ClaimlensError, Result};
use crate::domain::{PageExtract, SummaryResult, Table};

/// Write whatever the session currently holds into `dir`, returning the
/// paths written. Nothing to write is an error the caller can surface.
pub fn export_session(
    dir: &Path,
    extract: Option<&PageExtract>,
    summary: Option<&SummaryResult>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if let Some(summary) = summary {
        let path = dir.join("summary.json");
        fs::write(&path, summary_json(summary)?)?;
        written.push(path);
    }

    if let Some(extract) = extract {
        for (index, table) in extract.tables.iter().enumerate() {
            let path = dir.join(format!("table-{}.csv", index + 1));
            fs::write(&path, table_to_csv(table)?)?;
            written.push(path);
        }
    }

    if written.is_empty() {
        return Err(ClaimlensError::Other(
            "nothing to export; scrape or analyze first".into(),
        ));
    }

    tracing::info!(files = written.len(), dir = %dir.display(), "export complete");
    Ok(written)
}

fn summary_json(summary: &SummaryResult) -> Result<String> {
    let value = match summary {
        SummaryResult::Structured(summary) => serde_json::to_value(summary),
        SummaryResult::Raw(text) => Ok(serde_json::json!({ "raw": text })),
    }
    .map_err(|e| ClaimlensError::Other(format!("summary serialization failed: {e}")))?;

    serde_json::to_string_pretty(&value)
        .map_err(|e| ClaimlensError::Other(format!("summary serialization failed: {e}")))
}

fn table_to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in table {
        writer
            .write_record(row)
            .map_err(|e| ClaimlensError::Other(format!("csv serialization failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClaimlensError::Other(format!("csv serialization failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ClaimlensError::Other(format!("csv output not UTF-8: {e}")))
}
