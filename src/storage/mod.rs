use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::info;

use crate::error::RunError;
use crate::report::{ReportFormat, render_html, render_json, render_summary_text};
use crate::testing::TestResult;

/// Write each requested report into `dir`, creating it when missing.
/// Returns the written paths in the order of `formats`.
pub fn write_reports(
    dir: &Path,
    results: &[TestResult],
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>, RunError> {
    ensure_output_dir(dir)?;

    let generated_at = OffsetDateTime::now_utc();
    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let file = dir.join(format.file_name());
        if written.contains(&file) {
            continue;
        }

        let raw = match format {
            ReportFormat::Html => render_html(results, generated_at),
            ReportFormat::Json => render_json(results, generated_at)?,
            ReportFormat::Text => render_summary_text(results, generated_at),
        };
        fs::write(&file, raw).map_err(|source| RunError::WriteReport {
            path: file.clone(),
            source,
        })?;
        info!(report = %file.display(), "report written");
        written.push(file);
    }

    Ok(written)
}

fn ensure_output_dir(dir: &Path) -> Result<(), RunError> {
    fs::create_dir_all(dir).map_err(|source| RunError::WriteReport {
        path: dir.to_path_buf(),
        source,
    })
}
