use std::path::{Path, PathBuf};

use quiz_core::model::SessionSummary;
use services::{detailed_results_json, render_summary_document};
use tracing::info;

/// Files written for one finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub details: PathBuf,
    pub document: PathBuf,
}

/// Write `quiz_<name>_<unix>.json` and `quiz_summary_<name>_<unix>.txt` into `dir`.
///
/// # Errors
///
/// Returns I/O errors from creating the directory or writing either file.
pub fn write_exports(dir: &Path, summary: &SessionSummary) -> std::io::Result<ExportPaths> {
    std::fs::create_dir_all(dir)?;

    let stem = summary.player_name().file_stem();
    let stamp = summary.completed_at().timestamp();

    let details = dir.join(format!("quiz_{stem}_{stamp}.json"));
    let json = detailed_results_json(summary).map_err(std::io::Error::other)?;
    std::fs::write(&details, json)?;

    let document = dir.join(format!("quiz_summary_{stem}_{stamp}.txt"));
    std::fs::write(&document, render_summary_document(summary))?;

    info!(
        details = %details.display(),
        document = %document.display(),
        "exported session results"
    );
    Ok(ExportPaths { details, document })
}
