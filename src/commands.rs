use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;
use tauri::{AppHandle, Manager};
use tracing::info;

use crate::aggregate::{consolidate_files, Consolidation};
use crate::error::{ConsolidateError, SkipReason};
use crate::excel;
use crate::types::{Filing, PeriodConvention, SkippedFiling};

/// Per-file validation result for the upload list.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingPreview {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub processed: usize,
    pub skipped: Vec<SkippedFiling>,
    pub mixed_gstins: bool,
}

/// Report as an in-memory blob for the webview download path.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedBlob {
    pub file_name: String,
    pub data_base64: String,
    pub processed: usize,
    pub skipped: Vec<SkippedFiling>,
    pub mixed_gstins: bool,
}

fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Batch guard shared by both export commands: empty input and
/// nothing-processed are errors, with every per-file reason in one message.
fn run_consolidation(
    paths: &[String],
    convention: Option<PeriodConvention>,
) -> Result<Consolidation, String> {
    if paths.is_empty() {
        return Err(ConsolidateError::EmptyInput.to_string());
    }
    let consolidation = consolidate_files(paths, convention.unwrap_or_default());
    if consolidation.processed == 0 {
        let detail: Vec<String> = consolidation
            .skipped
            .iter()
            .map(|s| format!("{}: {}", s.file_name, s.error))
            .collect();
        return Err(format!(
            "{}: {}",
            ConsolidateError::NothingProcessed,
            detail.join("; ")
        ));
    }
    info!(
        processed = consolidation.processed,
        skipped = consolidation.skipped.len(),
        "consolidated filing batch"
    );
    Ok(consolidation)
}

/// Validate uploaded files and report each one's filing period (or why it
/// will be skipped) before the user generates the report.
#[tauri::command]
pub fn preview_filings(
    paths: Vec<String>,
    convention: Option<PeriodConvention>,
) -> Vec<FilingPreview> {
    let convention = convention.unwrap_or_default();
    paths
        .iter()
        .map(|path| {
            let file_name = file_name_of(path);
            let parsed = std::fs::read(path)
                .map_err(|e| SkipReason::Unreadable(e.to_string()))
                .and_then(|bytes| Filing::parse(&file_name, &bytes, convention));
            match parsed {
                Ok(filing) => FilingPreview {
                    file_name,
                    period: Some(filing.period.label()),
                    gstin: filing.gstin,
                    error: None,
                },
                Err(reason) => FilingPreview {
                    file_name,
                    period: None,
                    gstin: None,
                    error: Some(reason.to_string()),
                },
            }
        })
        .collect()
}

/// Consolidate the batch and save the report to disk (chosen path, or a
/// timestamped file in Downloads). Returns the saved path and the skip list.
#[tauri::command]
pub fn export_consolidated_excel(
    paths: Vec<String>,
    path_override: Option<String>,
    convention: Option<PeriodConvention>,
) -> Result<ExportResult, String> {
    let consolidation = run_consolidation(&paths, convention)?;
    let path = excel::export_consolidated_excel(&consolidation, path_override.as_deref())
        .map_err(|e| e.to_string())?;
    Ok(ExportResult {
        path: path.display().to_string(),
        processed: consolidation.processed,
        mixed_gstins: consolidation.mixed_gstins(),
        skipped: consolidation.skipped,
    })
}

/// Consolidate the batch and return the report as a base64 blob the
/// webview offers as a download.
#[tauri::command]
pub fn export_consolidated_base64(
    paths: Vec<String>,
    convention: Option<PeriodConvention>,
) -> Result<ConsolidatedBlob, String> {
    let consolidation = run_consolidation(&paths, convention)?;
    let bytes = excel::write_workbook(&consolidation).map_err(|e| e.to_string())?;
    Ok(ConsolidatedBlob {
        file_name: excel::DOWNLOAD_NAME.to_string(),
        data_base64: BASE64.encode(&bytes),
        processed: consolidation.processed,
        mixed_gstins: consolidation.mixed_gstins(),
        skipped: consolidation.skipped,
    })
}

#[tauri::command]
pub fn open_report_file(path: String) -> Result<(), String> {
    opener::open(Path::new(&path)).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}
