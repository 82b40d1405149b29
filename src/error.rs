use thiserror::Error;

/// Why one uploaded file stays out of the consolidation.
///
/// An unresolved filing period is deliberately distinct from a parse
/// failure so the upload list can tell the user which of the two to fix.
#[derive(Debug, Clone, Error)]
pub enum SkipReason {
    #[error("could not read file: {0}")]
    Unreadable(String),
    #[error("not a valid GSTR-1 JSON export: {0}")]
    Unparseable(String),
    #[error("unrecognized filing period {0:?}")]
    UnresolvedPeriod(String),
}

impl SkipReason {
    /// Stable machine tag for the upload list UI.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::Unreadable(_) => "unreadable",
            SkipReason::Unparseable(_) => "unparseable",
            SkipReason::UnresolvedPeriod(_) => "unresolved_period",
        }
    }
}

/// Batch-level consolidation failure.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("no filing files were provided")]
    EmptyInput,
    #[error("none of the uploaded files could be processed")]
    NothingProcessed,
    #[error("could not find a Downloads or Desktop folder")]
    NoDownloadsDir,
    #[error("could not build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("could not save report: {0}")]
    Io(#[from] std::io::Error),
}
