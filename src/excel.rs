//! Consolidated report layout and xlsx serialization.
//!
//! Layout: row 1 is "Particulars" + one column per fiscal month + "Total";
//! below it, one heading row per catalog table followed by that table's
//! metric rows. Cells accumulate at full precision and are rounded to the
//! 2-decimal currency convention only when written.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::aggregate::Consolidation;
use crate::error::ConsolidateError;
use crate::models::CATALOG;
use crate::period::{fiscal_year_periods, Period};

pub const SHEET_NAME: &str = "GSTR-1 Consolidated";
pub const DOWNLOAD_NAME: &str = "GSTR1_Consolidated.xlsx";

const LABEL_HEADER: &str = "Particulars";
const TOTAL_HEADER: &str = "Total";
const AMOUNT_WIDTH: f64 = 14.0;

/// One line of the sheet below the header row.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    /// Table heading, label only.
    Heading(&'static str),
    /// One metric: label, one value per period column, row total.
    Metric {
        label: &'static str,
        values: Vec<f64>,
        total: f64,
    },
}

/// Report columns: every month of every fiscal year seen in the batch,
/// April through March, so months without an upload show as explicit
/// zero columns.
pub fn report_periods(consolidation: &Consolidation) -> Vec<Period> {
    let years: BTreeSet<i32> = consolidation.periods().map(|p| p.fiscal_year()).collect();
    years.into_iter().flat_map(fiscal_year_periods).collect()
}

/// Rows of the consolidated sheet: catalog order, declared metric order,
/// zero default for cells no filing touched.
pub fn report_rows(consolidation: &Consolidation, periods: &[Period]) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for (t, table) in CATALOG.iter().enumerate() {
        rows.push(ReportRow::Heading(table.label));
        for (m, metric) in table.metrics.iter().enumerate() {
            let values: Vec<f64> = periods
                .iter()
                .map(|p| consolidation.cell(t, m, *p))
                .collect();
            let total = values.iter().sum();
            rows.push(ReportRow::Metric {
                label: metric.label,
                values,
                total,
            });
        }
    }
    rows
}

/// Round to two decimals at the presentation boundary.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate column width from text length (char count × 1.2, clamped 10–50).
fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 50.0)
}

fn label_column_width() -> f64 {
    let mut width = estimate_text_width(LABEL_HEADER);
    for table in CATALOG {
        width = width.max(estimate_text_width(table.label));
        for metric in table.metrics {
            width = width.max(estimate_text_width(metric.label));
        }
    }
    width
}

/// Serialize the consolidated report to xlsx bytes.
pub fn write_workbook(consolidation: &Consolidation) -> Result<Vec<u8>, XlsxError> {
    let periods = report_periods(consolidation);
    let rows = report_rows(consolidation, &periods);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x2563EB))
        .set_font_color(Color::RGB(0xFFFFFF));
    let heading_format = Format::new().set_bold();
    let metric_format = Format::new().set_indent(1);
    let amount_format = Format::new()
        .set_num_format("#,##0.00")
        .set_align(FormatAlign::Right);

    worksheet.set_column_width(0, label_column_width())?;
    for col in 1..=periods.len() + 1 {
        worksheet.set_column_width(col as u16, AMOUNT_WIDTH)?;
    }

    worksheet.write_string_with_format(0, 0, LABEL_HEADER, &header_format)?;
    for (i, period) in periods.iter().enumerate() {
        worksheet.write_string_with_format(0, (i + 1) as u16, &period.label(), &header_format)?;
    }
    worksheet.write_string_with_format(0, (periods.len() + 1) as u16, TOTAL_HEADER, &header_format)?;

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        match row {
            ReportRow::Heading(label) => {
                worksheet.write_string_with_format(r, 0, *label, &heading_format)?;
            }
            ReportRow::Metric {
                label,
                values,
                total,
            } => {
                worksheet.write_string_with_format(r, 0, *label, &metric_format)?;
                for (c, value) in values.iter().enumerate() {
                    worksheet.write_number_with_format(
                        r,
                        (c + 1) as u16,
                        round2(*value),
                        &amount_format,
                    )?;
                }
                worksheet.write_number_with_format(
                    r,
                    (values.len() + 1) as u16,
                    round2(*total),
                    &amount_format,
                )?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    workbook.save_to_buffer()
}

/// Save the report to the given path, or to a timestamped name in the
/// Downloads folder. Returns the saved path.
pub fn export_consolidated_excel(
    consolidation: &Consolidation,
    path_override: Option<&str>,
) -> Result<PathBuf, ConsolidateError> {
    let path = match path_override.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => {
            let mut path = PathBuf::from(p);
            if path.extension().map(|e| e.to_str()) != Some(Some("xlsx")) {
                path.set_extension("xlsx");
            }
            path
        }
        None => {
            let dir = dirs::download_dir()
                .or_else(dirs::desktop_dir)
                .ok_or(ConsolidateError::NoDownloadsDir)?;
            let now = chrono::Local::now();
            let mut path = dir.join(format!(
                "GSTR1_Consolidated_{}.xlsx",
                now.format("%Y%m%d_%H%M%S")
            ));
            let mut counter = 2u32;
            while path.exists() {
                path = dir.join(format!(
                    "GSTR1_Consolidated_{}_{}.xlsx",
                    now.format("%Y%m%d_%H%M%S"),
                    counter
                ));
                counter += 1;
            }
            path
        }
    };

    let bytes = write_workbook(consolidation)?;
    std::fs::write(&path, bytes)?;
    Ok(path)
}
