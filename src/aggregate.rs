//! Cross-file accumulation into (table, metric, period) cells.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::warn;

use crate::error::SkipReason;
use crate::extract::extract_table;
use crate::models::CATALOG;
use crate::period::Period;
use crate::types::{Filing, PeriodConvention, SkippedFiling};

/// Catalog index, metric index, period.
pub type CellKey = (usize, usize, Period);

/// Result of folding one batch of uploaded filings. Built fresh per
/// generate action; nothing survives between invocations.
#[derive(Debug, Default)]
pub struct Consolidation {
    cells: BTreeMap<CellKey, f64>,
    periods: BTreeSet<Period>,
    gstins: BTreeSet<String>,
    pub processed: usize,
    pub skipped: Vec<SkippedFiling>,
}

impl Consolidation {
    pub fn new() -> Consolidation {
        Consolidation::default()
    }

    /// Fold one parsed filing into the cells. Accumulation is plain
    /// addition, so processing order does not matter and re-adding the
    /// same filing counts it again.
    pub fn add(&mut self, filing: &Filing) {
        self.periods.insert(filing.period);
        if let Some(gstin) = &filing.gstin {
            self.gstins.insert(gstin.clone());
        }
        for (t, table) in CATALOG.iter().enumerate() {
            let totals = extract_table(&filing.document, table);
            for (m, value) in totals.into_iter().enumerate() {
                *self.cells.entry((t, m, filing.period)).or_insert(0.0) += value;
            }
        }
        self.processed += 1;
    }

    /// Record one file that stays out of the consolidation.
    pub fn skip(&mut self, file_name: &str, reason: &SkipReason) {
        warn!(file = file_name, reason = %reason, "filing left out of consolidation");
        self.skipped.push(SkippedFiling {
            file_name: file_name.to_string(),
            reason: reason.kind(),
            error: reason.to_string(),
        });
    }

    /// Accumulated value for one cell; never-touched cells read as zero.
    pub fn cell(&self, table: usize, metric: usize, period: Period) -> f64 {
        self.cells.get(&(table, metric, period)).copied().unwrap_or(0.0)
    }

    /// Periods that actually appeared in the batch, in fiscal order.
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.periods.iter().copied()
    }

    /// True when the batch mixes filings from more than one GSTIN.
    pub fn mixed_gstins(&self) -> bool {
        self.gstins.len() > 1
    }
}

/// Read, parse and fold a whole uploaded batch. Every failure is
/// per-file: one bad path never aborts the rest.
pub fn consolidate_files(paths: &[String], convention: PeriodConvention) -> Consolidation {
    let mut consolidation = Consolidation::new();
    for path in paths {
        let file_name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        match std::fs::read(path) {
            Ok(bytes) => match Filing::parse(&file_name, &bytes, convention) {
                Ok(filing) => consolidation.add(&filing),
                Err(reason) => consolidation.skip(&file_name, &reason),
            },
            Err(e) => consolidation.skip(&file_name, &SkipReason::Unreadable(e.to_string())),
        }
    }
    consolidation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::find_table;
    use serde_json::json;

    fn filing(name: &str, fp: &str, body: serde_json::Value) -> Filing {
        let mut document = body;
        document["fp"] = json!(fp);
        Filing::parse(
            name,
            document.to_string().as_bytes(),
            PeriodConvention::MonthFirst,
        )
        .unwrap()
    }

    fn table_index(label: &str) -> usize {
        let table = find_table(label).unwrap();
        CATALOG.iter().position(|t| t.label == table.label).unwrap()
    }

    fn b2b_doc(txval: f64, iamt: f64) -> serde_json::Value {
        json!({
            "b2b": [ { "inv": [ { "itms": [ { "itm_det": { "txval": txval, "iamt": iamt } } ] } ] } ]
        })
    }

    #[test]
    fn accumulation_is_order_independent() {
        let a = filing("a.json", "042024", b2b_doc(1000.0, 180.0));
        let b = filing("b.json", "052024", b2b_doc(250.5, 45.09));

        let mut ab = Consolidation::new();
        ab.add(&a);
        ab.add(&b);
        let mut ba = Consolidation::new();
        ba.add(&b);
        ba.add(&a);

        let t = table_index("B2B Invoices");
        for period in [a.period, b.period] {
            for m in 0..5 {
                assert_eq!(ab.cell(t, m, period), ba.cell(t, m, period));
            }
        }
        assert_eq!(ab.processed, 2);
        assert_eq!(ba.processed, 2);
    }

    #[test]
    fn same_filing_twice_double_counts() {
        let a = filing("a.json", "042024", b2b_doc(1000.0, 180.0));
        let mut once = Consolidation::new();
        once.add(&a);
        let mut twice = Consolidation::new();
        twice.add(&a);
        twice.add(&a);

        let t = table_index("B2B Invoices");
        assert_eq!(once.cell(t, 0, a.period), 1000.0);
        assert_eq!(twice.cell(t, 0, a.period), 2000.0);
        assert_eq!(twice.cell(t, 1, a.period), 360.0);
    }

    #[test]
    fn missing_table_keys_read_as_zero_cells() {
        let a = filing("a.json", "042024", json!({ "b2b": [] }));
        let mut consolidation = Consolidation::new();
        consolidation.add(&a);

        let t = table_index("Exports (With Payment)");
        assert_eq!(consolidation.cell(t, 0, a.period), 0.0);
        assert_eq!(consolidation.processed, 1);
    }

    #[test]
    fn skipped_files_are_counted_not_accumulated() {
        let mut consolidation = Consolidation::new();
        let a = filing("a.json", "042024", b2b_doc(100.0, 18.0));
        consolidation.add(&a);
        consolidation.skip(
            "broken.json",
            &SkipReason::UnresolvedPeriod("132024".to_string()),
        );

        assert_eq!(consolidation.processed, 1);
        assert_eq!(consolidation.skipped.len(), 1);
        assert_eq!(consolidation.skipped[0].reason, "unresolved_period");
        assert_eq!(consolidation.periods().count(), 1);
    }

    #[test]
    fn mixed_gstins_are_flagged() {
        let mut a_doc = b2b_doc(1.0, 0.0);
        a_doc["gstin"] = json!("27AAACC1234F1Z5");
        let mut b_doc = b2b_doc(1.0, 0.0);
        b_doc["gstin"] = json!("29AAACC0000A1Z1");

        let mut consolidation = Consolidation::new();
        consolidation.add(&filing("a.json", "042024", a_doc.clone()));
        assert!(!consolidation.mixed_gstins());
        consolidation.add(&filing("b.json", "052024", b_doc));
        assert!(consolidation.mixed_gstins());
    }

    #[test]
    fn unreadable_paths_become_per_file_skips() {
        let consolidation = consolidate_files(
            &["/no/such/dir/apr.json".to_string()],
            PeriodConvention::MonthFirst,
        );
        assert_eq!(consolidation.processed, 0);
        assert_eq!(consolidation.skipped.len(), 1);
        assert_eq!(consolidation.skipped[0].reason, "unreadable");
        assert_eq!(consolidation.skipped[0].file_name, "apr.json");
    }
}
