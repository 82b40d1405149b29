//! Generic metric extraction over one parsed filing.
//!
//! Real-world exports are ragged: parties without invoices, invoices
//! without items, amounts that are null or missing. Every lookup here
//! defaults to zero instead of failing, so an empty nesting level simply
//! contributes nothing.

use serde_json::Value;

use crate::models::{TableDef, TableShape};

/// Numeric leaf with the zero default: absent, null or non-numeric → 0.0.
fn amount(source: &Value, field: &str) -> f64 {
    source.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn as_list(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn add_fields(totals: &mut [f64], source: &Value, table: &TableDef) {
    for (i, metric) in table.metrics.iter().enumerate() {
        totals[i] += amount(source, metric.field);
    }
}

fn add_items(totals: &mut [f64], document: &Value, item_detail: bool, table: &TableDef) {
    for item in as_list(document.get("itms")) {
        let source = if item_detail {
            item.get("itm_det").unwrap_or(&Value::Null)
        } else {
            item
        };
        add_fields(totals, source, table);
    }
}

/// Sum one table's declared metrics across one filing.
/// Returns one total per metric, in the table's declared order.
pub fn extract_table(document: &Value, table: &TableDef) -> Vec<f64> {
    let mut totals = vec![0.0; table.metrics.len()];
    let source = document.get(table.key);
    match table.shape {
        TableShape::Flat => {
            for entry in as_list(source) {
                add_fields(&mut totals, entry, table);
            }
        }
        TableShape::Summary { list_key } => {
            for row in as_list(source.and_then(|s| s.get(list_key))) {
                add_fields(&mut totals, row, table);
            }
        }
        TableShape::Items {
            doc_key,
            item_detail,
        } => {
            for entry in as_list(source) {
                if let Some(filter) = table.filter {
                    if entry.get(filter.field).and_then(Value::as_str) != Some(filter.equals) {
                        continue;
                    }
                }
                match doc_key {
                    Some(key) => {
                        for document in as_list(entry.get(key)) {
                            add_items(&mut totals, document, item_detail, table);
                        }
                    }
                    None => add_items(&mut totals, entry, item_detail, table),
                }
            }
        }
    }
    totals
}
