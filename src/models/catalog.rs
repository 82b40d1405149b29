//! Catalog of the GSTR-1 tables the consolidator reads.
//!
//! Each table names its source key in the filing JSON, the shape its
//! numbers take, and the metric rows it contributes to the report. The
//! extractor interprets this table; no category has code of its own.

/// How a table's amount fields are laid out inside the filing JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// List of entries, each optionally holding a nested document list
    /// under `doc_key` ("inv" for invoices, "nt" for notes), each document
    /// holding an `itms` list. Amount fields sit on the item itself, or one
    /// level further down under `itm_det`.
    Items {
        doc_key: Option<&'static str>,
        item_detail: bool,
    },
    /// Entries carry the amount fields directly, no nesting.
    Flat,
    /// Single object holding a list of pre-aggregated sub-category rows
    /// under `list_key`.
    Summary { list_key: &'static str },
}

/// Keeps only top-level entries whose `field` equals `equals`.
/// Entries with any other value count toward no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFilter {
    pub field: &'static str,
    pub equals: &'static str,
}

/// One metric row: report label plus the amount field it sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    pub label: &'static str,
    pub field: &'static str,
}

/// One named table of the filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Source key in the filing JSON, e.g. "b2b".
    pub key: &'static str,
    /// Heading-row label in the report.
    pub label: &'static str,
    pub shape: TableShape,
    pub filter: Option<EntryFilter>,
    /// Metric rows in declared report order.
    pub metrics: &'static [MetricDef],
}

const TAXABLE: MetricDef = MetricDef {
    label: "Taxable Value",
    field: "txval",
};
const IGST: MetricDef = MetricDef {
    label: "IGST",
    field: "iamt",
};
const CGST: MetricDef = MetricDef {
    label: "CGST",
    field: "camt",
};
const SGST: MetricDef = MetricDef {
    label: "SGST",
    field: "samt",
};
const CESS: MetricDef = MetricDef {
    label: "Cess",
    field: "csamt",
};

/// Intra- plus inter-state supplies: the full five-way split.
const FULL_TAX_SET: &[MetricDef] = &[TAXABLE, IGST, CGST, SGST, CESS];

/// Inter-state-only tables never carry CGST/SGST.
const INTER_STATE_SET: &[MetricDef] = &[TAXABLE, IGST, CESS];

/// Advance tables report the gross advance instead of a taxable value.
const ADVANCE_SET: &[MetricDef] = &[
    MetricDef {
        label: "Gross Advance",
        field: "ad_amt",
    },
    IGST,
    CGST,
    SGST,
    CESS,
];

/// Sub-categories of the nil table, kept as separate metric rows.
const NIL_SET: &[MetricDef] = &[
    MetricDef {
        label: "Nil Rated Supplies",
        field: "nil_amt",
    },
    MetricDef {
        label: "Exempted Supplies",
        field: "expt_amt",
    },
    MetricDef {
        label: "Non-GST Supplies",
        field: "ngsup_amt",
    },
];

/// Every table of the consolidated report, in report order.
pub const CATALOG: &[TableDef] = &[
    TableDef {
        key: "b2b",
        label: "B2B Invoices",
        shape: TableShape::Items {
            doc_key: Some("inv"),
            item_detail: true,
        },
        filter: None,
        metrics: FULL_TAX_SET,
    },
    TableDef {
        key: "b2cl",
        label: "B2C (Large) Invoices",
        shape: TableShape::Items {
            doc_key: Some("inv"),
            item_detail: true,
        },
        filter: None,
        metrics: INTER_STATE_SET,
    },
    TableDef {
        key: "b2cs",
        label: "B2C (Small)",
        shape: TableShape::Flat,
        filter: None,
        metrics: FULL_TAX_SET,
    },
    TableDef {
        key: "cdnr",
        label: "Credit/Debit Notes (Registered)",
        shape: TableShape::Items {
            doc_key: Some("nt"),
            item_detail: true,
        },
        filter: None,
        metrics: FULL_TAX_SET,
    },
    TableDef {
        key: "cdnur",
        label: "Credit/Debit Notes (Unregistered)",
        shape: TableShape::Items {
            doc_key: None,
            item_detail: true,
        },
        filter: None,
        metrics: INTER_STATE_SET,
    },
    TableDef {
        key: "exp",
        label: "Exports (With Payment)",
        shape: TableShape::Items {
            doc_key: Some("inv"),
            item_detail: false,
        },
        filter: Some(EntryFilter {
            field: "exp_typ",
            equals: "WPAY",
        }),
        metrics: INTER_STATE_SET,
    },
    TableDef {
        key: "exp",
        label: "Exports (Without Payment)",
        shape: TableShape::Items {
            doc_key: Some("inv"),
            item_detail: false,
        },
        filter: Some(EntryFilter {
            field: "exp_typ",
            equals: "WOPAY",
        }),
        metrics: INTER_STATE_SET,
    },
    TableDef {
        key: "at",
        label: "Advances Received",
        shape: TableShape::Items {
            doc_key: None,
            item_detail: false,
        },
        filter: None,
        metrics: ADVANCE_SET,
    },
    TableDef {
        key: "txpd",
        label: "Advances Adjusted",
        shape: TableShape::Items {
            doc_key: None,
            item_detail: false,
        },
        filter: None,
        metrics: ADVANCE_SET,
    },
    TableDef {
        key: "nil",
        label: "Nil Rated, Exempted and Non-GST Supplies",
        shape: TableShape::Summary { list_key: "inv" },
        filter: None,
        metrics: NIL_SET,
    },
];

/// Look a table up by its report label.
#[allow(dead_code)]
pub fn find_table(label: &str) -> Option<&'static TableDef> {
    CATALOG.iter().find(|t| t.label == label)
}
