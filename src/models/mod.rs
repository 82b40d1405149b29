mod catalog;

pub use catalog::{find_table, EntryFilter, MetricDef, TableDef, TableShape, CATALOG};
