//! The report engine: four pure, synchronous components shared by every
//! report screen instead of being re-implemented per screen.
//!
//! Data flow: load raw records, derive dropdown options and the default
//! date range, filter on every selection change, then shape the
//! filtered set into columns, rows and a grand total. None of the
//! components hold state between calls and none of them can fail:
//! malformed input degrades to empty output or `N/A` cells.

mod filter;
mod options;
mod range;
mod record;
mod shape;

pub use filter::{filter_records, FieldMap, FilterState, SlotRule};
pub use options::{extract_options, FilterOption};
pub use range::{detect_default_range, DateRange};
pub use record::{
    key_string, numeric_field, parse_record_date, records_from_response, resolve_path,
    resolve_value_path, Record,
};
pub use shape::{
    cell_text, dimension_cell, shape_dynamic, shape_static, totals_by_bucket, ColumnDescriptor,
    ColumnSource, DimensionSpec, ReportResult, StaticColumn, StaticSpec, TypeSpec,
    NOT_APPLICABLE,
};
