pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod pdf;

pub use catalog::{catalog, find_report, FilterSlot, ReportDef, ReportShape};
pub use engine::{
    detect_default_range, extract_options, filter_records, records_from_response, shape_dynamic,
    shape_static, ColumnDescriptor, DateRange, DimensionSpec, FieldMap, FilterOption, FilterState,
    Record, ReportResult, StaticSpec,
};
pub use error::{ConsoleError, Result};
