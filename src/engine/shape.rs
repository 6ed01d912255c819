use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::record::{
    key_string, numeric_field, resolve_path, resolve_value_path, Record,
};

/// Marker rendered for a cell that has no value for its column.
pub const NOT_APPLICABLE: &str = "N/A";

/// A fully resolved table column. `source` carries everything the cell
/// accessor needs, so rendering never has to parse the key back apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    pub source: ColumnSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSource {
    /// Plain dot-path read off the record.
    Field { path: String },
    /// The `index`-th value of `type_code` within `bucket` on the
    /// record's entry array (e.g. second "general" price in USD).
    Dimension {
        bucket: String,
        type_code: String,
        index: usize,
    },
}

/// Shaped output for one report: the surviving rows, the column set to
/// render them with, and the grand total. Recomputed on demand, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub rows: Vec<Record>,
    pub columns: Vec<ColumnDescriptor>,
    pub grand_total: f64,
}

/// Fixed column layout for the plain reports.
#[derive(Debug, Clone, Default)]
pub struct StaticSpec {
    pub columns: Vec<StaticColumn>,
    pub total_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StaticColumn {
    pub path: String,
    pub label: String,
}

impl StaticSpec {
    pub fn column(mut self, path: impl Into<String>, label: impl Into<String>) -> Self {
        self.columns.push(StaticColumn {
            path: path.into(),
            label: label.into(),
        });
        self
    }

    pub fn total(mut self, path: impl Into<String>) -> Self {
        self.total_path = Some(path.into());
        self
    }
}

/// One value kind of interest on a dynamic report (e.g. the
/// wholesale / retail / general price types, or cash / credit
/// collections).
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub code: String,
    pub label: String,
}

/// Configuration for the dynamic multi-dimensional reports. Buckets
/// (e.g. currency codes) are not listed here: they are discovered from
/// the data, because the column set is data-dependent.
#[derive(Debug, Clone)]
pub struct DimensionSpec {
    /// Fixed identity columns rendered before the discovered ones
    /// (e.g. the product or rep name).
    pub lead: Vec<StaticColumn>,
    /// Record field holding the entry array (e.g. `prices`).
    pub entries_path: String,
    /// Within each entry: the bucket code (e.g. `currency.code`).
    pub bucket_path: String,
    /// Within each entry: the bucket's display name, if any.
    pub bucket_label_path: Option<String>,
    /// Within each entry: the type code compared against `types`.
    pub type_path: String,
    /// Within each entry: the cell value.
    pub value_path: String,
    pub types: Vec<TypeSpec>,
    pub total_path: Option<String>,
}

/// Shape a static report: fixed columns, rows passed through in order,
/// grand total summed over the designated field (absent or malformed
/// values count as zero).
pub fn shape_static(records: &[Record], spec: &StaticSpec) -> ReportResult {
    let columns = spec
        .columns
        .iter()
        .map(|col| ColumnDescriptor {
            key: col.path.clone(),
            label: col.label.clone(),
            source: ColumnSource::Field {
                path: col.path.clone(),
            },
        })
        .collect();

    ReportResult {
        rows: records.to_vec(),
        columns,
        grand_total: grand_total(records, spec.total_path.as_deref()),
    }
}

/// Shape a dynamic report in two passes: first discover which
/// (bucket, type) pairs exist and the maximum repeat count any single
/// record carries for each, then render one column per
/// (bucket, type, 0..count). Buckets keep first-seen order; a bucket's
/// display name comes from the first entry that has one, falling back
/// to the raw code.
pub fn shape_dynamic(records: &[Record], spec: &DimensionSpec) -> ReportResult {
    let mut bucket_order: Vec<String> = Vec::new();
    let mut bucket_labels: HashMap<String, String> = HashMap::new();
    let mut max_counts: HashMap<(String, String), usize> = HashMap::new();

    for record in records {
        let mut per_record: HashMap<(String, String), usize> = HashMap::new();

        for entry in entries(record, &spec.entries_path) {
            let Some(bucket) = resolve_value_path(entry, &spec.bucket_path).and_then(key_string)
            else {
                continue;
            };
            let Some(type_code) = resolve_value_path(entry, &spec.type_path).and_then(key_string)
            else {
                continue;
            };
            if !spec.types.iter().any(|t| t.code == type_code) {
                continue;
            }

            if !bucket_order.contains(&bucket) {
                bucket_order.push(bucket.clone());
            }
            if let Some(label_path) = spec.bucket_label_path.as_deref() {
                if !bucket_labels.contains_key(&bucket) {
                    if let Some(label) =
                        resolve_value_path(entry, label_path).and_then(key_string)
                    {
                        bucket_labels.insert(bucket.clone(), label);
                    }
                }
            }

            *per_record.entry((bucket, type_code)).or_insert(0) += 1;
        }

        for (pair, count) in per_record {
            let max = max_counts.entry(pair).or_insert(0);
            if count > *max {
                *max = count;
            }
        }
    }

    let mut columns: Vec<ColumnDescriptor> = spec
        .lead
        .iter()
        .map(|col| ColumnDescriptor {
            key: col.path.clone(),
            label: col.label.clone(),
            source: ColumnSource::Field {
                path: col.path.clone(),
            },
        })
        .collect();
    for bucket in &bucket_order {
        let bucket_label = bucket_labels.get(bucket).unwrap_or(bucket);
        for ty in &spec.types {
            let count = max_counts
                .get(&(bucket.clone(), ty.code.clone()))
                .copied()
                .unwrap_or(0);
            for index in 0..count {
                let label = if count > 1 {
                    format!("{} {} ({})", ty.label, index + 1, bucket_label)
                } else {
                    format!("{} ({})", ty.label, bucket_label)
                };
                columns.push(ColumnDescriptor {
                    key: format!("{}:{}:{}", bucket, ty.code, index),
                    label,
                    source: ColumnSource::Dimension {
                        bucket: bucket.clone(),
                        type_code: ty.code.clone(),
                        index,
                    },
                });
            }
        }
    }

    ReportResult {
        rows: records.to_vec(),
        columns,
        grand_total: grand_total(records, spec.total_path.as_deref()),
    }
}

/// Resolve a cell for a dimension column: the `index`-th entry matching
/// the column's bucket and type, read at the spec's value path.
pub fn dimension_cell<'a>(
    record: &'a Record,
    spec: &DimensionSpec,
    bucket: &str,
    type_code: &str,
    index: usize,
) -> Option<&'a Value> {
    entries(record, &spec.entries_path)
        .filter(|entry| {
            resolve_value_path(entry, &spec.bucket_path)
                .and_then(key_string)
                .as_deref()
                == Some(bucket)
                && resolve_value_path(entry, &spec.type_path)
                    .and_then(key_string)
                    .as_deref()
                    == Some(type_code)
        })
        .nth(index)
        .and_then(|entry| resolve_value_path(entry, &spec.value_path))
}

/// Display text for any cell; absent values render the sentinel instead
/// of failing.
pub fn cell_text(record: &Record, column: &ColumnDescriptor, spec: Option<&DimensionSpec>) -> String {
    let value = match &column.source {
        ColumnSource::Field { path } => resolve_path(record, path),
        ColumnSource::Dimension {
            bucket,
            type_code,
            index,
        } => spec.and_then(|s| dimension_cell(record, s, bucket, type_code, *index)),
    };
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => NOT_APPLICABLE.to_string(),
    }
}

/// Per-bucket totals (e.g. per currency) over the same rows the grand
/// total covers. Additive companion to the mixed-bucket grand total,
/// not a replacement for it. Bucket order is first-seen.
pub fn totals_by_bucket(
    records: &[Record],
    bucket_path: &str,
    amount_path: &str,
) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();

    for record in records {
        let bucket = resolve_path(record, bucket_path)
            .and_then(key_string)
            .unwrap_or_else(|| NOT_APPLICABLE.to_string());
        if !sums.contains_key(&bucket) {
            order.push(bucket.clone());
        }
        *sums.entry(bucket).or_insert(0.0) += numeric_field(record, amount_path);
    }

    order
        .into_iter()
        .map(|bucket| {
            let sum = sums[&bucket];
            (bucket, sum)
        })
        .collect()
}

fn grand_total(records: &[Record], total_path: Option<&str>) -> f64 {
    match total_path {
        Some(path) => records.iter().map(|r| numeric_field(r, path)).sum(),
        None => 0.0,
    }
}

fn entries<'a>(record: &'a Record, path: &str) -> impl Iterator<Item = &'a Value> {
    resolve_path(record, path)
        .and_then(Value::as_array)
        .map(|v| v.as_slice())
        .unwrap_or(&[])
        .iter()
}
