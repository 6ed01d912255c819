//! The report catalog: one declarative definition per screen of the
//! admin console. The catalog is what keeps the engine reusable — each
//! report contributes data (paths, slots, columns), never code.

use crate::engine::{
    cell_text, shape_dynamic, shape_static, ColumnDescriptor, DimensionSpec, FieldMap, Record,
    ReportResult, StaticColumn, StaticSpec, TypeSpec,
};

/// One user-facing filter of a report: the CLI slot name and the record
/// field it constrains. `label_path` feeds the option list's display
/// text when it differs from the key (e.g. name for an id).
#[derive(Debug, Clone)]
pub struct FilterSlot {
    pub slot: String,
    pub path: String,
    pub label_path: Option<String>,
}

/// Column layout of a report: fixed, or discovered from the data.
#[derive(Debug, Clone)]
pub enum ReportShape {
    Static(StaticSpec),
    Dynamic(DimensionSpec),
}

impl ReportShape {
    pub fn shape(&self, records: &[Record]) -> ReportResult {
        match self {
            ReportShape::Static(spec) => shape_static(records, spec),
            ReportShape::Dynamic(spec) => shape_dynamic(records, spec),
        }
    }

    pub fn cell(&self, record: &Record, column: &ColumnDescriptor) -> String {
        match self {
            ReportShape::Static(_) => cell_text(record, column, None),
            ReportShape::Dynamic(spec) => cell_text(record, column, Some(spec)),
        }
    }

    pub fn total_path(&self) -> Option<&str> {
        match self {
            ReportShape::Static(spec) => spec.total_path.as_deref(),
            ReportShape::Dynamic(spec) => spec.total_path.as_deref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReportShape::Static(_) => "static",
            ReportShape::Dynamic(_) => "dynamic",
        }
    }
}

/// Everything the console needs to run one report.
#[derive(Debug, Clone)]
pub struct ReportDef {
    pub name: &'static str,
    pub title: &'static str,
    pub endpoint: &'static str,
    pub date_path: Option<&'static str>,
    pub slots: Vec<FilterSlot>,
    pub shape: ReportShape,
    /// Field to break the grand total down by (e.g. the currency code),
    /// shown alongside the mixed-currency total.
    pub breakdown_path: Option<&'static str>,
}

impl ReportDef {
    pub fn field_map(&self) -> FieldMap {
        let mut map = FieldMap::default();
        for slot in &self.slots {
            map = map.slot(slot.slot.clone(), slot.path.clone());
        }
        if let Some(path) = self.date_path {
            map = map.date_field(path);
        }
        map
    }

    pub fn slot(&self, name: &str) -> Option<&FilterSlot> {
        self.slots.iter().find(|s| s.slot == name)
    }
}

fn slot(name: &str, path: &str) -> FilterSlot {
    FilterSlot {
        slot: name.to_string(),
        path: path.to_string(),
        label_path: None,
    }
}

fn labeled_slot(name: &str, path: &str, label_path: &str) -> FilterSlot {
    FilterSlot {
        slot: name.to_string(),
        path: path.to_string(),
        label_path: Some(label_path.to_string()),
    }
}

/// Every report the console knows about.
pub fn catalog() -> Vec<ReportDef> {
    vec![
        ReportDef {
            name: "sales",
            title: "Sales invoices",
            endpoint: "admin/invoices",
            date_path: Some("date"),
            slots: vec![
                slot("customer", "customer.name"),
                slot("rep", "rep_name"),
                labeled_slot("currency", "currency.code", "currency.name"),
                slot("status", "status"),
            ],
            shape: ReportShape::Static(
                StaticSpec::default()
                    .column("number", "Number")
                    .column("date", "Date")
                    .column("customer.name", "Customer")
                    .column("rep_name", "Rep")
                    .column("currency.code", "Currency")
                    .column("total_amount", "Total")
                    .total("total_amount"),
            ),
            breakdown_path: Some("currency.code"),
        },
        ReportDef {
            name: "returns",
            title: "Sales returns",
            endpoint: "admin/sales-returns",
            date_path: Some("date"),
            slots: vec![
                slot("customer", "customer.name"),
                slot("rep", "rep_name"),
                labeled_slot("currency", "currency.code", "currency.name"),
                slot("reason", "reason"),
            ],
            shape: ReportShape::Static(
                StaticSpec::default()
                    .column("number", "Number")
                    .column("date", "Date")
                    .column("customer.name", "Customer")
                    .column("rep_name", "Rep")
                    .column("reason", "Reason")
                    .column("total_amount", "Total")
                    .total("total_amount"),
            ),
            breakdown_path: Some("currency.code"),
        },
        ReportDef {
            name: "vouchers",
            title: "Payment vouchers",
            endpoint: "admin/payment-vouchers",
            date_path: Some("date"),
            slots: vec![
                slot("rep", "rep_name"),
                slot("account", "account.name"),
                labeled_slot("currency", "currency.code", "currency.name"),
            ],
            shape: ReportShape::Static(
                StaticSpec::default()
                    .column("number", "Number")
                    .column("date", "Date")
                    .column("rep_name", "Rep")
                    .column("account.name", "Account")
                    .column("currency.code", "Currency")
                    .column("amount", "Amount")
                    .total("amount"),
            ),
            breakdown_path: Some("currency.code"),
        },
        ReportDef {
            name: "inventory",
            title: "Inventory stock",
            endpoint: "admin/stock",
            date_path: Some("updated_at"),
            slots: vec![
                slot("warehouse", "warehouse.name"),
                slot("category", "product.category"),
            ],
            shape: ReportShape::Static(
                StaticSpec::default()
                    .column("product.name", "Product")
                    .column("product.category", "Category")
                    .column("warehouse.name", "Warehouse")
                    .column("quantity", "Qty")
                    .column("unit_cost", "Unit cost")
                    .total("quantity"),
            ),
            breakdown_path: None,
        },
        ReportDef {
            name: "visits",
            title: "Customer visits",
            endpoint: "admin/visits",
            date_path: Some("date"),
            slots: vec![
                slot("rep", "rep_name"),
                slot("customer", "customer.name"),
                slot("outcome", "outcome"),
            ],
            shape: ReportShape::Static(
                StaticSpec::default()
                    .column("date", "Date")
                    .column("rep_name", "Rep")
                    .column("customer.name", "Customer")
                    .column("outcome", "Outcome")
                    .column("notes", "Notes"),
            ),
            breakdown_path: None,
        },
        ReportDef {
            name: "rep-performance",
            title: "Rep performance by currency",
            endpoint: "admin/rep-performance",
            date_path: None,
            slots: vec![slot("rep", "rep_name")],
            shape: ReportShape::Dynamic(DimensionSpec {
                lead: vec![StaticColumn {
                    path: "rep_name".into(),
                    label: "Rep".into(),
                }],
                entries_path: "collected".into(),
                bucket_path: "currency.code".into(),
                bucket_label_path: Some("currency.name".into()),
                type_path: "kind".into(),
                value_path: "amount".into(),
                types: vec![
                    TypeSpec { code: "cash".into(), label: "Cash".into() },
                    TypeSpec { code: "credit".into(), label: "Credit".into() },
                ],
                total_path: Some("total_amount".into()),
            }),
            breakdown_path: None,
        },
        ReportDef {
            name: "price-list",
            title: "Product price list",
            endpoint: "admin/products",
            date_path: None,
            slots: vec![slot("category", "category")],
            shape: ReportShape::Dynamic(DimensionSpec {
                lead: vec![
                    StaticColumn { path: "code".into(), label: "Code".into() },
                    StaticColumn { path: "name".into(), label: "Product".into() },
                ],
                entries_path: "prices".into(),
                bucket_path: "currency.code".into(),
                bucket_label_path: Some("currency.name".into()),
                type_path: "price_type".into(),
                value_path: "amount".into(),
                types: vec![
                    TypeSpec { code: "wholesale".into(), label: "Wholesale".into() },
                    TypeSpec { code: "retail".into(), label: "Retail".into() },
                    TypeSpec { code: "general".into(), label: "General".into() },
                ],
                total_path: None,
            }),
            breakdown_path: None,
        },
    ]
}

/// Look a report up by its CLI name.
pub fn find_report(name: &str) -> Option<ReportDef> {
    catalog().into_iter().find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FilterState;
    use serde_json::json;

    #[test]
    fn every_report_name_is_unique() {
        let defs = catalog();
        let mut names: Vec<_> = defs.iter().map(|d| d.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn field_map_carries_all_slots_and_the_date_field() {
        let def = find_report("sales").unwrap();
        let map = def.field_map();
        assert_eq!(map.slots.len(), 4);
        assert_eq!(map.date_path.as_deref(), Some("date"));

        let rows = crate::engine::records_from_response(json!([
            {"number": "S-1", "date": "2024-01-01", "rep_name": "A", "total_amount": 10},
            {"number": "S-2", "date": "2024-01-02", "rep_name": "B", "total_amount": 20},
        ]));
        let state = FilterState::default().select("rep", json!("B"));
        let filtered = crate::engine::filter_records(&rows, &state, &map);
        assert_eq!(filtered.len(), 1);

        let result = def.shape.shape(&filtered);
        assert_eq!(result.grand_total, 20.0);
        assert_eq!(result.columns.len(), 6);
    }

    #[test]
    fn unknown_report_is_none() {
        assert!(find_report("nope").is_none());
    }
}
