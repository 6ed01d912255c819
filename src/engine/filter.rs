use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use super::record::{key_string, parse_record_date, resolve_path, Record};

/// Declares which record field a named filter slot compares against.
#[derive(Debug, Clone)]
pub struct SlotRule {
    pub slot: String,
    pub path: String,
}

/// Per-report filter configuration: the exact-match slots plus at most
/// one date field shared by the `from`/`to` pair.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    pub slots: Vec<SlotRule>,
    pub date_path: Option<String>,
}

impl FieldMap {
    pub fn slot(mut self, slot: impl Into<String>, path: impl Into<String>) -> Self {
        self.slots.push(SlotRule {
            slot: slot.into(),
            path: path.into(),
        });
        self
    }

    pub fn date_field(mut self, path: impl Into<String>) -> Self {
        self.date_path = Some(path.into());
        self
    }
}

/// The user's current selections. Initialized empty (everything passes),
/// mutated as filters change, discarded when the view closes.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub selections: BTreeMap<String, Value>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FilterState {
    pub fn select(mut self, slot: impl Into<String>, value: Value) -> Self {
        self.selections.insert(slot.into(), value);
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Active constraint for a slot, if any. Null, the empty string and
    /// the literal `"all"` all mean "no constraint".
    fn constraint(&self, slot: &str) -> Option<String> {
        let value = self.selections.get(slot)?;
        let key = key_string(value)?;
        if key == "all" {
            None
        } else {
            Some(key)
        }
    }
}

/// Apply every active predicate (logical AND) and return the surviving
/// records in their original relative order. Pure: the input is never
/// mutated and survivors are cloned.
pub fn filter_records(records: &[Record], state: &FilterState, map: &FieldMap) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, state, map))
        .cloned()
        .collect()
}

fn matches(record: &Record, state: &FilterState, map: &FieldMap) -> bool {
    for rule in &map.slots {
        let Some(wanted) = state.constraint(&rule.slot) else {
            continue;
        };
        let found = resolve_path(record, &rule.path).and_then(key_string);
        if found.as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }

    if state.from.is_some() || state.to.is_some() {
        let Some(date_path) = map.date_path.as_deref() else {
            // no mapped date field: bounds are vacuous for this report
            return true;
        };
        // records with absent or unparseable dates fail an active bound
        let Some(date) = resolve_path(record, date_path).and_then(parse_record_date) else {
            return false;
        };
        if let Some(from) = state.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = state.to {
            if date > to {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vouchers() -> Vec<Record> {
        super::super::record::records_from_response(json!([
            {"rep": "A", "amount": 100, "currency": "YER", "date": "2024-01-01"},
            {"rep": "B", "amount": 50, "currency": "YER", "date": "2024-01-10"},
            {"rep": "A", "amount": null, "currency": "YER", "date": "2024-01-15"},
        ]))
    }

    fn voucher_map() -> FieldMap {
        FieldMap::default()
            .slot("rep", "rep")
            .slot("currency", "currency")
            .date_field("date")
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn exact_match_keeps_malformed_amounts() {
        let state = FilterState::default().select("rep", json!("A"));
        let rows = filter_records(&vouchers(), &state, &voucher_map());

        // amount nullity does not affect rep filtering
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], json!("2024-01-01"));
        assert_eq!(rows[1]["date"], json!("2024-01-15"));
    }

    #[test]
    fn null_empty_and_all_mean_no_constraint() {
        let map = voucher_map();
        for unconstrained in [json!(null), json!(""), json!("all")] {
            let state = FilterState::default().select("rep", unconstrained);
            assert_eq!(filter_records(&vouchers(), &state, &map).len(), 3);
        }
    }

    #[test]
    fn date_window_is_inclusive_on_both_ends() {
        let state = FilterState::default()
            .between(Some(day(2024, 1, 5)), Some(day(2024, 1, 12)));
        let rows = filter_records(&vouchers(), &state, &voucher_map());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["date"], json!("2024-01-10"));

        let exact = FilterState::default()
            .between(Some(day(2024, 1, 1)), Some(day(2024, 1, 1)));
        let rows = filter_records(&vouchers(), &exact, &voucher_map());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["date"], json!("2024-01-01"));
    }

    #[test]
    fn unparseable_dates_fail_active_bounds_only() {
        let rows = super::super::record::records_from_response(json!([
            {"rep": "A", "date": "garbled"},
            {"rep": "A", "date": "2024-01-10"},
        ]));
        let map = voucher_map();

        let bounded = FilterState::default().between(Some(day(2024, 1, 1)), None);
        assert_eq!(filter_records(&rows, &bounded, &map).len(), 1);

        // with no bounds the garbled row is untouched
        let open = FilterState::default();
        assert_eq!(filter_records(&rows, &open, &map).len(), 2);
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let state = FilterState::default()
            .select("currency", json!("YER"))
            .between(Some(day(2024, 1, 1)), Some(day(2024, 1, 31)));
        let map = voucher_map();

        let once = filter_records(&vouchers(), &state, &map);
        let twice = filter_records(&once, &state, &map);
        assert_eq!(once, twice);

        // survivors keep their original relative order
        let dates: Vec<_> = once.iter().map(|r| r["date"].clone()).collect();
        assert_eq!(
            dates,
            vec![json!("2024-01-01"), json!("2024-01-10"), json!("2024-01-15")]
        );
    }

    #[test]
    fn missing_field_fails_an_active_exact_match() {
        let rows = super::super::record::records_from_response(json!([
            {"rep": "A"},
            {"other": 1},
        ]));
        let state = FilterState::default().select("rep", json!("A"));
        let rows = filter_records(&rows, &state, &voucher_map());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn numeric_selection_matches_numeric_field() {
        let rows = super::super::record::records_from_response(json!([
            {"customer": {"id": 7}},
            {"customer": {"id": 8}},
        ]));
        let map = FieldMap::default().slot("customer", "customer.id");
        let state = FilterState::default().select("customer", json!(7));
        assert_eq!(filter_records(&rows, &state, &map).len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let state = FilterState::default().select("rep", json!("A"));
        assert!(filter_records(&[], &state, &voucher_map()).is_empty());
    }
}
