use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use super::record::{key_string, resolve_path, Record};

/// One selectable filter choice derived from the loaded records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: Value,
}

/// Derive the distinct set of selectable values for a filter dropdown.
///
/// Records whose key resolves to null, missing or an empty string are
/// skipped. Values are deduplicated by their canonical string; the first
/// occurrence wins the label, and first-seen order is preserved. When
/// `label_path` is omitted the key's own string doubles as the label
/// (e.g. a rep's name serving as both id and display text).
pub fn extract_options(
    records: &[Record],
    key_path: &str,
    label_path: Option<&str>,
) -> Vec<FilterOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    for record in records {
        let Some(value) = resolve_path(record, key_path) else {
            continue;
        };
        let Some(key) = key_string(value) else {
            continue;
        };
        if !seen.insert(key.clone()) {
            continue;
        }

        let label = label_path
            .and_then(|path| resolve_path(record, path))
            .and_then(key_string)
            .unwrap_or(key);

        options.push(FilterOption {
            label,
            value: value.clone(),
        });
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        super::super::record::records_from_response(value)
    }

    #[test]
    fn dedupes_and_preserves_first_seen_order() {
        let rows = records(json!([
            {"rep": "A", "amount": 100},
            {"rep": "B", "amount": 50},
            {"rep": "A", "amount": null},
        ]));

        let options = extract_options(&rows, "rep", None);
        assert_eq!(
            options,
            vec![
                FilterOption { label: "A".into(), value: json!("A") },
                FilterOption { label: "B".into(), value: json!("B") },
            ]
        );
    }

    #[test]
    fn no_two_options_share_a_value() {
        let rows = records(json!([
            {"currency": {"code": "YER", "name": "Rial"}},
            {"currency": {"code": "USD", "name": "Dollar"}},
            {"currency": {"code": "YER", "name": "Rial (again)"}},
        ]));

        let options = extract_options(&rows, "currency.code", Some("currency.name"));
        let mut values: Vec<_> = options
            .iter()
            .map(|o| o.value.as_str().unwrap().to_string())
            .collect();
        let before = values.len();
        values.dedup();
        assert_eq!(before, values.len());
        // first occurrence wins the label
        assert_eq!(options[0].label, "Rial");
    }

    #[test]
    fn skips_absent_and_empty_keys() {
        let rows = records(json!([
            {"rep": ""},
            {"rep": null},
            {"other": 1},
            {"rep": "C"},
        ]));

        let options = extract_options(&rows, "rep", None);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, json!("C"));
    }

    #[test]
    fn numeric_keys_keep_their_raw_value() {
        let rows = records(json!([
            {"customer": {"id": 7, "name": "Acme"}},
            {"customer": {"id": 7, "name": "Acme dup"}},
        ]));

        let options = extract_options(&rows, "customer.id", Some("customer.name"));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, json!(7));
        assert_eq!(options[0].label, "Acme");
    }

    #[test]
    fn empty_input_yields_empty_options() {
        assert!(extract_options(&[], "rep", None).is_empty());
    }
}
