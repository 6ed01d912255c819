use chrono::NaiveDate;

use super::record::{parse_record_date, resolve_path, Record};

/// Default bounds for a report's date filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Seed the default date filter range from the loaded records.
///
/// `from` is the earliest parseable date in the set (unparseable dates
/// are ignored); with no valid dates it falls back to `today`. `to` is
/// always `today`, never the latest record date. The caller supplies
/// `today` since "now" is the one ambient input the engine has.
pub fn detect_default_range(records: &[Record], date_path: &str, today: NaiveDate) -> DateRange {
    let earliest = records
        .iter()
        .filter_map(|record| resolve_path(record, date_path))
        .filter_map(parse_record_date)
        .min();

    DateRange {
        from: earliest.unwrap_or(today),
        to: today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn finds_earliest_and_defaults_to_today() {
        let rows = super::super::record::records_from_response(json!([
            {"date": "2024-01-10"},
            {"date": "2024-01-01"},
            {"date": "bad-date"},
        ]));

        let range = detect_default_range(&rows, "date", day(2024, 6, 1));
        assert_eq!(range.from, day(2024, 1, 1));
        assert_eq!(range.to, day(2024, 6, 1));
        assert_eq!(range.from.to_string(), "2024-01-01");
    }

    #[test]
    fn upper_bound_ignores_future_records() {
        let rows = super::super::record::records_from_response(json!([
            {"date": "2030-12-31"},
        ]));

        let range = detect_default_range(&rows, "date", day(2024, 6, 1));
        // `from` tracks the data, `to` stays pinned to today
        assert_eq!(range.from, day(2030, 12, 31));
        assert_eq!(range.to, day(2024, 6, 1));
    }

    #[test]
    fn empty_or_unparseable_set_collapses_to_today() {
        let today = day(2026, 8, 7);
        let range = detect_default_range(&[], "date", today);
        assert_eq!(range, DateRange { from: today, to: today });

        let rows = super::super::record::records_from_response(json!([
            {"date": "not a date"},
            {"other": 1},
        ]));
        let range = detect_default_range(&rows, "date", today);
        assert_eq!(range, DateRange { from: today, to: today });
    }
}
