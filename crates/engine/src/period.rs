//! Calendar period resolution for dashboard filters.
//!
//! A filter may name several months and several years (free text, comma
//! separated). The resolver expands the Cartesian product of both lists into
//! half-open month ranges `[gte, lt)`, falling back to the current month and
//! year when nothing valid was supplied. Unparseable input never errors: the
//! filters come from a free-text UI and leniency is deliberate.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::filters::{parse_month_list, parse_year_list};

/// Lookup keys for the filter input, lowercase Portuguese month names.
pub const MONTH_KEYS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Display names for chart rows, indexed by `month - 1`.
pub const MONTH_DISPLAY: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Maps a month name (case-insensitive) to its 1-based number.
#[must_use]
pub fn month_from_name(name: &str) -> Option<u32> {
    let needle = name.trim().to_lowercase();
    MONTH_KEYS
        .iter()
        .position(|key| *key == needle)
        .map(|index| index as u32 + 1)
}

/// Maps a 1-based month number to its display name.
#[must_use]
pub fn month_display_name(month: u32) -> Option<&'static str> {
    MONTH_DISPLAY.get(month.checked_sub(1)? as usize).copied()
}

/// A half-open `[gte, lt)` interval covering exactly one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodRange {
    pub gte: DateTime<Utc>,
    pub lt: DateTime<Utc>,
}

impl PeriodRange {
    /// Builds the range for a (year, month) pair, handling the December to
    /// January rollover. Returns `None` for dates chrono cannot represent.
    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<PeriodRange> {
        let gte = first_instant_of_month(year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year.checked_add(1)?, 1)
        } else {
            (year, month + 1)
        };
        let lt = first_instant_of_month(next_year, next_month)?;
        Some(PeriodRange { gte, lt })
    }
}

fn first_instant_of_month(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Expands the filter into (year, month) pairs: years outer, months inner,
/// both in filter-supplied order. Defaults to the current year and month.
#[must_use]
pub fn resolve_year_months(
    month: Option<&str>,
    year: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<(i32, u32)> {
    let mut years = parse_year_list(year);
    if years.is_empty() {
        years.push(now.year());
    }
    let mut months = parse_month_list(month);
    if months.is_empty() {
        months.push(now.month());
    }

    let mut pairs = Vec::with_capacity(years.len() * months.len());
    for year in &years {
        for month in &months {
            pairs.push((*year, *month));
        }
    }
    pairs
}

/// Expands the filter into month ranges, OR-combined by callers.
///
/// Always returns at least one range: pairs with no valid calendar
/// representation are discarded, and if nothing survives the current month is
/// used.
#[must_use]
pub fn resolve_periods(
    month: Option<&str>,
    year: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<PeriodRange> {
    let ranges: Vec<PeriodRange> = resolve_year_months(month, year, now)
        .into_iter()
        .filter_map(|(year, month)| PeriodRange::month(year, month))
        .collect();

    if ranges.is_empty() {
        return PeriodRange::month(now.year(), now.month())
            .into_iter()
            .collect();
    }
    ranges
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn month_table_is_bidirectional() {
        for (index, key) in MONTH_KEYS.iter().enumerate() {
            let month = index as u32 + 1;
            assert_eq!(month_from_name(key), Some(month));
            assert_eq!(
                month_from_name(&key.to_uppercase()),
                Some(month),
                "lookup must be case-insensitive"
            );
            assert!(month_display_name(month).is_some());
        }
        assert_eq!(month_from_name("januari"), None);
        assert_eq!(month_display_name(0), None);
        assert_eq!(month_display_name(13), None);
    }

    #[test]
    fn empty_filter_resolves_to_current_month() {
        let now = at(2025, 8, 15);
        let periods = resolve_periods(None, None, now);
        assert_eq!(
            periods,
            vec![PeriodRange {
                gte: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
                lt: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
            }]
        );
    }

    #[test]
    fn month_list_expands_to_one_range_each() {
        let now = at(2025, 8, 15);
        let periods = resolve_periods(Some("janeiro,fevereiro"), Some("2024"), now);
        assert_eq!(
            periods,
            vec![
                PeriodRange {
                    gte: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    lt: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                },
                PeriodRange {
                    gte: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                    lt: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                },
            ]
        );
    }

    #[test]
    fn december_rolls_over_to_next_january() {
        let range = PeriodRange::month(2024, 12).unwrap();
        assert_eq!(range.gte, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(range.lt, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn garbage_input_falls_back_to_current_month() {
        let now = at(2025, 8, 15);
        let periods = resolve_periods(Some("brumário,nonésimo"), Some("abc,,"), now);
        assert_eq!(periods, resolve_periods(None, None, now));
    }

    #[test]
    fn cartesian_product_keeps_filter_order() {
        let now = at(2025, 8, 15);
        let pairs = resolve_year_months(Some("março,janeiro"), Some("2025,2024"), now);
        assert_eq!(
            pairs,
            vec![(2025, 3), (2025, 1), (2024, 3), (2024, 1)]
        );
    }
}
