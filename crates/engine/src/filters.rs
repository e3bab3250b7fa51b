//! Defensive parsing for dashboard filter values.
//!
//! Every value arrives from the query string as free text. Nothing here ever
//! errors: unparseable tokens are discarded and missing values fall back to
//! defaults, matching the leniency the dashboard UI expects.

use uuid::Uuid;

use crate::period::month_from_name;

/// Page size used when the `limit` parameter is absent or unusable.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Read filter shared by the four dashboard operations and the resource
/// list endpoints. `month` and `year` stay raw; the period resolver expands
/// them on use.
#[derive(Clone, Debug, Default)]
pub struct DashboardFilter {
    pub user_id: Option<Uuid>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl DashboardFilter {
    /// Builds a filter from raw query-string values.
    #[must_use]
    pub fn from_raw(user_id: Option<&str>, month: Option<&str>, year: Option<&str>) -> Self {
        Self {
            user_id: parse_user_id(user_id),
            month: month.map(ToString::to_string),
            year: year.map(ToString::to_string),
        }
    }
}

/// A resolved pagination request (0-based page index).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub index: u64,
    pub size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            index: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Parses the `init` (page index) and `limit` (page size) parameters.
    #[must_use]
    pub fn from_raw(init: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            index: parse_page_index(init),
            size: parse_page_size(limit),
        }
    }
}

/// Comma-separated integer years; invalid tokens are dropped.
#[must_use]
pub fn parse_year_list(value: Option<&str>) -> Vec<i32> {
    let Some(value) = value else {
        return Vec::new();
    };
    value
        .split(',')
        .filter_map(|token| token.trim().parse::<i32>().ok())
        .collect()
}

/// Comma-separated month names; unknown names are dropped.
#[must_use]
pub fn parse_month_list(value: Option<&str>) -> Vec<u32> {
    let Some(value) = value else {
        return Vec::new();
    };
    value.split(',').filter_map(month_from_name).collect()
}

/// 0-based page index; anything unusable means the first page.
#[must_use]
pub fn parse_page_index(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Page size; zero or unusable input falls back to [`DEFAULT_PAGE_SIZE`].
#[must_use]
pub fn parse_page_size(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Optional user id; malformed UUIDs behave as "no user filter".
#[must_use]
pub fn parse_user_id(value: Option<&str>) -> Option<Uuid> {
    value.and_then(|v| Uuid::parse_str(v.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_list_drops_invalid_tokens() {
        assert_eq!(parse_year_list(Some("2024, 2025")), vec![2024, 2025]);
        assert_eq!(parse_year_list(Some("abc,2024,")), vec![2024]);
        assert_eq!(parse_year_list(Some("abc")), Vec::<i32>::new());
        assert_eq!(parse_year_list(None), Vec::<i32>::new());
    }

    #[test]
    fn month_list_maps_names_case_insensitively() {
        assert_eq!(
            parse_month_list(Some("Janeiro, MARÇO,dezembro")),
            vec![1, 3, 12]
        );
        assert_eq!(parse_month_list(Some("smarch")), Vec::<u32>::new());
    }

    #[test]
    fn page_parsing_never_fails() {
        assert_eq!(parse_page_index(Some("2")), 2);
        assert_eq!(parse_page_index(Some("two")), 0);
        assert_eq!(parse_page_index(None), 0);
        assert_eq!(parse_page_size(Some("25")), 25);
        assert_eq!(parse_page_size(Some("0")), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size(Some("-3")), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size(None), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn user_id_parses_or_disappears() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(Some(&id.to_string())), Some(id));
        assert_eq!(parse_user_id(Some("not-a-uuid")), None);
        assert_eq!(parse_user_id(None), None);
    }
}
