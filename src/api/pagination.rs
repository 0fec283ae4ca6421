use serde::Serialize;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: i64 = 6;
pub const MIN_LIMIT: i64 = 6;
pub const MAX_LIMIT: i64 = 9;

/// Apply defaults and validate the raw page/limit query values.
/// Returns the effective (page, limit) pair.
pub fn resolve(page: Option<i64>, limit: Option<i64>) -> Result<(i64, i64), ApiError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::bad_request(format!(
            "Limit must be between {} and {}",
            MIN_LIMIT, MAX_LIMIT
        )));
    }
    if page < 1 {
        return Err(ApiError::bad_request("Page must be 1 or greater"));
    }

    Ok((page, limit))
}

/// Number of documents to skip for the requested page
pub fn offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// Page metadata returned alongside every listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(resolve(None, None).unwrap(), (1, DEFAULT_LIMIT));
        assert_eq!(resolve(Some(3), Some(9)).unwrap(), (3, 9));
    }

    #[test]
    fn limit_outside_range_is_rejected() {
        for limit in [0, 1, 5, 10, 100, -6] {
            let err = resolve(None, Some(limit)).unwrap_err();
            assert_eq!(err.status_code(), 400, "limit {} should be rejected", limit);
        }
        for limit in MIN_LIMIT..=MAX_LIMIT {
            assert!(resolve(None, Some(limit)).is_ok());
        }
    }

    #[test]
    fn page_below_one_is_rejected() {
        assert_eq!(resolve(Some(0), None).unwrap_err().status_code(), 400);
        assert_eq!(resolve(Some(-2), None).unwrap_err().status_code(), 400);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(offset(1, 6), 0);
        assert_eq!(offset(2, 6), 6);
        assert_eq!(offset(4, 9), 27);
    }

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(Pagination::new(0, 1, 6).total_pages, 0);
        assert_eq!(Pagination::new(6, 1, 6).total_pages, 1);
        assert_eq!(Pagination::new(7, 1, 6).total_pages, 2);
        assert_eq!(Pagination::new(54, 1, 9).total_pages, 6);
    }

    #[test]
    fn next_and_prev_flags_track_position() {
        let first = Pagination::new(20, 1, 6);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let middle = Pagination::new(20, 2, 6);
        assert!(middle.has_next_page);
        assert!(middle.has_prev_page);

        let last = Pagination::new(20, 4, 6);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }
}
