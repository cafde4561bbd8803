//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum records to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// The rows a query should skip and return for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// The maximum number of rows to return, `None` for no limit.
    pub limit: Option<u64>,
    /// The number of rows to skip.
    pub offset: u64,
}

impl PageWindow {
    /// A window that returns every row.
    pub const ALL: Self = Self {
        limit: None,
        offset: 0,
    };

    /// The window for the 1-based `page` of `page_size` rows.
    ///
    /// Page 0 is treated as page 1. A page size of 0 means no limit, in which
    /// case every row from the start is returned.
    pub fn new(page: u64, page_size: u64) -> Self {
        if page_size == 0 {
            return Self::ALL;
        }

        let page = page.max(1);

        Self {
            limit: Some(page_size),
            offset: (page - 1).saturating_mul(page_size),
        }
    }

    /// The window as `(LIMIT, OFFSET)` values for SQLite, where a negative
    /// limit means no limit.
    pub(crate) fn sql_limit_offset(&self) -> (i64, i64) {
        let limit = self
            .limit
            .map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX));
        let offset = i64::try_from(self.offset).unwrap_or(i64::MAX);

        (limit, offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::PageWindow;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(
            PageWindow::new(1, 10),
            PageWindow {
                limit: Some(10),
                offset: 0
            }
        );
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(
            PageWindow::new(3, 10),
            PageWindow {
                limit: Some(10),
                offset: 20
            }
        );
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(PageWindow::new(0, 5), PageWindow::new(1, 5));
    }

    #[test]
    fn zero_page_size_means_no_limit() {
        assert_eq!(PageWindow::new(4, 0), PageWindow::ALL);
        assert_eq!(PageWindow::ALL.sql_limit_offset(), (-1, 0));
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        let window = PageWindow::new(u64::MAX, u64::MAX);

        assert_eq!(window.offset, u64::MAX);
        assert_eq!(window.sql_limit_offset(), (i64::MAX, i64::MAX));
    }
}
