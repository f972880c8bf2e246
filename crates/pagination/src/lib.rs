//! Pagination envelope and window primitives shared by Courtyard services.
//!
//! Two request shapes exist because callers address pages in two ways:
//! [`PageRequest`] is the 1-based page/page-size form used by listing
//! endpoints, while [`Window`] is the raw skip/limit form handed to the
//! store. A [`PageRequest`] lowers into a [`Window`] via
//! [`PageRequest::window`].
//!
//! The response side is always a [`Page`]: the items of the requested slice
//! plus `total_length`, the count of every match before pagination was
//! applied.

use serde::{Deserialize, Serialize};

/// Validation failures raised while constructing pagination inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are 1-based; zero and negatives are rejected.
    #[error("page must be at least 1, got {page}")]
    NonPositivePage {
        /// The rejected page number.
        page: i64,
    },
    /// A page must hold at least one item.
    #[error("page size must be at least 1, got {page_size}")]
    NonPositivePageSize {
        /// The rejected page size.
        page_size: i64,
    },
    /// Skip counts documents from the start of the result set.
    #[error("skip must not be negative, got {skip}")]
    NegativeSkip {
        /// The rejected skip.
        skip: i64,
    },
    /// A window must admit at least one item.
    #[error("limit must be at least 1, got {limit}")]
    NonPositiveLimit {
        /// The rejected limit.
        limit: i64,
    },
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NonPositivePage`] when `page < 1` and
    /// [`PaginationError::NonPositivePageSize`] when `page_size < 1`.
    pub fn new(page: i64, page_size: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::NonPositivePage { page });
        }
        if page_size < 1 {
            return Err(PaginationError::NonPositivePageSize { page_size });
        }
        #[allow(clippy::cast_sign_loss, reason = "both values checked positive above")]
        Ok(Self {
            page: page as u64,
            page_size: page_size as u64,
        })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// The number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Lower into the skip/limit form: skip `(page - 1) * page_size`, limit
    /// `page_size`.
    #[must_use]
    pub const fn window(&self) -> Window {
        Window {
            skip: (self.page - 1) * self.page_size,
            limit: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequestDto {
    page: i64,
    page_size: i64,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        #[allow(clippy::cast_possible_wrap, reason = "values bounded by validated i64 inputs")]
        Self {
            page: value.page as i64,
            page_size: value.page_size as i64,
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}

/// A validated skip/limit window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "WindowDto", into = "WindowDto")]
pub struct Window {
    skip: u64,
    limit: u64,
}

impl Window {
    /// Validate and construct a window.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NegativeSkip`] when `skip < 0` and
    /// [`PaginationError::NonPositiveLimit`] when `limit < 1`.
    pub fn new(skip: i64, limit: i64) -> Result<Self, PaginationError> {
        if skip < 0 {
            return Err(PaginationError::NegativeSkip { skip });
        }
        if limit < 1 {
            return Err(PaginationError::NonPositiveLimit { limit });
        }
        #[allow(clippy::cast_sign_loss, reason = "both values checked non-negative above")]
        Ok(Self {
            skip: skip as u64,
            limit: limit as u64,
        })
    }

    /// Documents to pass over before collecting.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        self.skip
    }

    /// Maximum number of documents to collect.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowDto {
    skip: i64,
    limit: i64,
}

impl From<Window> for WindowDto {
    fn from(value: Window) -> Self {
        #[allow(clippy::cast_possible_wrap, reason = "values bounded by validated i64 inputs")]
        Self {
            skip: value.skip as i64,
            limit: value.limit as i64,
        }
    }
}

impl TryFrom<WindowDto> for Window {
    type Error = PaginationError;

    fn try_from(value: WindowDto) -> Result<Self, Self::Error> {
        Self::new(value.skip, value.limit)
    }
}

/// Paginated response envelope: one slice of data plus the pre-pagination
/// match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items of the requested slice, in result order.
    pub data: Vec<T>,
    /// Count of all matching items before skip/limit was applied.
    pub total_length: u64,
}

impl<T> Page<T> {
    /// Wrap a slice of results and its pre-pagination total.
    #[must_use]
    pub const fn new(data: Vec<T>, total_length: u64) -> Self {
        Self { data, total_length }
    }

    /// The empty page: no data, zero total. Not an error.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_length: 0,
        }
    }

    /// Map the data items while preserving the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total_length: self.total_length,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 5, 0)]
    #[case(2, 5, 5)]
    #[case(3, 7, 14)]
    fn page_request_lowers_to_expected_skip(
        #[case] page: i64,
        #[case] page_size: i64,
        #[case] expected_skip: u64,
    ) {
        let request = PageRequest::new(page, page_size).expect("valid request");
        let window = request.window();
        assert_eq!(window.skip(), expected_skip);
        assert_eq!(window.limit(), request.page_size());
    }

    #[rstest]
    #[case(0, 5)]
    #[case(-1, 5)]
    fn page_request_rejects_non_positive_page(#[case] page: i64, #[case] page_size: i64) {
        let error = PageRequest::new(page, page_size).expect_err("page must be rejected");
        assert_eq!(error, PaginationError::NonPositivePage { page });
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn page_request_rejects_non_positive_page_size(#[case] page_size: i64) {
        let error = PageRequest::new(1, page_size).expect_err("page size must be rejected");
        assert_eq!(error, PaginationError::NonPositivePageSize { page_size });
    }

    #[rstest]
    fn window_rejects_negative_skip() {
        let error = Window::new(-1, 10).expect_err("skip must be rejected");
        assert_eq!(error, PaginationError::NegativeSkip { skip: -1 });
    }

    #[rstest]
    #[case(0)]
    #[case(-10)]
    fn window_rejects_non_positive_limit(#[case] limit: i64) {
        let error = Window::new(0, limit).expect_err("limit must be rejected");
        assert_eq!(error, PaginationError::NonPositiveLimit { limit });
    }

    #[rstest]
    fn page_serializes_with_camel_case_total() {
        let page = Page::new(vec![1, 2, 3], 10);
        let value = serde_json::to_value(&page).expect("page serializes");
        assert_eq!(value["totalLength"], 10);
        assert_eq!(value["data"].as_array().map(Vec::len), Some(3));
    }

    #[rstest]
    fn empty_page_has_zero_total() {
        let page: Page<u8> = Page::empty();
        assert!(page.data.is_empty());
        assert_eq!(page.total_length, 0);
    }

    #[rstest]
    fn map_preserves_total_length() {
        let page = Page::new(vec![1_u32, 2, 3], 42).map(|n| n * 2);
        assert_eq!(page.data, vec![2, 4, 6]);
        assert_eq!(page.total_length, 42);
    }

    #[rstest]
    fn page_request_round_trips_through_serde() {
        let request = PageRequest::new(2, 25).expect("valid request");
        let json = serde_json::to_string(&request).expect("serializes");
        let back: PageRequest = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, request);
    }

    #[rstest]
    fn page_request_rejects_invalid_serde_input() {
        let result: Result<PageRequest, _> = serde_json::from_str(r#"{"page":0,"pageSize":5}"#);
        assert!(result.is_err());
    }
}
