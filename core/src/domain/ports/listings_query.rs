//! Driving port for aggregation queries.
//!
//! Paginated, filtered, join-by-lookup read views. Pagination inputs arrive
//! raw (`page`/`page_size` 1-based, or `skip`/`limit`) and are validated by
//! the engine, which fails `Validation` on non-positive sizes. Every page
//! carries `total_length`, the count of all matches before pagination.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::DomainResult;
use crate::domain::estate::{Estate, EstateCategory};
use crate::domain::id::{PostId, UserId};
use crate::domain::views::{CommentView, PostView};

/// Caller-facing estate search criteria.
///
/// All criteria compose conjunctively; absent fields match everything and
/// an empty `categories` list applies no category filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstateSearch {
    /// Case-insensitive substring match on the title.
    pub title_substring: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
    /// Category set membership; empty means no filter.
    pub categories: Vec<EstateCategory>,
}

/// Driving port over the aggregation query engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// List posts newest-first, optionally filtered by a case-insensitive
    /// title substring, joined with author and optional estate.
    ///
    /// `page` is 1-based. Fails `Validation` when `page < 1` or
    /// `page_size < 1`.
    async fn list_posts(
        &self,
        title_substring: Option<String>,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<PostView>>;

    /// List the comments under a post newest-first, joined with author.
    ///
    /// Fails `Validation` when `skip < 0` or `limit < 1`.
    async fn list_comments_for_post(
        &self,
        post_id: &PostId,
        skip: i64,
        limit: i64,
    ) -> DomainResult<Page<CommentView>>;

    /// Search estates newest-first with conjunctive optional filters.
    ///
    /// Fails `Validation` when `skip < 0` or `limit < 1`.
    async fn search_estates(
        &self,
        search: EstateSearch,
        skip: i64,
        limit: i64,
    ) -> DomainResult<Page<Estate>>;

    /// List the estates owned by a user, newest-first.
    async fn list_estates_for_user(
        &self,
        user_id: &UserId,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<Estate>>;

    /// List the estates a user has favorited, newest-first.
    ///
    /// Fails `NotFound` when the user does not exist; favorites that no
    /// longer resolve are omitted from the page and the total.
    async fn list_favorite_estates_for_user(
        &self,
        user_id: &UserId,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<Estate>>;
}
