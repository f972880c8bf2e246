//! Aggregation query engine.
//!
//! Produces the paginated, denormalized read views without duplicating
//! author or estate data in the write model: each query runs the store's
//! match/sort/window pipeline through a repository port, then joins the
//! referenced documents by batched id lookup. A reference that no longer
//! resolves — always possible mid-cascade, since deletes are sagas — shows
//! up as an absent joined side, never as a failed page.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest, Window};

use crate::domain::DomainResult;
use crate::domain::error::DomainError;
use crate::domain::estate::Estate;
use crate::domain::id::{PostId, UserId};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, EstateRepository, EstateRepositoryError,
    EstateSearch, EstateSearchFilter, ListingsQuery, PostRepository, PostRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::views::{CommentView, EstateSummary, PostView, UserSummary};

/// Aggregation query service implementing [`ListingsQuery`].
#[derive(Clone)]
pub struct ListingsQueryService<U, E, P, C> {
    users: Arc<U>,
    estates: Arc<E>,
    posts: Arc<P>,
    comments: Arc<C>,
}

impl<U, E, P, C> ListingsQueryService<U, E, P, C> {
    /// Create a new service over the four collection repositories.
    pub const fn new(users: Arc<U>, estates: Arc<E>, posts: Arc<P>, comments: Arc<C>) -> Self {
        Self {
            users,
            estates,
            posts,
            comments,
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> DomainError {
    DomainError::internal(format!("user store failure: {error}"))
}

fn map_estate_error(error: EstateRepositoryError) -> DomainError {
    DomainError::internal(format!("estate store failure: {error}"))
}

fn map_post_error(error: PostRepositoryError) -> DomainError {
    DomainError::internal(format!("post store failure: {error}"))
}

fn map_comment_error(error: CommentRepositoryError) -> DomainError {
    DomainError::internal(format!("comment store failure: {error}"))
}

fn page_window(page: i64, page_size: i64) -> DomainResult<Window> {
    PageRequest::new(page, page_size)
        .map(|request| request.window())
        .map_err(|err| DomainError::validation(err.to_string()))
}

fn raw_window(skip: i64, limit: i64) -> DomainResult<Window> {
    Window::new(skip, limit).map_err(|err| DomainError::validation(err.to_string()))
}

fn dedup<T: Clone + Eq + std::hash::Hash>(ids: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}

impl<U, E, P, C> ListingsQueryService<U, E, P, C>
where
    U: UserRepository,
    E: EstateRepository,
    P: PostRepository,
    C: CommentRepository,
{
    /// Batch-load the authors behind `ids` into a lookup map; ids that no
    /// longer resolve are simply absent from the map.
    async fn author_summaries(
        &self,
        ids: Vec<UserId>,
    ) -> DomainResult<HashMap<UserId, UserSummary>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self
            .users
            .find_many_by_ids(&ids)
            .await
            .map_err(map_user_error)?;
        Ok(users
            .iter()
            .map(|user| (user.id.clone(), UserSummary::from(user)))
            .collect())
    }
}

#[async_trait]
impl<U, E, P, C> ListingsQuery for ListingsQueryService<U, E, P, C>
where
    U: UserRepository,
    E: EstateRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn list_posts(
        &self,
        title_substring: Option<String>,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<PostView>> {
        let window = page_window(page, page_size)?;
        let (posts, total_length) = self
            .posts
            .search_by_title(title_substring, window)
            .await
            .map_err(map_post_error)?;

        let author_ids = dedup(posts.iter().map(|post| post.author_id.clone()));
        let estate_ids = dedup(posts.iter().filter_map(|post| post.estate_id.clone()));

        let authors = self.author_summaries(author_ids).await?;
        let estates: HashMap<_, _> = if estate_ids.is_empty() {
            HashMap::new()
        } else {
            self.estates
                .find_many_by_ids(&estate_ids)
                .await
                .map_err(map_estate_error)?
                .iter()
                .map(|estate| (estate.id.clone(), EstateSummary::from(estate)))
                .collect()
        };

        let data = posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                let estate = post
                    .estate_id
                    .as_ref()
                    .and_then(|id| estates.get(id).cloned());
                PostView { post, author, estate }
            })
            .collect();
        Ok(Page::new(data, total_length))
    }

    async fn list_comments_for_post(
        &self,
        post_id: &PostId,
        skip: i64,
        limit: i64,
    ) -> DomainResult<Page<CommentView>> {
        let window = raw_window(skip, limit)?;
        let (comments, total_length) = self
            .comments
            .page_by_post(post_id, window)
            .await
            .map_err(map_comment_error)?;

        let author_ids = dedup(comments.iter().map(|comment| comment.author_id.clone()));
        let authors = self.author_summaries(author_ids).await?;

        let data = comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                CommentView { comment, author }
            })
            .collect();
        Ok(Page::new(data, total_length))
    }

    async fn search_estates(
        &self,
        search: EstateSearch,
        skip: i64,
        limit: i64,
    ) -> DomainResult<Page<Estate>> {
        let window = raw_window(skip, limit)?;
        let filter = EstateSearchFilter {
            title_substring: search.title_substring,
            price_min: search.price_min,
            price_max: search.price_max,
            categories: search.categories,
            ..EstateSearchFilter::default()
        };
        let (data, total_length) = self
            .estates
            .search(&filter, window)
            .await
            .map_err(map_estate_error)?;
        Ok(Page::new(data, total_length))
    }

    async fn list_estates_for_user(
        &self,
        user_id: &UserId,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<Estate>> {
        let window = page_window(page, page_size)?;
        let filter = EstateSearchFilter {
            owner_id: Some(user_id.clone()),
            ..EstateSearchFilter::default()
        };
        let (data, total_length) = self
            .estates
            .search(&filter, window)
            .await
            .map_err(map_estate_error)?;
        Ok(Page::new(data, total_length))
    }

    async fn list_favorite_estates_for_user(
        &self,
        user_id: &UserId,
        page: i64,
        page_size: i64,
    ) -> DomainResult<Page<Estate>> {
        let window = page_window(page, page_size)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} does not exist")))?;

        if user.favorite_estate_ids.is_empty() {
            return Ok(Page::empty());
        }

        let filter = EstateSearchFilter {
            ids: Some(user.favorite_estate_ids),
            ..EstateSearchFilter::default()
        };
        let (data, total_length) = self
            .estates
            .search(&filter, window)
            .await
            .map_err(map_estate_error)?;
        Ok(Page::new(data, total_length))
    }
}

#[cfg(test)]
#[path = "query_service_tests.rs"]
mod tests;
