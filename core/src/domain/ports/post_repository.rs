//! Port for the posts collection.
//!
//! Per-document CRUD plus the two pipeline queries the forum needs: a
//! windowed title search counted before pagination, and the unwindowed
//! estate-scoped fetch used by cascading deletes.

use async_trait::async_trait;
use pagination::Window;

use crate::domain::id::{EstateId, PostId};
use crate::domain::post::Post;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post repository query failed: {message}",
    }
}

/// Port for post document storage, retrieval, and search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch a post by id. Returns `None` when the id names no document.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Insert a new post document.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Replace an existing post document wholesale.
    async fn save(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Delete a post document. Returns whether a document was removed.
    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError>;

    /// Fetch every post that discusses the given estate, unwindowed.
    ///
    /// Used by the estate delete cascade, which must visit every child.
    async fn find_by_estate(&self, estate_id: &EstateId)
    -> Result<Vec<Post>, PostRepositoryError>;

    /// Run the title search pipeline: case-insensitive substring match when
    /// a needle is present, sort newest-first, apply the window, and return
    /// the slice together with the pre-pagination match count.
    async fn search_by_title(
        &self,
        title_substring: Option<String>,
        window: Window,
    ) -> Result<(Vec<Post>, u64), PostRepositoryError>;
}

/// Fixture implementation for tests that do not exercise post storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostRepository;

#[async_trait]
impl PostRepository for FixturePostRepository {
    async fn find_by_id(&self, _id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _post: &Post) -> Result<(), PostRepositoryError> {
        Ok(())
    }

    async fn save(&self, _post: &Post) -> Result<(), PostRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &PostId) -> Result<bool, PostRepositoryError> {
        Ok(false)
    }

    async fn find_by_estate(
        &self,
        _estate_id: &EstateId,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        Ok(Vec::new())
    }

    async fn search_by_title(
        &self,
        _title_substring: Option<String>,
        _window: Window,
    ) -> Result<(Vec<Post>, u64), PostRepositoryError> {
        Ok((Vec::new(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_finds_no_posts_for_an_estate() {
        let repo = FixturePostRepository;
        let posts = repo
            .find_by_estate(&EstateId::random())
            .await
            .expect("fixture fetch succeeds");
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn fixture_repository_title_search_returns_empty_page() {
        let repo = FixturePostRepository;
        let window = Window::new(0, 10).expect("valid window");
        let (posts, total) = repo
            .search_by_title(Some("loft".to_owned()), window)
            .await
            .expect("fixture search succeeds");
        assert!(posts.is_empty());
        assert_eq!(total, 0);
    }

    #[rstest]
    fn error_constructors_format_messages() {
        let error = PostRepositoryError::query("index missing");
        assert_eq!(error.to_string(), "post repository query failed: index missing");
    }
}
