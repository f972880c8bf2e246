//! Port for the comments collection.
//!
//! Per-document CRUD plus the post-scoped queries: the unwindowed fetch
//! used by cascading deletes and the windowed, counted page used by the
//! comment listing.

use async_trait::async_trait;
use pagination::Window;

use crate::domain::comment::Comment;
use crate::domain::id::{CommentId, PostId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
    }
}

/// Port for comment document storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Fetch a comment by id. Returns `None` when the id names no document.
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Insert a new comment document.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Replace an existing comment document wholesale.
    async fn save(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Delete a comment document. Returns whether a document was removed.
    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError>;

    /// Fetch every comment under the given post, unwindowed.
    ///
    /// Used by the post delete cascade, which must visit every child.
    async fn find_by_post(&self, post_id: &PostId)
    -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Page over the comments under a post, newest-first, returning the
    /// slice together with the pre-pagination match count.
    async fn page_by_post(
        &self,
        post_id: &PostId,
        window: Window,
    ) -> Result<(Vec<Comment>, u64), CommentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise comment storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn find_by_id(
        &self,
        _id: &CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _comment: &Comment) -> Result<(), CommentRepositoryError> {
        Ok(())
    }

    async fn save(&self, _comment: &Comment) -> Result<(), CommentRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &CommentId) -> Result<bool, CommentRepositoryError> {
        Ok(false)
    }

    async fn find_by_post(
        &self,
        _post_id: &PostId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(Vec::new())
    }

    async fn page_by_post(
        &self,
        _post_id: &PostId,
        _window: Window,
    ) -> Result<(Vec<Comment>, u64), CommentRepositoryError> {
        Ok((Vec::new(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_finds_no_comments_for_a_post() {
        let repo = FixtureCommentRepository;
        let comments = repo
            .find_by_post(&PostId::random())
            .await
            .expect("fixture fetch succeeds");
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn fixture_repository_page_returns_empty_slice() {
        let repo = FixtureCommentRepository;
        let window = Window::new(5, 10).expect("valid window");
        let (comments, total) = repo
            .page_by_post(&PostId::random(), window)
            .await
            .expect("fixture page succeeds");
        assert!(comments.is_empty());
        assert_eq!(total, 0);
    }

    #[rstest]
    fn error_constructors_format_messages() {
        let error = CommentRepositoryError::connection("timed out");
        assert_eq!(
            error.to_string(),
            "comment repository connection failed: timed out"
        );
    }
}
