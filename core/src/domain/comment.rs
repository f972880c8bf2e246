//! Comment document model.
//!
//! A comment is a leaf in the reference graph: it is referenced by its
//! post's `comment_ids` and its author's `comment_ids` but owns no
//! references of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CommentId, PostId, UserId};

/// Validation errors for comment input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// The content was empty or whitespace-only.
    #[error("comment content must not be empty")]
    EmptyContent,
}

/// Comment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Document id.
    pub id: CommentId,
    /// Authoring user.
    pub author_id: UserId,
    /// Post the comment replies to.
    pub post_id: PostId,
    /// Comment body.
    pub content: String,
    /// Creation time, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
}

/// Author-supplied input for creating a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Authoring user.
    pub author_id: UserId,
    /// Post the comment replies to.
    pub post_id: PostId,
    /// Comment body.
    pub content: String,
}

impl NewComment {
    /// Check the creation invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CommentValidationError::EmptyContent`] when the body trims
    /// to nothing.
    pub fn validate(&self) -> Result<(), CommentValidationError> {
        if self.content.trim().is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        Ok(())
    }
}

impl Comment {
    /// Materialize a validated [`NewComment`] into a document.
    #[must_use]
    pub fn from_new(id: CommentId, new: NewComment, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id: new.author_id,
            post_id: new.post_id,
            content: new.content,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn validate_rejects_blank_content() {
        let new = NewComment {
            author_id: UserId::random(),
            post_id: PostId::random(),
            content: "  ".to_owned(),
        };
        assert_eq!(
            new.validate().expect_err("blank content"),
            CommentValidationError::EmptyContent
        );
    }

    #[rstest]
    fn from_new_preserves_edges() {
        let author_id = UserId::random();
        let post_id = PostId::random();
        let comment = Comment::from_new(
            CommentId::random(),
            NewComment {
                author_id: author_id.clone(),
                post_id: post_id.clone(),
                content: "The area is quiet after ten.".to_owned(),
            },
            Utc::now(),
        );
        assert_eq!(comment.author_id, author_id);
        assert_eq!(comment.post_id, post_id);
    }
}
