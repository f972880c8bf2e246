//! Forum post document model.
//!
//! A post is authored by a user and optionally discusses an estate. Its
//! `comment_ids` list is the inverse side of `comment.post_id` and is
//! mutated exclusively by the reference graph service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CommentId, EstateId, PostId, UserId};

/// Validation errors for post input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The title was empty or whitespace-only.
    #[error("post title must not be empty")]
    EmptyTitle,
    /// The content was empty or whitespace-only.
    #[error("post content must not be empty")]
    EmptyContent,
}

/// Forum post document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Document id.
    pub id: PostId,
    /// Authoring user.
    pub author_id: UserId,
    /// Estate this post discusses, when any.
    pub estate_id: Option<EstateId>,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Ids of comments under this post.
    pub comment_ids: Vec<CommentId>,
    /// Creation time, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
}

/// Author-supplied input for creating a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Authoring user.
    pub author_id: UserId,
    /// Estate the post discusses, when any.
    pub estate_id: Option<EstateId>,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
}

impl NewPost {
    /// Check the creation invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`PostValidationError`].
    pub fn validate(&self) -> Result<(), PostValidationError> {
        if self.title.trim().is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        Ok(())
    }
}

impl Post {
    /// Materialize a validated [`NewPost`] into a document.
    #[must_use]
    pub fn from_new(id: PostId, new: NewPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id: new.author_id,
            estate_id: new.estate_id,
            title: new.title,
            content: new.content,
            comment_ids: Vec::new(),
            created_at,
        }
    }
}

/// Author-controlled field updates for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    /// Replacement title, when present.
    pub title: Option<String>,
    /// Replacement body, when present.
    pub content: Option<String>,
}

impl PostUpdate {
    /// Apply the update to a post document.
    ///
    /// # Errors
    ///
    /// Returns a [`PostValidationError`] when a replacement value trims to
    /// nothing; the document is untouched on failure.
    pub fn apply(&self, post: &mut Post) -> Result<(), PostValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(PostValidationError::EmptyTitle);
            }
        }
        if let Some(content) = &self.content {
            if content.trim().is_empty() {
                return Err(PostValidationError::EmptyContent);
            }
        }

        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_new_post() -> NewPost {
        NewPost {
            author_id: UserId::random(),
            estate_id: None,
            title: "Is the riverside area quiet?".to_owned(),
            content: "Considering a move, curious about night noise.".to_owned(),
        }
    }

    #[rstest]
    fn validate_accepts_well_formed_posts() {
        assert!(sample_new_post().validate().is_ok());
    }

    #[rstest]
    fn validate_rejects_blank_titles() {
        let mut new = sample_new_post();
        new.title = " ".to_owned();
        assert_eq!(
            new.validate().expect_err("blank title"),
            PostValidationError::EmptyTitle
        );
    }

    #[rstest]
    fn validate_rejects_blank_content() {
        let mut new = sample_new_post();
        new.content = String::new();
        assert_eq!(
            new.validate().expect_err("blank content"),
            PostValidationError::EmptyContent
        );
    }

    #[rstest]
    fn from_new_starts_with_no_comments() {
        let post = Post::from_new(PostId::random(), sample_new_post(), Utc::now());
        assert!(post.comment_ids.is_empty());
        assert!(post.estate_id.is_none());
    }

    #[rstest]
    fn update_applies_only_present_fields() {
        let mut post = Post::from_new(PostId::random(), sample_new_post(), Utc::now());
        let update = PostUpdate {
            title: None,
            content: Some("Edited: answered my own question.".to_owned()),
        };

        update.apply(&mut post).expect("update applies");
        assert_eq!(post.title, "Is the riverside area quiet?");
        assert_eq!(post.content, "Edited: answered my own question.");
    }
}
