//! Driving port for reference graph mutation.
//!
//! This is the only surface through which callers create, update, or delete
//! documents that participate in the reference graph. Every operation keeps
//! both sides of each edge consistent within the same logical operation and
//! returns the uniform domain result; deletions cascade children-first.

use async_trait::async_trait;

use crate::domain::DomainResult;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::estate::{Estate, EstateUpdate, NewEstate};
use crate::domain::id::{CommentId, EstateId, PostId, UserId};
use crate::domain::policy::FavoriteDecision;
use crate::domain::post::{NewPost, Post, PostUpdate};

/// Driving port over the reference graph manager.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceGraphCommand: Send + Sync {
    /// Validate and create an estate, linking it into the owner's
    /// `estate_ids`.
    ///
    /// Fails `Validation` on a bad input (empty title, negative price,
    /// missing floor number on a non-standalone category) and `NotFound`
    /// when the owner does not exist.
    async fn create_estate(&self, new: NewEstate) -> DomainResult<Estate>;

    /// Apply owner-controlled field updates to an estate.
    ///
    /// Fails `Forbidden` when `actor` is not the owner.
    async fn update_estate(
        &self,
        actor: &UserId,
        estate_id: &EstateId,
        update: EstateUpdate,
    ) -> DomainResult<Estate>;

    /// Delete an estate and cascade: every post discussing it (and their
    /// comments) is deleted, the owner's `estate_ids` and every favoriting
    /// user's `favorite_estate_ids` are pruned, then the document is
    /// removed. Fails `NotFound` when the estate did not exist initially.
    async fn delete_estate(&self, estate_id: &EstateId) -> DomainResult<()>;

    /// Validate and create a post, linking it into the author's `post_ids`
    /// and, when an estate is named, into the estate's `post_ids`.
    async fn create_post(&self, new: NewPost) -> DomainResult<Post>;

    /// Apply author-controlled field updates to a post.
    async fn update_post(
        &self,
        actor: &UserId,
        post_id: &PostId,
        update: PostUpdate,
    ) -> DomainResult<Post>;

    /// Delete a post and cascade: its comments are deleted (pruning each
    /// author's `comment_ids`), the estate's `post_ids` and the author's
    /// `post_ids` are pruned, then the document is removed.
    async fn delete_post(&self, post_id: &PostId) -> DomainResult<()>;

    /// Validate and create a comment, linking it into the post's
    /// `comment_ids` and the author's `comment_ids`.
    async fn create_comment(&self, new: NewComment) -> DomainResult<Comment>;

    /// Replace a comment's content.
    async fn update_comment(
        &self,
        actor: &UserId,
        comment_id: &CommentId,
        content: &str,
    ) -> DomainResult<Comment>;

    /// Delete a comment, pruning the post's and the author's `comment_ids`.
    async fn delete_comment(&self, comment_id: &CommentId) -> DomainResult<()>;

    /// Add a favorite edge between a user and an estate.
    ///
    /// Consults the favorite policy first: fails `Forbidden` when the user
    /// owns the estate and `Conflict` when the edge already exists.
    async fn add_favorite(&self, user_id: &UserId, estate_id: &EstateId) -> DomainResult<()>;

    /// Remove a favorite edge. Removing an edge that does not exist is a
    /// no-op, per the set-membership semantics of favorites.
    async fn remove_favorite(&self, user_id: &UserId, estate_id: &EstateId) -> DomainResult<()>;

    /// Read-only policy pre-check, so a caller can decide whether to offer
    /// the favorite action at all.
    async fn can_favorite(
        &self,
        user_id: &UserId,
        estate_id: &EstateId,
    ) -> DomainResult<FavoriteDecision>;
}
