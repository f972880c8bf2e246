//! Reference graph manager.
//!
//! The single place permitted to mutate id-list fields across the four
//! collections. Every edge is stored twice (once on each side), so each
//! mutator here updates both sides within the same logical operation, and
//! cascading deletes process children before detaching from parents: a
//! crash mid-cascade leaves orphaned leaf documents rather than dangling
//! references from a still-visible parent.
//!
//! The store offers no multi-document transaction, so cascades run as
//! sagas: the first failure halts the remaining steps and is surfaced
//! verbatim, with no compensation. Readers tolerate the transient states
//! this leaves behind (see the query engine's join semantics).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::DomainResult;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::DomainError;
use crate::domain::estate::{Estate, EstateUpdate, NewEstate};
use crate::domain::id::{CommentId, EstateId, PostId, UserId};
use crate::domain::policy::{self, FavoriteDecision};
use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, EstateRepository, EstateRepositoryError,
    PostRepository, PostRepositoryError, ReferenceGraphCommand, UserRepository,
    UserRepositoryError,
};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::user::User;

/// Reference graph service implementing [`ReferenceGraphCommand`].
#[derive(Clone)]
pub struct ReferenceGraphService<U, E, P, C> {
    users: Arc<U>,
    estates: Arc<E>,
    posts: Arc<P>,
    comments: Arc<C>,
}

impl<U, E, P, C> ReferenceGraphService<U, E, P, C> {
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

/// Append `value` unless already present; returns whether the list changed.
fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) -> bool {
    if list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}

/// Remove every occurrence of `value`; returns whether the list changed.
fn pull<T: PartialEq>(list: &mut Vec<T>, value: &T) -> bool {
    let before = list.len();
    list.retain(|item| item != value);
    list.len() != before
}

impl<U, E, P, C> ReferenceGraphService<U, E, P, C>
where
    U: UserRepository,
    E: EstateRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn fetch_user_required(&self, id: &UserId) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {id} does not exist")))
    }

    async fn fetch_estate_required(&self, id: &EstateId) -> DomainResult<Estate> {
        self.estates
            .find_by_id(id)
            .await
            .map_err(map_estate_error)?
            .ok_or_else(|| DomainError::not_found(format!("estate {id} does not exist")))
    }

    async fn fetch_post_required(&self, id: &PostId) -> DomainResult<Post> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| DomainError::not_found(format!("post {id} does not exist")))
    }

    async fn fetch_comment_required(&self, id: &CommentId) -> DomainResult<Comment> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| DomainError::not_found(format!("comment {id} does not exist")))
    }

    /// Append an estate id to its owner's `estate_ids`.
    ///
    /// # Errors
    ///
    /// Fails `NotFound` when the user is absent.
    pub async fn link_estate_to_user(
        &self,
        estate_id: &EstateId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let mut user = self.fetch_user_required(user_id).await?;
        if push_unique(&mut user.estate_ids, estate_id.clone()) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Remove an estate id from its owner's `estate_ids`.
    ///
    /// Tolerates a missing user: the estate is being detached, so a
    /// dangling owner reference only means the prune has nothing to do.
    pub async fn unlink_estate_from_user(
        &self,
        estate_id: &EstateId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let Some(mut user) = self.users.find_by_id(user_id).await.map_err(map_user_error)? else {
            warn!(%estate_id, %user_id, "estate owner missing while unlinking, skipping prune");
            return Ok(());
        };
        if pull(&mut user.estate_ids, estate_id) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Append a post id to its author's `post_ids`.
    pub async fn add_post_to_user(&self, post_id: &PostId, user_id: &UserId) -> DomainResult<()> {
        let mut user = self.fetch_user_required(user_id).await?;
        if push_unique(&mut user.post_ids, post_id.clone()) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Remove a post id from its author's `post_ids`, tolerating a missing
    /// author.
    pub async fn remove_post_from_user(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let Some(mut user) = self.users.find_by_id(user_id).await.map_err(map_user_error)? else {
            warn!(%post_id, %user_id, "post author missing while unlinking, skipping prune");
            return Ok(());
        };
        if pull(&mut user.post_ids, post_id) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Append a post id to the discussed estate's `post_ids`.
    pub async fn add_post_to_estate(
        &self,
        post_id: &PostId,
        estate_id: &EstateId,
    ) -> DomainResult<()> {
        let mut estate = self.fetch_estate_required(estate_id).await?;
        if push_unique(&mut estate.post_ids, post_id.clone()) {
            self.estates.save(&estate).await.map_err(map_estate_error)?;
        }
        Ok(())
    }

    /// Remove a post id from the discussed estate's `post_ids`, tolerating
    /// a missing estate.
    pub async fn remove_post_from_estate(
        &self,
        post_id: &PostId,
        estate_id: &EstateId,
    ) -> DomainResult<()> {
        let Some(mut estate) = self
            .estates
            .find_by_id(estate_id)
            .await
            .map_err(map_estate_error)?
        else {
            warn!(%post_id, %estate_id, "estate missing while unlinking post, skipping prune");
            return Ok(());
        };
        if pull(&mut estate.post_ids, post_id) {
            self.estates.save(&estate).await.map_err(map_estate_error)?;
        }
        Ok(())
    }

    /// Append a comment id to its post's `comment_ids`.
    pub async fn add_comment_to_post(
        &self,
        comment_id: &CommentId,
        post_id: &PostId,
    ) -> DomainResult<()> {
        let mut post = self.fetch_post_required(post_id).await?;
        if push_unique(&mut post.comment_ids, comment_id.clone()) {
            self.posts.save(&post).await.map_err(map_post_error)?;
        }
        Ok(())
    }

    /// Remove a comment id from its post's `comment_ids`, tolerating a
    /// missing post.
    pub async fn remove_comment_from_post(
        &self,
        comment_id: &CommentId,
        post_id: &PostId,
    ) -> DomainResult<()> {
        let Some(mut post) = self.posts.find_by_id(post_id).await.map_err(map_post_error)? else {
            warn!(%comment_id, %post_id, "post missing while unlinking comment, skipping prune");
            return Ok(());
        };
        if pull(&mut post.comment_ids, comment_id) {
            self.posts.save(&post).await.map_err(map_post_error)?;
        }
        Ok(())
    }

    /// Append a comment id to its author's `comment_ids`.
    pub async fn add_comment_to_user(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let mut user = self.fetch_user_required(user_id).await?;
        if push_unique(&mut user.comment_ids, comment_id.clone()) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Remove a comment id from its author's `comment_ids`, tolerating a
    /// missing author.
    pub async fn remove_comment_from_user(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let Some(mut user) = self.users.find_by_id(user_id).await.map_err(map_user_error)? else {
            warn!(%comment_id, %user_id, "comment author missing while unlinking, skipping prune");
            return Ok(());
        };
        if pull(&mut user.comment_ids, comment_id) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }

    /// Remove an estate id from a favoriting user's `favorite_estate_ids`,
    /// tolerating a missing user.
    async fn remove_favorite_from_user(
        &self,
        estate_id: &EstateId,
        user_id: &UserId,
    ) -> DomainResult<()> {
        let Some(mut user) = self.users.find_by_id(user_id).await.map_err(map_user_error)? else {
            warn!(%estate_id, %user_id, "favoriting user missing while pruning, skipping");
            return Ok(());
        };
        if pull(&mut user.favorite_estate_ids, estate_id) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U, E, P, C> ReferenceGraphCommand for ReferenceGraphService<U, E, P, C>
where
    U: UserRepository,
    E: EstateRepository,
    P: PostRepository,
    C: CommentRepository,
{
    async fn create_estate(&self, new: NewEstate) -> DomainResult<Estate> {
        new.validate()
            .map_err(|err| DomainError::validation(err.to_string()))?;
        self.fetch_user_required(&new.user_id).await?;

        let estate = Estate::from_new(EstateId::random(), new, Utc::now());
        self.estates.insert(&estate).await.map_err(map_estate_error)?;
        self.link_estate_to_user(&estate.id, &estate.user_id).await?;
        Ok(estate)
    }

    async fn update_estate(
        &self,
        actor: &UserId,
        estate_id: &EstateId,
        update: EstateUpdate,
    ) -> DomainResult<Estate> {
        let mut estate = self.fetch_estate_required(estate_id).await?;
        if &estate.user_id != actor {
            return Err(DomainError::forbidden(
                "only the owner may update an estate",
            ));
        }
        update
            .apply(&mut estate)
            .map_err(|err| DomainError::validation(err.to_string()))?;
        self.estates.save(&estate).await.map_err(map_estate_error)?;
        Ok(estate)
    }

    async fn delete_estate(&self, estate_id: &EstateId) -> DomainResult<()> {
        let estate = self.fetch_estate_required(estate_id).await?;
        debug!(%estate_id, "deleting estate and cascading");

        let posts = self
            .posts
            .find_by_estate(estate_id)
            .await
            .map_err(map_post_error)?;
        for post in &posts {
            self.delete_post(&post.id).await?;
        }

        self.unlink_estate_from_user(estate_id, &estate.user_id)
            .await?;
        for user_id in &estate.favorited_by_users_ids {
            self.remove_favorite_from_user(estate_id, user_id).await?;
        }

        self.estates
            .delete(estate_id)
            .await
            .map_err(map_estate_error)?;
        Ok(())
    }

    async fn create_post(&self, new: NewPost) -> DomainResult<Post> {
        new.validate()
            .map_err(|err| DomainError::validation(err.to_string()))?;
        self.fetch_user_required(&new.author_id).await?;
        if let Some(estate_id) = &new.estate_id {
            self.fetch_estate_required(estate_id).await?;
        }

        let post = Post::from_new(PostId::random(), new, Utc::now());
        self.posts.insert(&post).await.map_err(map_post_error)?;
        self.add_post_to_user(&post.id, &post.author_id).await?;
        if let Some(estate_id) = &post.estate_id {
            self.add_post_to_estate(&post.id, estate_id).await?;
        }
        Ok(post)
    }

    async fn update_post(
        &self,
        actor: &UserId,
        post_id: &PostId,
        update: PostUpdate,
    ) -> DomainResult<Post> {
        let mut post = self.fetch_post_required(post_id).await?;
        if &post.author_id != actor {
            return Err(DomainError::forbidden("only the author may update a post"));
        }
        update
            .apply(&mut post)
            .map_err(|err| DomainError::validation(err.to_string()))?;
        self.posts.save(&post).await.map_err(map_post_error)?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: &PostId) -> DomainResult<()> {
        let post = self.fetch_post_required(post_id).await?;
        debug!(%post_id, "deleting post and cascading");

        let comments = self
            .comments
            .find_by_post(post_id)
            .await
            .map_err(map_comment_error)?;
        for comment in &comments {
            self.remove_comment_from_user(&comment.id, &comment.author_id)
                .await?;
            self.comments
                .delete(&comment.id)
                .await
                .map_err(map_comment_error)?;
        }

        if let Some(estate_id) = &post.estate_id {
            self.remove_post_from_estate(post_id, estate_id).await?;
        }
        self.remove_post_from_user(post_id, &post.author_id).await?;

        self.posts.delete(post_id).await.map_err(map_post_error)?;
        Ok(())
    }

    async fn create_comment(&self, new: NewComment) -> DomainResult<Comment> {
        new.validate()
            .map_err(|err| DomainError::validation(err.to_string()))?;
        self.fetch_user_required(&new.author_id).await?;
        self.fetch_post_required(&new.post_id).await?;

        let comment = Comment::from_new(CommentId::random(), new, Utc::now());
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        self.add_comment_to_post(&comment.id, &comment.post_id)
            .await?;
        self.add_comment_to_user(&comment.id, &comment.author_id)
            .await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        actor: &UserId,
        comment_id: &CommentId,
        content: &str,
    ) -> DomainResult<Comment> {
        let mut comment = self.fetch_comment_required(comment_id).await?;
        if &comment.author_id != actor {
            return Err(DomainError::forbidden(
                "only the author may update a comment",
            ));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation("comment content must not be empty"));
        }
        content.clone_into(&mut comment.content);
        self.comments
            .save(&comment)
            .await
            .map_err(map_comment_error)?;
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> DomainResult<()> {
        let comment = self.fetch_comment_required(comment_id).await?;
        self.remove_comment_from_post(comment_id, &comment.post_id)
            .await?;
        self.remove_comment_from_user(comment_id, &comment.author_id)
            .await?;
        self.comments
            .delete(comment_id)
            .await
            .map_err(map_comment_error)?;
        Ok(())
    }

    async fn add_favorite(&self, user_id: &UserId, estate_id: &EstateId) -> DomainResult<()> {
        let mut user = self.fetch_user_required(user_id).await?;
        let mut estate = self.fetch_estate_required(estate_id).await?;

        policy::evaluate(&user, &estate).into_result(&user, &estate)?;

        push_unique(&mut user.favorite_estate_ids, estate_id.clone());
        push_unique(&mut estate.favorited_by_users_ids, user_id.clone());
        self.users.save(&user).await.map_err(map_user_error)?;
        self.estates.save(&estate).await.map_err(map_estate_error)?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &UserId, estate_id: &EstateId) -> DomainResult<()> {
        let mut user = self.fetch_user_required(user_id).await?;
        let mut estate = self.fetch_estate_required(estate_id).await?;

        if pull(&mut user.favorite_estate_ids, estate_id) {
            self.users.save(&user).await.map_err(map_user_error)?;
        }
        if pull(&mut estate.favorited_by_users_ids, user_id) {
            self.estates.save(&estate).await.map_err(map_estate_error)?;
        }
        Ok(())
    }

    async fn can_favorite(
        &self,
        user_id: &UserId,
        estate_id: &EstateId,
    ) -> DomainResult<FavoriteDecision> {
        let user = self.fetch_user_required(user_id).await?;
        let estate = self.fetch_estate_required(estate_id).await?;
        Ok(policy::evaluate(&user, &estate))
    }
}

#[cfg(test)]
#[path = "graph_service_tests.rs"]
mod tests;
