//! User document model.
//!
//! A user owns estates, posts, and comments, and keeps a favorites list.
//! The four id-list fields are denormalized inverse references; they are
//! mutated exclusively by the reference graph service, never by callers.

use serde::{Deserialize, Serialize};

use super::id::{CommentId, EstateId, PostId, UserId};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account.
    User,
    /// Moderation account.
    Admin,
}

/// Application user document.
///
/// ## Invariants
/// - `estate_ids` contains E iff `estate.user_id` equals this user's id.
/// - `favorite_estate_ids` contains E iff E's `favorited_by_users_ids`
///   contains this user's id.
/// - `post_ids` / `comment_ids` mirror `post.author_id` /
///   `comment.author_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document id.
    pub id: UserId,
    /// Login name, unique at the account layer (out of scope here).
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Hashed credential; hashing itself is an external concern.
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// Ids of estates owned by this user.
    pub estate_ids: Vec<EstateId>,
    /// Ids of posts authored by this user.
    pub post_ids: Vec<PostId>,
    /// Ids of comments authored by this user.
    pub comment_ids: Vec<CommentId>,
    /// Ids of estates this user has favorited.
    pub favorite_estate_ids: Vec<EstateId>,
}

impl User {
    /// Build a user with empty reference lists.
    #[must_use]
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            phone: phone.into(),
            password_hash: password_hash.into(),
            role,
            estate_ids: Vec::new(),
            post_ids: Vec::new(),
            comment_ids: Vec::new(),
            favorite_estate_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_user_starts_with_empty_reference_lists() {
        let user = User::new(
            UserId::random(),
            "ada",
            "ada@example.com",
            "+441234567890",
            "hash",
            UserRole::User,
        );
        assert!(user.estate_ids.is_empty());
        assert!(user.post_ids.is_empty());
        assert!(user.comment_ids.is_empty());
        assert!(user.favorite_estate_ids.is_empty());
    }

    #[rstest]
    fn user_serializes_with_camel_case_reference_lists() {
        let user = User::new(
            UserId::random(),
            "ada",
            "ada@example.com",
            "+441234567890",
            "hash",
            UserRole::Admin,
        );
        let value = serde_json::to_value(&user).expect("user serializes");
        assert!(value.get("favoriteEstateIds").is_some());
        assert!(value.get("estateIds").is_some());
        assert_eq!(value["role"], "admin");
    }
}
