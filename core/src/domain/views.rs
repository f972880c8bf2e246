//! Denormalized read projections produced by the aggregation query engine.
//!
//! The write model stores only ids across collections; these views are the
//! join-by-lookup results handed to callers. A joined side that no longer
//! resolves (a dangling reference observed mid-cascade) degrades to `None`
//! rather than failing the page.

use serde::{Deserialize, Serialize};

use super::estate::{Estate, EstateCategory};
use super::id::{EstateId, UserId};
use super::comment::Comment;
use super::post::Post;
use super::user::{User, UserRole};

/// Author fields attached to joined read results.
///
/// Deliberately excludes the password hash and contact details; read views
/// never need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Author id.
    pub id: UserId,
    /// Display username.
    pub username: String,
    /// Account role.
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Estate fields attached to joined read results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateSummary {
    /// Estate id.
    pub id: EstateId,
    /// Listing title.
    pub title: String,
    /// Asking price.
    pub price: f64,
    /// Listing category.
    pub category: EstateCategory,
    /// Image references.
    pub images: Vec<String>,
}

impl From<&Estate> for EstateSummary {
    fn from(estate: &Estate) -> Self {
        Self {
            id: estate.id.clone(),
            title: estate.title.clone(),
            price: estate.price,
            category: estate.category,
            images: estate.images.clone(),
        }
    }
}

/// A post joined with its author and optional estate.
///
/// `author` is `None` when the author document no longer resolves; `estate`
/// is `None` both when the post discusses no estate and when the reference
/// dangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// The post document itself, flattened into the view.
    #[serde(flatten)]
    pub post: Post,
    /// Joined author, when the reference resolves.
    pub author: Option<UserSummary>,
    /// Joined estate, when linked and resolving.
    pub estate: Option<EstateSummary>,
}

/// A comment joined with its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// The comment document itself, flattened into the view.
    #[serde(flatten)]
    pub comment: Comment,
    /// Joined author, when the reference resolves.
    pub author: Option<UserSummary>,
}
