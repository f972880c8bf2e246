//! Favorite/ownership policy.
//!
//! A pure decision function consulted before any favorite mutation: a user
//! may never favorite an estate they own, and may favorite a given estate
//! at most once. The reference graph service evaluates it before touching
//! either side of the favorite edge, and exposes it read-only so callers
//! can pre-check before offering the action.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::DomainError;
use super::estate::Estate;
use super::user::User;

/// Outcome of evaluating the favorite policy for a (user, estate) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteDecision {
    /// The favorite may be added.
    Allow,
    /// The user owns the estate; owners cannot favorite their own listing.
    OwnEstate,
    /// The favorite edge already exists on either side.
    AlreadyFavorited,
}

impl FavoriteDecision {
    /// Whether the favorite mutation may proceed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Lower a rejection into the domain error the mutation surfaces.
    ///
    /// # Errors
    ///
    /// [`OwnEstate`](Self::OwnEstate) becomes `Forbidden` and
    /// [`AlreadyFavorited`](Self::AlreadyFavorited) becomes `Conflict`.
    pub fn into_result(self, user: &User, estate: &Estate) -> Result<(), DomainError> {
        match self {
            Self::Allow => Ok(()),
            Self::OwnEstate => Err(DomainError::forbidden(
                "users cannot favorite their own estate",
            )
            .with_details(json!({
                "userId": user.id,
                "estateId": estate.id,
            }))),
            Self::AlreadyFavorited => Err(DomainError::conflict("estate is already favorited")
                .with_details(json!({
                    "userId": user.id,
                    "estateId": estate.id,
                }))),
        }
    }
}

/// Evaluate the favorite policy for a (user, estate) pair.
///
/// Membership is checked on both sides of the edge so that a half-written
/// favorite observed mid-repair still reads as already favorited rather
/// than being double-applied.
#[must_use]
pub fn evaluate(user: &User, estate: &Estate) -> FavoriteDecision {
    if estate.user_id == user.id {
        return FavoriteDecision::OwnEstate;
    }
    if user.favorite_estate_ids.contains(&estate.id)
        || estate.favorited_by_users_ids.contains(&user.id)
    {
        return FavoriteDecision::AlreadyFavorited;
    }
    FavoriteDecision::Allow
}
