//! Estate document model.
//!
//! Estates are the listings side of the application. An estate is owned by
//! exactly one user (`user_id`), may be discussed by any number of posts
//! (`post_ids`), and carries the inverse side of every favorite edge
//! (`favorited_by_users_ids`). The id-list fields are mutated exclusively
//! by the reference graph service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{EstateId, PostId, UserId};

/// Category of an estate listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstateCategory {
    /// A flat inside a multi-storey building.
    Apartment,
    /// A single-room flat.
    Studio,
    /// Commercial office space.
    Office,
    /// A standalone house.
    House,
    /// A standalone detached villa.
    Villa,
}

impl EstateCategory {
    /// Whether the category denotes a standalone home, which has no floor
    /// number of its own.
    #[must_use]
    pub const fn is_standalone_house(self) -> bool {
        matches!(self, Self::House | Self::Villa)
    }
}

/// Validation errors for estate input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstateValidationError {
    /// The title was empty or whitespace-only.
    #[error("estate title must not be empty")]
    EmptyTitle,
    /// Listings cannot carry a negative price.
    #[error("estate price must not be negative, got {price}")]
    NegativePrice {
        /// The rejected price.
        price: f64,
    },
    /// Non-standalone categories live on a specific floor.
    #[error("floor number is required for category {category:?}")]
    MissingFloorNumber {
        /// The category that requires a floor number.
        category: EstateCategory,
    },
}

/// Estate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estate {
    /// Document id.
    pub id: EstateId,
    /// Owning user.
    pub user_id: UserId,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Floor area in square meters.
    pub square_meters: f64,
    /// Number of rooms.
    pub total_rooms: u32,
    /// Listing category.
    pub category: EstateCategory,
    /// Floor the estate is on; absent only for standalone houses.
    pub floor_number: Option<i32>,
    /// Image references; storage mechanics are an external concern.
    pub images: Vec<String>,
    /// Longitude of the property.
    pub longitude: f64,
    /// Latitude of the property.
    pub latitude: f64,
    /// Ids of posts discussing this estate.
    pub post_ids: Vec<PostId>,
    /// Ids of users that favorited this estate.
    pub favorited_by_users_ids: Vec<UserId>,
    /// Creation time, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
}

/// Owner-supplied input for creating an estate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEstate {
    /// Owning user.
    pub user_id: UserId,
    /// Listing title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Asking price.
    pub price: f64,
    /// Floor area in square meters.
    pub square_meters: f64,
    /// Number of rooms.
    pub total_rooms: u32,
    /// Listing category.
    pub category: EstateCategory,
    /// Floor the estate is on; required unless the category is a
    /// standalone house.
    pub floor_number: Option<i32>,
    /// Image references.
    pub images: Vec<String>,
    /// Longitude of the property.
    pub longitude: f64,
    /// Latitude of the property.
    pub latitude: f64,
}

impl NewEstate {
    /// Check the creation invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`EstateValidationError`]: empty title,
    /// negative price, or a missing floor number on a non-standalone
    /// category.
    pub fn validate(&self) -> Result<(), EstateValidationError> {
        if self.title.trim().is_empty() {
            return Err(EstateValidationError::EmptyTitle);
        }
        if self.price < 0.0 {
            return Err(EstateValidationError::NegativePrice { price: self.price });
        }
        if self.floor_number.is_none() && !self.category.is_standalone_house() {
            return Err(EstateValidationError::MissingFloorNumber {
                category: self.category,
            });
        }
        Ok(())
    }
}

impl Estate {
    /// Materialize a validated [`NewEstate`] into a document.
    ///
    /// The caller mints the id and timestamps the document; the reference
    /// lists start empty and are linked afterwards.
    #[must_use]
    pub fn from_new(id: EstateId, new: NewEstate, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            price: new.price,
            square_meters: new.square_meters,
            total_rooms: new.total_rooms,
            category: new.category,
            floor_number: new.floor_number,
            images: new.images,
            longitude: new.longitude,
            latitude: new.latitude,
            post_ids: Vec::new(),
            favorited_by_users_ids: Vec::new(),
            created_at,
        }
    }
}

/// Owner-controlled field updates for an estate.
///
/// Only the fields an owner controls are reachable here; id-list fields and
/// location data stay immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateUpdate {
    /// Replacement title, when present.
    pub title: Option<String>,
    /// Replacement description, when present.
    pub description: Option<String>,
    /// Replacement price, when present.
    pub price: Option<f64>,
}

impl EstateUpdate {
    /// Apply the update to an estate document.
    ///
    /// # Errors
    ///
    /// Returns [`EstateValidationError::EmptyTitle`] or
    /// [`EstateValidationError::NegativePrice`] when a replacement value is
    /// invalid; the document is untouched on failure.
    pub fn apply(&self, estate: &mut Estate) -> Result<(), EstateValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(EstateValidationError::EmptyTitle);
            }
        }
        if let Some(price) = self.price {
            if price < 0.0 {
                return Err(EstateValidationError::NegativePrice { price });
            }
        }

        if let Some(title) = &self.title {
            estate.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            estate.description.clone_from(description);
        }
        if let Some(price) = self.price {
            estate.price = price;
        }
        Ok(())
    }
}
