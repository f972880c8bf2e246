//! Domain entities, policies, and services.
//!
//! Documents are strongly typed with immutable ids; the id-list fields that
//! encode graph edges are public for adapters to persist but are only ever
//! written through [`ReferenceGraphService`]. Read views come from
//! [`ListingsQueryService`]. Both services speak to storage exclusively
//! through the ports in [`ports`].

pub mod comment;
pub mod error;
pub mod estate;
pub mod id;
pub mod policy;
pub mod ports;
pub mod post;
pub mod user;
pub mod views;

mod graph_service;
mod query_service;

pub use self::comment::{Comment, CommentValidationError, NewComment};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorKind};
pub use self::estate::{
    Estate, EstateCategory, EstateUpdate, EstateValidationError, NewEstate,
};
pub use self::graph_service::ReferenceGraphService;
pub use self::id::{CommentId, EstateId, IdValidationError, PostId, UserId};
pub use self::policy::FavoriteDecision;
pub use self::post::{NewPost, Post, PostUpdate, PostValidationError};
pub use self::query_service::ListingsQueryService;
pub use self::user::{User, UserRole};
pub use self::views::{CommentView, EstateSummary, PostView, UserSummary};

/// Uniform result type returned by every core operation.
pub type DomainResult<T> = Result<T, DomainError>;
