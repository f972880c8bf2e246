//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) model the document store's per-collection
//! CRUD and pipeline capability; adapters in [`crate::outbound`] implement
//! them. Driving ports ([`ReferenceGraphCommand`], [`ListingsQuery`]) are
//! the surfaces inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod estate_repository;
mod listings_query;
mod post_repository;
mod reference_graph_command;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError, FixtureCommentRepository};
#[cfg(test)]
pub use estate_repository::MockEstateRepository;
pub use estate_repository::{
    EstateRepository, EstateRepositoryError, EstateSearchFilter, FixtureEstateRepository,
};
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use listings_query::{EstateSearch, ListingsQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{FixturePostRepository, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use reference_graph_command::MockReferenceGraphCommand;
pub use reference_graph_command::ReferenceGraphCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
