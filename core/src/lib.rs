//! Courtyard core: the reference-graph and aggregation-query layer of the
//! Courtyard listings-and-forum service.
//!
//! Four denormalized collections (users, estates, posts, comments) reference
//! each other by id lists rather than foreign keys. This crate owns the two
//! pieces with real invariants:
//!
//! - [`domain::ReferenceGraphService`] — the single authority over id-list
//!   fields: bidirectional edge updates, favorite policy enforcement, and
//!   cascading deletion.
//! - [`domain::ListingsQueryService`] — filtered, paginated, join-by-lookup
//!   read views with a `{ data, totalLength }` envelope.
//!
//! Transport, authentication, and file storage are external collaborators;
//! they talk to this crate through the driving ports in [`domain::ports`]
//! and provide storage through the driven repository ports. The
//! [`outbound::memory`] adapter is the in-process store implementation used
//! by tests and local tooling.

pub mod domain;
pub mod outbound;
