//! Driven adapters.

pub mod memory;

pub use self::memory::MemoryDocumentStore;
