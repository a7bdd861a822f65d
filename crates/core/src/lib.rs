//! Domain core of the media catalog: the document model and its rule
//! tables, the entity store abstraction with its PostgreSQL and in-memory
//! backends, and the catalog service that enforces field shape, reference
//! and uniqueness policies on every write.

pub mod catalog;
pub mod document;
pub mod store;
