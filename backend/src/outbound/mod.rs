//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local user repository
//! - **persistence**: PostgreSQL-backed repository using Diesel
//! - **tvdb**: TheTVDB v4 search client
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod tvdb;
