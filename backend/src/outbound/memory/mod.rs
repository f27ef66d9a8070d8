//! In-memory storage adapters.
//!
//! Used when the server starts with `storage = memory` and by the HTTP
//! integration tests. State lives for the lifetime of the process.

mod user_repository;

pub use user_repository::InMemoryUserRepository;
