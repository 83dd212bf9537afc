//! Persistence for the bookstore: record models, store traits, and the
//! in-memory document store.

pub mod memory;
pub mod models;
pub mod store;

pub use memory::{Fixture, InMemoryStore};
pub use models::*;
pub use store::{BookRequestStore, OrderStore, Store, UserStore};
