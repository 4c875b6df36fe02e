//! In-memory document storage backend for roster.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is the backend used by tests and local development, and behaves like the MongoDB
//! backend for every operation the application relies on:
//!
//! - **Store-assigned ids** - every insert gets a fresh ObjectId-backed `RecordId`
//! - **Merge updates** - top-level keys are replaced, absent keys untouched
//! - **Dotted-path filters** - `address.country` reaches into embedded documents
//! - **Projection and limits** - excluded fields are dropped before results are returned
//!
//! # Quick Start
//!
//! ```ignore
//! use roster_core::{backend::StoreBackendBuilder, store::DocumentStore};
//! use roster_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!     let students = store.typed_collection::<Student>();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as roster_memory;

pub mod store;
mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
