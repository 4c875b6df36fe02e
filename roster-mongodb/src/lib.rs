//! MongoDB backend implementation for roster.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Filters are translated into native MongoDB query documents, exclusions become
//! projections, and record ids map directly onto `_id` ObjectIds.
//!
//! To use this backend from the application, enable the `mongodb` feature of the
//! `roster` crate (on by default) and point `MONGODB_URL` at a server.
//!
//! # Error mapping
//!
//! Connectivity failures (I/O, server selection, DNS, cleared pools) surface as
//! `DocumentStoreError::Unavailable`; rejected writes as `DocumentStoreError::Write`;
//! anything else as `DocumentStoreError::Backend`.
//!
//! # Example
//!
//! ```ignore
//! use roster_core::backend::StoreBackendBuilder;
//! use roster_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "roster")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as roster_mongodb;

pub mod store;
mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
