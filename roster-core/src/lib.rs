//! Store-agnostic core of the roster document layer.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Traits for defining and serializing stored documents
//! - **Record identifiers** ([`id`]) - Validated, store-assigned opaque ids
//! - **Store backend abstraction** ([`backend`]) - The trait every storage backend implements
//! - **Query and filtering API** ([`query`]) - Type-safe filter construction and a visitor for backends
//! - **Merge-patch fields** ([`patch`]) - Tri-state optional fields for partial updates
//! - **Collections and store** ([`collection`], [`store`]) - Typed access over an injected backend
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use roster_core::{document::Document, store::DocumentStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Course {
//!     pub title: Option<String>,
//! }
//!
//! impl Document for Course {
//!     fn collection_name() -> &'static str {
//!         "courses"
//!     }
//! }
//!
//! let store = DocumentStore::new(backend);
//! let id = store.typed_collection::<Course>().insert(&course).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as roster_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod id;
pub mod patch;
pub mod query;
pub mod store;
