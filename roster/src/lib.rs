//! Student roster HTTP service.
//!
//! The API is a thin mapper ([`routes`]) over a record store adapter ([`students`])
//! which talks to whichever `roster-core` backend [`startup`] connects.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod routes;
pub mod startup;
pub mod students;
