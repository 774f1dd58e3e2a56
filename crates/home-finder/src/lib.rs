//! Building blocks for the home finder: location validation, listing
//! normalization and storage, the fetch service router, and the interactive
//! search session.

pub mod config;
pub mod error;
pub mod listings;
pub mod location;
pub mod search;
pub mod session;
pub mod telemetry;
