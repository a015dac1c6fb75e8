//! Operator console for the retrieval search service.
//!
//! - `config`: endpoint and credential defaults from the environment.
//! - `assets`: bundled message catalog and version descriptor.
//! - `search_api`: query submission against the search endpoint.
//! - `resource_api`: document fetch against the resource endpoint.
//! - `feedback`: view payload assembly from answers and hits.

pub mod assets;
pub mod config;
pub mod feedback;
pub mod resource_api;
pub mod search_api;
