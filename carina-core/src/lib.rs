//! Carina Core
//!
//! Core library for an infrastructure management tool: resource values,
//! attribute schemas and the provider traits that expose them.

pub mod docs;
pub mod provider;
pub mod resource;
pub mod schema;
