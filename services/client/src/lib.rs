//! services/client/src/lib.rs
//!
//! The portal client service: configuration, the HTTP adapter for the
//! portal API, and the app layer (guard, task store, completion workflow,
//! dashboard aggregation).

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
