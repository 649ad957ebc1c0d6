//! astrochart: an HTTP service for natal-chart data and SVG renderings.
//!
//! The service is a thin pipeline: a validated birth-data payload becomes an
//! engine subject, the subject graph is serialized into a category-keyed
//! JSON map, and the structure optimizer compacts that map into the
//! shared-keys/row-array shape clients consume. Chart mathematics lives
//! behind [`engine::AstroEngine`]; everything in this crate is the wrapper
//! around it.

pub mod api;
pub mod chart;
pub mod config;
pub mod engine;
pub mod models;
