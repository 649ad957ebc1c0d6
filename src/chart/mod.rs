//! The transformation core: engine object graph in, client-facing JSON out.
//!
//! [`serializer`] flattens a [`crate::models::Subject`] and its aspect
//! records into a category-keyed JSON map; [`optimizer`] then compacts that
//! map into the shared-keys/row-array shape clients consume.

pub mod optimizer;
pub mod serializer;
