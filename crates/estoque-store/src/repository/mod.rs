//! # Repository Module
//!
//! Typed collections stored on top of a [`KeyValueStore`](crate::kv::KeyValueStore).
//!
//! ## Available Repositories
//!
//! - [`LocalProductStore`](product::LocalProductStore) - The `@Products` collection

pub mod product;
