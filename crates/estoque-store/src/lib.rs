//! # estoque-store: Local Persistence for Estoque
//!
//! This crate keeps the device-local copy of the product list. It is the
//! offline half of the synchronization layer: the fallback target when the
//! remote API is unreachable and the mirror of the last-known-good remote
//! state when it is.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Data Flow                                │
//! │                                                                         │
//! │  ProductService (estoque-sync)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  estoque-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────────┐         ┌──────────────────────────┐  │   │
//! │  │   │ LocalProductStore  │────────►│     KeyValueStore        │  │   │
//! │  │   │ (repository)       │         │  Database | MemoryStore  │  │   │
//! │  │   │ @Products blob     │         │  (pool.rs)  (kv.rs)      │  │   │
//! │  │   └────────────────────┘         └──────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            SQLite file (kv_store table)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - The key-value trait and the in-memory implementation
//! - [`pool`] - SQLite connection pool and the SQLite implementation
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - The product collection
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use estoque_store::{Database, DbConfig, LocalProductStore};
//!
//! let db = Database::new(DbConfig::new("estoque.db")).await?;
//! let products = LocalProductStore::new(db);
//! let all = products.list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use pool::{Database, DbConfig};
pub use repository::product::{LocalProductStore, PRODUCTS_KEY};
