//! # estoque-sync: Remote API Client and Synchronization Policy
//!
//! Decides, per operation, whether the remote product API or the local cache
//! answers, and keeps the cache mirrored whenever the API does.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Sync Layer                               │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 ProductCatalog (catalog.rs)                      │  │
//! │  │  Immutable snapshots published after every operation             │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 ProductService (service.rs)                      │  │
//! │  │  Validate ─► remote first ─► mirror locally                     │  │
//! │  │                  └─ failure ─► local store, tagged fallback      │  │
//! │  └──────────────┬───────────────────────────────┬───────────────────┘  │
//! │                 ▼                               ▼                       │
//! │  ┌────────────────────────────┐   ┌──────────────────────────────────┐ │
//! │  │ HttpProductClient          │   │ LocalProductStore (estoque-store)│ │
//! │  │ (remote.rs + dto.rs)       │   │ one JSON blob under @Products    │ │
//! │  │ reqwest, Bearer token      │   └──────────────────────────────────┘ │
//! │  └──────────────┬─────────────┘                                         │
//! │                 │ shares                                                │
//! │  ┌──────────────▼─────────────┐   ┌──────────────────────────────────┐ │
//! │  │ AuthSession / AuthService  │   │ ClientConfig (config.rs)         │ │
//! │  │ (auth.rs)                  │   │ defaults → TOML → env            │ │
//! │  └────────────────────────────┘   └──────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = ClientConfig::load_or_default(None);
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//!
//! let session = AuthSession::new();
//! let remote = HttpProductClient::new(&config, session.clone())?;
//! AuthService::new(db.clone(), remote.clone()).restore().await?;
//!
//! let service = ProductService::new(LocalProductStore::new(db), remote, &config);
//! let catalog = ProductCatalog::new(service);
//! catalog.refresh().await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod dto;
pub mod error;
pub mod remote;
pub mod service;

#[cfg(test)]
mod test_support;

pub use auth::{AuthService, AuthSession, AuthUser, TOKEN_KEY, USER_KEY};
pub use catalog::{CatalogSnapshot, ProductCatalog};
pub use config::{ApiSettings, ClientConfig, PaginationSettings, StorageSettings};
pub use error::{SyncError, SyncResult};
pub use remote::{HttpProductClient, RemoteUpdate};
pub use service::{DataSource, ProductService, Synced};
