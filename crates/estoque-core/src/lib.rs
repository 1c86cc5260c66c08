//! # estoque-core: Pure Product Model for Estoque
//!
//! This crate holds the product model shared by the local cache, the remote
//! client and the synchronization policy. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Estoque Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Screens (React Native)                         │   │
//! │  │    Product list ──► Add product ──► Edit stock/price           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        estoque-sync: ProductCatalog / ProductService            │   │
//! │  │        remote first, local cache as fallback                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ estoque-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  samples  │  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │ catalogue │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              estoque-store (Local Key-Value Cache)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, NewProduct, ProductUpdate
//! - [`money`] - Money type stored in centavos
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules checked before any store is touched
//! - [`samples`] - Starter catalogue
//!
//! ## Example Usage
//!
//! ```rust
//! use estoque_core::money::Money;
//!
//! // The wire and the cache carry prices as decimals
//! let price = Money::from_decimal(29.90).unwrap();
//! assert_eq!(price.cents(), 2990);
//! assert_eq!(price.to_string(), "R$ 29,90");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod samples;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Stock at or below this level is flagged as low in the product list.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
