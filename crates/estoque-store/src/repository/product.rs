//! # Product Collection
//!
//! The local product list, stored under one key as a single JSON array.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Every Mutation (create/update/delete/upsert)           │
//! │                                                                         │
//! │  lock write_lock ──► get_item("@Products") ──► Vec<Product>            │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                          modify in memory               │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │  unlock ◄── set_item("@Products", json) ◄── serialize whole list       │
//! │                                                                         │
//! │  The blob is replaced in one write, so readers see either the old     │
//! │  list or the new one, never a mix.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Local Ids
//! Records created here get the current time in milliseconds as their id,
//! bumped by one until it does not collide with an id already present.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use estoque_core::{NewProduct, Product, ProductUpdate};

/// Storage key holding the product collection.
pub const PRODUCTS_KEY: &str = "@Products";

/// The product collection on top of any [`KeyValueStore`].
///
/// ## Usage
/// ```rust,ignore
/// let store = LocalProductStore::new(MemoryStore::new());
/// let panela = store.create(NewProduct::new("Panela", 15, Money::from_cents(2990))).await?;
/// store.update(&panela.id, &ProductUpdate::quantity(10)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalProductStore<S> {
    kv: S,
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> LocalProductStore<S> {
    /// Wraps a key-value store.
    pub fn new(kv: S) -> Self {
        LocalProductStore {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Returns every stored product in collection order.
    ///
    /// A missing key is an empty collection. An unreadable blob is an error.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        self.load().await
    }

    /// Finds a product by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.load().await?.into_iter().find(|p| p.id == id))
    }

    /// Number of stored products.
    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.load().await?.len())
    }

    /// Creates a product with a locally generated id.
    pub async fn create(&self, input: NewProduct) -> StoreResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let now = Utc::now();
        let id = next_local_id(&products, now)?;
        let product = Product::from_new(id, input, now);

        products.push(product.clone());
        self.save(&products).await?;

        debug!(id = %product.id, total = products.len(), "Created local product");
        Ok(product)
    }

    /// Merges `update` into the product with `id`.
    ///
    /// ## Errors
    /// `NotFound` when no product has that id.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> StoreResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        product.apply(update, Utc::now());
        let updated = product.clone();

        self.save(&products).await?;

        debug!(id = %id, "Updated local product");
        Ok(updated)
    }

    /// Removes the product with `id`.
    ///
    /// Always returns `true`: a missing id is already deleted.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() != before {
            self.save(&products).await?;
            debug!(id = %id, "Deleted local product");
        } else {
            debug!(id = %id, "Delete of absent product ignored");
        }

        Ok(true)
    }

    /// Mirrors one record, replacing by id or appending.
    pub async fn upsert(&self, product: Product) -> StoreResult<()> {
        self.upsert_many(vec![product]).await
    }

    /// Mirrors many records at once.
    ///
    /// Existing ids keep their position; new ids are appended in input order.
    /// Records that are not in `incoming` are left alone.
    pub async fn upsert_many(&self, incoming: Vec<Product>) -> StoreResult<()> {
        if incoming.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let mut products = self.load().await?;

        let (mut replaced, mut appended) = (0usize, 0usize);
        for product in incoming {
            match products.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => {
                    *existing = product;
                    replaced += 1;
                }
                None => {
                    products.push(product);
                    appended += 1;
                }
            }
        }

        self.save(&products).await?;

        debug!(replaced, appended, total = products.len(), "Mirrored products");
        Ok(())
    }

    /// Removes the whole collection.
    pub async fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.kv.remove_item(PRODUCTS_KEY).await?;
        debug!("Cleared local products");
        Ok(())
    }

    async fn load(&self) -> StoreResult<Vec<Product>> {
        let Some(raw) = self.kv.get_item(PRODUCTS_KEY).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "Stored product collection is unreadable");
            StoreError::from(e)
        })
    }

    async fn save(&self, products: &[Product]) -> StoreResult<()> {
        let raw = serde_json::to_string(products)?;
        self.kv.set_item(PRODUCTS_KEY, &raw).await
    }
}

/// Millisecond timestamp, bumped until no product in `existing` uses it.
fn next_local_id(existing: &[Product], now: DateTime<Utc>) -> StoreResult<String> {
    local_id_from(existing, now.timestamp_millis())
}

fn local_id_from(existing: &[Product], start: i64) -> StoreResult<String> {
    let mut candidate = start;
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|p| p.id == id) {
            return Ok(id);
        }
        candidate = candidate
            .checked_add(1)
            .ok_or_else(|| StoreError::Internal("local id overflow".to_string()))?;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
