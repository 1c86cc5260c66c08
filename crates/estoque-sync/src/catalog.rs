//! # Product Catalog
//!
//! The state object screens read from. Every operation goes through the
//! [`ProductService`] and then publishes a new immutable snapshot; readers
//! keep whatever `Arc<CatalogSnapshot>` they already hold.
//!
//! ```text
//!   snapshot v1 ──create──► snapshot v2 (v1 + new product)
//!               ──update──► snapshot v2 (product replaced by id)
//!               ──delete──► snapshot v2 (product removed by id)
//!               ──refresh─► snapshot v2 (whatever the service lists)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::SyncResult;
use crate::service::{DataSource, ProductService, Synced};
use estoque_core::samples::sample_products;
use estoque_core::{Money, NewProduct, Product, ProductUpdate};
use estoque_store::KeyValueStore;

/// An immutable view of the product list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    /// Where the last operation was answered. `None` before the first load.
    pub source: Option<DataSource>,
    /// When the list was last loaded as a whole.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products at or below the low stock threshold.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    /// Sum of price × quantity over the whole list.
    pub fn total_stock_value(&self) -> Money {
        self.products
            .iter()
            .fold(Money::zero(), |total, p| total + p.stock_value())
    }

    fn with_products(&self, products: Vec<Product>, source: DataSource) -> Self {
        CatalogSnapshot {
            products,
            source: Some(source),
            refreshed_at: self.refreshed_at,
        }
    }
}

/// Product list state with explicit snapshots.
pub struct ProductCatalog<S> {
    service: ProductService<S>,
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl<S: KeyValueStore> ProductCatalog<S> {
    pub fn new(service: ProductService<S>) -> Self {
        ProductCatalog {
            service,
            current: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    pub fn service(&self) -> &ProductService<S> {
        &self.service
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Reloads the whole list.
    pub async fn refresh(&self) -> SyncResult<Arc<CatalogSnapshot>> {
        let listed = self.service.list().await?;

        let snapshot = Arc::new(CatalogSnapshot {
            products: listed.data,
            source: Some(listed.source),
            refreshed_at: Some(Utc::now()),
        });
        *self.current.write().await = snapshot.clone();

        Ok(snapshot)
    }

    pub async fn create(
        &self,
        input: NewProduct,
    ) -> SyncResult<(Synced<Product>, Arc<CatalogSnapshot>)> {
        let created = self.service.create(input).await?;

        let snapshot = self
            .publish(created.source, |products| {
                products.retain(|p| p.id != created.data.id);
                products.push(created.data.clone());
            })
            .await;

        Ok((created, snapshot))
    }

    pub async fn update(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> SyncResult<(Synced<Product>, Arc<CatalogSnapshot>)> {
        let updated = self.service.update(id, update).await?;
        let snapshot = self.replace(&updated).await;
        Ok((updated, snapshot))
    }

    pub async fn update_quantity(
        &self,
        id: &str,
        quantity: i64,
    ) -> SyncResult<(Synced<Product>, Arc<CatalogSnapshot>)> {
        let updated = self.service.update_quantity(id, quantity).await?;
        let snapshot = self.replace(&updated).await;
        Ok((updated, snapshot))
    }

    pub async fn delete(&self, id: &str) -> SyncResult<(Synced<bool>, Arc<CatalogSnapshot>)> {
        let deleted = self.service.delete(id).await?;

        let snapshot = self
            .publish(deleted.source, |products| products.retain(|p| p.id != id))
            .await;

        Ok((deleted, snapshot))
    }

    /// Loads the list and creates the sample products when it is empty.
    ///
    /// Returns how many products were created.
    pub async fn seed_samples(&self) -> SyncResult<usize> {
        if !self.refresh().await?.is_empty() {
            return Ok(0);
        }

        let samples = sample_products();
        let count = samples.len();
        for input in samples {
            self.create(input).await?;
        }

        info!(count, "Seeded sample products");
        Ok(count)
    }

    async fn replace(&self, updated: &Synced<Product>) -> Arc<CatalogSnapshot> {
        self.publish(updated.source, |products| {
            if let Some(slot) = products.iter_mut().find(|p| p.id == updated.data.id) {
                *slot = updated.data.clone();
            }
        })
        .await
    }

    async fn publish(
        &self,
        source: DataSource,
        change: impl FnOnce(&mut Vec<Product>),
    ) -> Arc<CatalogSnapshot> {
        let mut current = self.current.write().await;

        let mut products = current.products.clone();
        change(&mut products);

        let next = Arc::new(current.with_products(products, source));
        *current = next.clone();
        next
    }
}
