//! # Product Service
//!
//! The synchronization policy: which store answers each operation, and how
//! the local cache is kept in step with the remote API.
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  validate input ── invalid ──► Err(Validation), nothing touched        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  use_api? ── no ──► LocalProductStore ──► Synced { source: Local }     │
//! │       │                                                                 │
//! │      yes                                                                │
//! │       ▼                                                                 │
//! │  HttpProductClient                                                     │
//! │       │                                                                 │
//! │       ├── ok ──► mirror into LocalProductStore                         │
//! │       │          ──► Synced { source: Remote }                         │
//! │       │                                                                 │
//! │       └── err ─► same operation on LocalProductStore                   │
//! │                  ├── ok  ──► Synced { source: LocalFallback,           │
//! │                  │                     remote_error: Some(..) }        │
//! │                  └── err ──► Err(local error), remote error logged     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records created during a fallback keep their local id. They are never
//! pushed to the API later.

use std::future::Future;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::{HttpProductClient, RemoteUpdate};
use estoque_core::validation::{validate_new_product, validate_product_id, validate_update};
use estoque_core::{NewProduct, Product, ProductUpdate};
use estoque_store::{KeyValueStore, LocalProductStore, StoreResult};

// =============================================================================
// Result Tagging
// =============================================================================

/// Which store produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The remote API answered; the local cache was mirrored.
    Remote,

    /// The remote API failed and the local store answered instead.
    LocalFallback,

    /// The remote API is disabled.
    Local,
}

/// A result together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    pub data: T,
    pub source: DataSource,
    /// The remote failure that caused a fallback.
    pub remote_error: Option<String>,
}

impl<T> Synced<T> {
    fn remote(data: T) -> Self {
        Synced {
            data,
            source: DataSource::Remote,
            remote_error: None,
        }
    }

    fn local(data: T) -> Self {
        Synced {
            data,
            source: DataSource::Local,
            remote_error: None,
        }
    }

    fn fallback(data: T, remote_error: &SyncError) -> Self {
        Synced {
            data,
            source: DataSource::LocalFallback,
            remote_error: Some(remote_error.to_string()),
        }
    }

    /// Whether the result came from a fallback after a remote failure.
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::LocalFallback
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Synced<U> {
        Synced {
            data: f(self.data),
            source: self.source,
            remote_error: self.remote_error,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Product operations with remote-first, local-fallback routing.
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    local: LocalProductStore<S>,
    remote: HttpProductClient,
    use_api: bool,
}

impl<S: KeyValueStore> ProductService<S> {
    pub fn new(local: LocalProductStore<S>, remote: HttpProductClient, config: &ClientConfig) -> Self {
        ProductService {
            local,
            remote,
            use_api: config.is_remote_enabled(),
        }
    }

    pub fn local(&self) -> &LocalProductStore<S> {
        &self.local
    }

    pub fn remote(&self) -> &HttpProductClient {
        &self.remote
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.use_api
    }

    /// All products, using the configured page defaults.
    pub async fn list(&self) -> SyncResult<Synced<Vec<Product>>> {
        self.list_page(None, None).await
    }

    /// One page of products.
    ///
    /// Pagination applies to the remote API only; the local store always
    /// returns the whole collection.
    pub async fn list_page(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> SyncResult<Synced<Vec<Product>>> {
        if !self.use_api {
            return Ok(Synced::local(self.local.list().await?));
        }

        match self.remote.list(page, page_size).await {
            Ok(products) => {
                self.mirror("list", self.local.upsert_many(products.clone())).await;
                Ok(Synced::remote(products))
            }
            Err(e) => self.fall_back("list", e, self.local.list()).await,
        }
    }

    /// Creates a product.
    pub async fn create(&self, input: NewProduct) -> SyncResult<Synced<Product>> {
        validate_new_product(&input)?;

        if !self.use_api {
            return Ok(Synced::local(self.local.create(input).await?));
        }

        match self.remote.create(&input).await {
            Ok(product) => {
                self.mirror("create", self.local.upsert(product.clone())).await;
                Ok(Synced::remote(product))
            }
            Err(e) => self.fall_back("create", e, self.local.create(input)).await,
        }
    }

    /// Applies a partial update.
    ///
    /// ## Errors
    /// `NotFound` when the local store has to answer and has no such id.
    pub async fn update(&self, id: &str, update: ProductUpdate) -> SyncResult<Synced<Product>> {
        validate_product_id(id)?;
        validate_update(&update)?;

        if !self.use_api {
            return Ok(Synced::local(self.local.update(id, &update).await?));
        }

        match self.remote.update(id, &update).await {
            Ok(RemoteUpdate::Updated(product)) => {
                self.mirror("update", self.local.upsert(product.clone())).await;
                Ok(Synced::remote(product))
            }
            Ok(RemoteUpdate::Accepted) => {
                debug!(id = %id, "Remote accepted update without a body, applying locally");
                let product = self.local.update(id, &update).await?;
                Ok(Synced::remote(product))
            }
            Err(e) => self.fall_back("update", e, self.local.update(id, &update)).await,
        }
    }

    /// Sets the stock of one product.
    pub async fn update_quantity(&self, id: &str, quantity: i64) -> SyncResult<Synced<Product>> {
        self.update(id, ProductUpdate::quantity(quantity)).await
    }

    /// Deletes a product. Deleting an absent id succeeds.
    pub async fn delete(&self, id: &str) -> SyncResult<Synced<bool>> {
        validate_product_id(id)?;

        if !self.use_api {
            return Ok(Synced::local(self.local.delete(id).await?));
        }

        match self.remote.delete(id).await {
            Ok(deleted) => {
                self.mirror("delete", self.local.delete(id)).await;
                Ok(Synced::remote(deleted))
            }
            Err(e) => self.fall_back("delete", e, self.local.delete(id)).await,
        }
    }

    // =========================================================================
    // Policy Helpers
    // =========================================================================

    /// Runs the local equivalent after a remote failure.
    async fn fall_back<T>(
        &self,
        operation: &'static str,
        remote_error: SyncError,
        local: impl Future<Output = StoreResult<T>>,
    ) -> SyncResult<Synced<T>> {
        if remote_error.is_auth_failure() {
            warn!(
                operation,
                status = ?remote_error.status(),
                "Remote API rejected the credentials, using local store"
            );
        } else {
            warn!(operation, error = %remote_error, "Remote API unavailable, using local store");
        }

        match local.await {
            Ok(data) => Ok(Synced::fallback(data, &remote_error)),
            Err(local_error) => {
                error!(
                    operation,
                    remote_error = %remote_error,
                    local_error = %local_error,
                    "Local fallback failed"
                );
                Err(local_error.into())
            }
        }
    }

    /// Mirrors a remote success into the cache.
    ///
    /// The remote operation already happened, so a cache failure is logged
    /// and the remote result still stands.
    async fn mirror<T>(&self, operation: &'static str, write: impl Future<Output = StoreResult<T>>) {
        if let Err(e) = write.await {
            warn!(operation, error = %e, "Failed to mirror remote result into local store");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthSession;
    use crate::test_support::{client_config, unreachable_base_url, MockApi};
    use estoque_core::{Money, ValidationError};
    use estoque_store::{MemoryStore, PRODUCTS_KEY};
    use serde_json::json;

    fn service_for(base_url: &str, use_api: bool) -> ProductService<MemoryStore> {
        let mut config = client_config(base_url);
        config.api.use_api = use_api;
        let remote = HttpProductClient::new(&config, AuthSession::new()).unwrap();
        ProductService::new(LocalProductStore::new(MemoryStore::new()), remote, &config)
    }

    fn panela() -> NewProduct {
        NewProduct::new("Panela", 15, Money::from_cents(2990))
    }

    // -------------------------------------------------------------------------
    // Remote disabled
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_local_only_scenario() {
        let service = service_for(&unreachable_base_url(), false);

        let created = service.create(panela()).await.unwrap();
        assert_eq!(created.source, DataSource::Local);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.source, DataSource::Local);
        assert_eq!(listed.data.len(), 1);
        let id = listed.data[0].id.clone();
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(listed.data[0].created_at, listed.data[0].updated_at);

        let updated = service.update_quantity(&id, 10).await.unwrap();
        assert_eq!(updated.data.quantity, 10);
        assert_eq!(service.list().await.unwrap().data[0].quantity, 10);

        assert!(service.delete(&id).await.unwrap().data);
        assert!(service.list().await.unwrap().data.is_empty());
        assert!(service.delete(&id).await.unwrap().data);
    }

    #[tokio::test]
    async fn test_update_only_touches_quantity_and_timestamp() {
        let service = service_for(&unreachable_base_url(), false);
        let created = service.create(panela()).await.unwrap().data;

        service.update_quantity(&created.id, 4).await.unwrap();
        let after = service.list().await.unwrap().data.remove(0);

        assert_eq!(after.quantity, 4);
        assert!(after.updated_at >= created.updated_at);
        assert_eq!(after.id, created.id);
        assert_eq!(after.name, created.name);
        assert_eq!(after.description, created.description);
        assert_eq!(after.price, created.price);
        assert_eq!(after.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_invalid_input_touches_nothing() {
        let api = MockApi::start().await;
        let service = service_for(&api.base_url, true);

        let err = service
            .create(NewProduct::new("  ", 1, Money::zero()))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation(ValidationError::Required { .. })));

        let err = service.update_quantity("1", -5).await.unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));

        assert!(api.requests().await.is_empty());
        assert_eq!(service.local().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_local_update_of_missing_id_is_not_found() {
        let service = service_for(&unreachable_base_url(), false);
        let err = service.update_quantity("999", 1).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { ref id } if id == "999"));
    }

    // -------------------------------------------------------------------------
    // Remote enabled, API healthy
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remote_list_mirrors_into_cache() {
        let api = MockApi::start().await;
        api.seed(vec![
            json!({ "Id": 1, "Nome": "Panela", "Estoque": 15, "Preco": 29.9 }),
            json!({ "Id": 2, "Nome": "Jogo de Pratos", "Estoque": 12, "Preco": 99 }),
        ])
        .await;
        let service = service_for(&api.base_url, true);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.source, DataSource::Remote);
        assert_eq!(listed.data.len(), 2);

        let cached = service.local().list().await.unwrap();
        assert_eq!(cached, listed.data);
    }

    #[tokio::test]
    async fn test_remote_create_and_update_mirror() {
        let api = MockApi::start().await;
        let service = service_for(&api.base_url, true);

        let created = service.create(panela()).await.unwrap();
        assert_eq!(created.source, DataSource::Remote);
        assert_eq!(service.local().get(&created.data.id).await.unwrap(), Some(created.data.clone()));

        let updated = service.update_quantity(&created.data.id, 10).await.unwrap();
        assert_eq!(updated.source, DataSource::Remote);
        assert_eq!(
            service.local().get(&created.data.id).await.unwrap().unwrap().quantity,
            10
        );
    }

    #[tokio::test]
    async fn test_accepted_update_is_derived_from_cache() {
        let api = MockApi::start().await;
        let service = service_for(&api.base_url, true);
        let created = service.create(panela()).await.unwrap().data;

        api.set_empty_updates(true).await;
        let updated = service.update_quantity(&created.id, 7).await.unwrap();

        assert_eq!(updated.source, DataSource::Remote);
        assert_eq!(updated.data.quantity, 7);
        assert_eq!(updated.data.name, "Panela");
    }

    #[tokio::test]
    async fn test_accepted_update_without_cache_entry_is_not_found() {
        let api = MockApi::start().await;
        api.seed(vec![json!({ "Id": 9, "Nome": "Panela", "Estoque": 1, "Preco": 1 })])
            .await;
        api.set_empty_updates(true).await;
        let service = service_for(&api.base_url, true);

        let err = service.update_quantity("9", 2).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remote_delete_404_clears_local_mirror() {
        let api = MockApi::start().await;
        let service = service_for(&api.base_url, true);

        let stale = Product::from_new("77", panela(), chrono::Utc::now());
        service.local().upsert(stale).await.unwrap();

        let deleted = service.delete("77").await.unwrap();
        assert_eq!(deleted.source, DataSource::Remote);
        assert!(deleted.data);
        assert_eq!(service.local().get("77").await.unwrap(), None);
    }

    // -------------------------------------------------------------------------
    // Remote enabled, API failing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_network_error_falls_back_and_writes_store() {
        let service = service_for(&unreachable_base_url(), true);

        let created = service.create(panela()).await.unwrap();
        assert!(created.is_fallback());
        assert!(created.remote_error.is_some());

        let raw = service.local().kv().get_item(PRODUCTS_KEY).await.unwrap().unwrap();
        let stored: Vec<Product> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![created.data.clone()]);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.source, DataSource::LocalFallback);
        assert_eq!(listed.data.len(), 1);

        let updated = service.update_quantity(&created.data.id, 3).await.unwrap();
        assert!(updated.is_fallback());
        assert_eq!(updated.data.quantity, 3);

        let deleted = service.delete(&created.data.id).await.unwrap();
        assert!(deleted.is_fallback());
        assert!(service.local().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let api = MockApi::start().await;
        api.fail_with(503).await;
        let service = service_for(&api.base_url, true);

        let created = service.create(panela()).await.unwrap();
        assert_eq!(created.source, DataSource::LocalFallback);
        assert!(created.remote_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_auth_failure_still_falls_back() {
        let api = MockApi::start().await;
        api.fail_with(401).await;
        let service = service_for(&api.base_url, true);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.source, DataSource::LocalFallback);
        assert!(listed.data.is_empty());
    }

    #[tokio::test]
    async fn test_failed_fallback_surfaces_local_error() {
        let api = MockApi::start().await;
        api.fail_with(500).await;
        let service = service_for(&api.base_url, true);

        let err = service.update_quantity("404", 1).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { .. }));

        service
            .local()
            .kv()
            .set_item(PRODUCTS_KEY, "not json")
            .await
            .unwrap();
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, SyncError::Storage(_)));
    }

    #[tokio::test]
    async fn test_incomplete_remote_record_keeps_cached_one() {
        let api = MockApi::start().await;
        api.set_list_body(json!([{ "Id": 1, "Nome": "Panela" }])).await;
        let service = service_for(&api.base_url, true);

        let cached = Product::from_new("1", panela(), chrono::Utc::now());
        service.local().upsert(cached.clone()).await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed.source, DataSource::LocalFallback);
        assert_eq!(listed.data, vec![cached.clone()]);
        assert_eq!(service.local().get("1").await.unwrap(), Some(cached));
    }

    #[tokio::test]
    async fn test_remote_record_breaking_rules_is_not_mirrored() {
        let api = MockApi::start().await;
        api.seed(vec![json!({ "Id": 2, "Nome": "X", "Estoque": -7, "Preco": -3 })])
            .await;
        let service = service_for(&api.base_url, true);

        let listed = service.list().await.unwrap();
        assert!(listed.is_fallback());
        assert_eq!(service.local().get("2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let api = MockApi::start().await;
        api.set_delay(std::time::Duration::from_secs(3)).await;

        let mut config = client_config(&api.base_url);
        config.api.timeout_secs = 1;
        let remote = HttpProductClient::new(&config, AuthSession::new()).unwrap();
        let service =
            ProductService::new(LocalProductStore::new(MemoryStore::new()), remote, &config);

        let created = service.create(panela()).await.unwrap();
        assert_eq!(created.source, DataSource::LocalFallback);
        assert_eq!(
            created.remote_error.as_deref(),
            Some("Request timed out after 1 seconds")
        );
        assert_eq!(service.local().count().await.unwrap(), 1);
    }

    #[test]
    fn test_synced_map_keeps_tag() {
        let synced = Synced::fallback(2, &SyncError::Timeout(10)).map(|n| n * 2);
        assert_eq!(synced.data, 4);
        assert!(synced.is_fallback());
        assert_eq!(synced.remote_error.as_deref(), Some("Request timed out after 10 seconds"));
    }
}
