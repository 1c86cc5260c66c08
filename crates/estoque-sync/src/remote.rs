//! # Remote Product Client
//!
//! Thin REST client for the product API. No retries and no fallback here;
//! every failure comes back as a typed [`SyncError`] and the policy in
//! [`crate::service`] decides what to do with it.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  list/create/update/delete/sign_in                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build URL (ApiSettings) ──► attach Bearer token if the session has one│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reqwest (timeout from config)                                         │
//! │       │                                                                 │
//! │       ├── no response ─────────► Network / Timeout                     │
//! │       ├── non-2xx ─────────────► Api { status, body }                  │
//! │       ├── 2xx, invalid ────────► MalformedPayload { status, message }  │
//! │       └── 2xx ─────────────────► DTO ──► domain type                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::auth::AuthSession;
use crate::config::{ApiSettings, ClientConfig, PaginationSettings};
use crate::dto::{
    CreateProductDto, ListEnvelope, LoginRequest, LoginResponse, ProductDto, UpdateProductDto,
};
use crate::error::{SyncError, SyncResult};
use estoque_core::{NewProduct, Product, ProductUpdate};

/// Outcome of a remote update.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteUpdate {
    /// The API returned the updated record.
    Updated(Product),

    /// The API accepted the update with an empty body.
    Accepted,
}

/// REST client for the product API.
///
/// Cheap to clone: clones share the connection pool and the auth session.
#[derive(Debug, Clone)]
pub struct HttpProductClient {
    http: Client,
    api: ApiSettings,
    pagination: PaginationSettings,
    session: AuthSession,
}

impl HttpProductClient {
    /// Builds a client with the configured request timeout.
    pub fn new(config: &ClientConfig, session: AuthSession) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(|e| SyncError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpProductClient {
            http,
            api: config.api.clone(),
            pagination: config.pagination,
            session,
        })
    }

    /// The session whose token is attached to every request.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// `GET {products_path}?page=&pageSize=`
    ///
    /// Missing values take the configured defaults; the page size is
    /// clamped to `1..=max_page_size`.
    pub async fn list(&self, page: Option<u32>, page_size: Option<u32>) -> SyncResult<Vec<Product>> {
        let (page, page_size) = self.pagination.resolve(page, page_size);

        let mut url = self.api.products_url()?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());

        let (status, body) = self.send(Method::GET, url, None::<&()>).await?;
        let envelope: ListEnvelope = decode(status, &body)?;

        let now = Utc::now();
        let products = envelope
            .into_items()
            .into_iter()
            .map(|dto| checked_product(status, dto, now))
            .collect::<SyncResult<Vec<Product>>>()?;

        debug!(page, page_size, count = products.len(), "Fetched remote products");
        Ok(products)
    }

    /// `POST {products_path}`
    pub async fn create(&self, input: &NewProduct) -> SyncResult<Product> {
        let url = self.api.products_url()?;
        let body = CreateProductDto::from(input);

        let (status, body) = self.send(Method::POST, url, Some(&body)).await?;
        let dto: ProductDto = decode(status, &body)?;

        checked_product(status, dto, Utc::now())
    }

    /// `PUT {products_path}/{id}`
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> SyncResult<RemoteUpdate> {
        let url = self.api.product_url(id)?;
        let body = UpdateProductDto::new(id, update);

        let (status, body) = self.send(Method::PUT, url, Some(&body)).await?;
        if is_blank(&body) {
            return Ok(RemoteUpdate::Accepted);
        }

        let dto: ProductDto = decode(status, &body)?;
        Ok(RemoteUpdate::Updated(checked_product(status, dto, Utc::now())?))
    }

    /// `DELETE {products_path}/{id}`
    ///
    /// A 404 means the record is already gone, which counts as success.
    pub async fn delete(&self, id: &str) -> SyncResult<bool> {
        let url = self.api.product_url(id)?;

        match self.send(Method::DELETE, url, None::<&()>).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found_status() => {
                debug!(id = %id, "Remote product already deleted");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// `POST {login_path}` with `{ Email, Senha }`; returns the token.
    pub async fn sign_in(&self, email: &str, password: &str) -> SyncResult<String> {
        let url = self.api.login_url()?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let (status, body) = self.send(Method::POST, url, Some(&body)).await?;
        let response: LoginResponse = decode(status, &body)?;

        if response.token.is_empty() {
            return Err(SyncError::MalformedPayload {
                status: status.as_u16(),
                message: "empty token".to_string(),
            });
        }

        Ok(response.token)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> SyncResult<(StatusCode, Vec<u8>)> {
        if self.api.enable_logs {
            debug!(method = %method, url = %url, "Request");
        }

        let mut request: RequestBuilder = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.session.get_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();

        if self.api.enable_logs {
            debug!(method = %method, url = %url, status = status.as_u16(), bytes = bytes.len(), "Response");
        }

        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok((status, bytes))
    }

    fn transport_error(&self, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.api.timeout_secs)
        } else {
            SyncError::Network(err.to_string())
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(|b| b.is_ascii_whitespace())
}

/// A record that breaks the domain rules is treated like an undecodable body.
fn checked_product(status: StatusCode, dto: ProductDto, now: DateTime<Utc>) -> SyncResult<Product> {
    if let Err(e) = dto.validate() {
        return Err(SyncError::MalformedPayload {
            status: status.as_u16(),
            message: format!("product '{}': {e}", dto.id),
        });
    }
    Ok(dto.into_product(now))
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> SyncResult<T> {
    serde_json::from_slice(body).map_err(|e| SyncError::MalformedPayload {
        status: status.as_u16(),
        message: e.to_string(),
    })
}
