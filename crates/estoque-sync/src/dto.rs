//! # Wire DTOs
//!
//! JSON shapes exchanged with the remote product API and their translation
//! to and from the domain types.
//!
//! ## Field Names
//! ```text
//! ┌──────────────────────┬──────────────────┬──────────────────────────────┐
//! │ Domain (Product)     │ Wire (sent)      │ Also accepted when decoding  │
//! ├──────────────────────┼──────────────────┼──────────────────────────────┤
//! │ id                   │ Id               │ id (number or string)        │
//! │ name                 │ Nome             │ nome, name                   │
//! │ description          │ Descricao        │ descricao, description       │
//! │ quantity             │ Estoque          │ estoque, quantity            │
//! │ price                │ Preco            │ preco, price                 │
//! │ created_at           │ DataCriacao      │ dataCriacao, createdAt       │
//! │ updated_at           │ DataAtualizacao  │ dataAtualizacao, updatedAt   │
//! └──────────────────────┴──────────────────┴──────────────────────────────┘
//! ```
//!
//! The API serializes with ASP.NET defaults, which camelCases the property
//! names; older builds send them as declared. Both are accepted.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use estoque_core::validation::{
    validate_description, validate_price, validate_product_id, validate_product_name,
    validate_quantity, ValidationResult,
};
use estoque_core::{Money, NewProduct, Product, ProductUpdate};

// =============================================================================
// Product DTO
// =============================================================================

/// A product as the API sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    #[serde(rename = "Id", alias = "id", deserialize_with = "id_from_number_or_string")]
    pub id: String,

    #[serde(rename = "Nome", alias = "nome", alias = "name")]
    pub name: String,

    #[serde(
        rename = "Descricao",
        alias = "descricao",
        alias = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(rename = "Estoque", alias = "estoque", alias = "quantity")]
    pub quantity: i64,

    #[serde(rename = "Preco", alias = "preco", alias = "price")]
    pub price: Money,

    #[serde(
        rename = "DataCriacao",
        alias = "dataCriacao",
        alias = "createdAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "DataAtualizacao",
        alias = "dataAtualizacao",
        alias = "updatedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductDto {
    /// Checks a decoded record against the rules local input follows.
    ///
    /// Only records that pass are mirrored into the cache.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_id(&self.id)?;
        validate_product_name(&self.name)?;
        validate_description(self.description.as_deref())?;
        validate_quantity(self.quantity)?;
        validate_price(self.price)
    }

    /// Converts to the domain type. Missing timestamps become `now`.
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        let created_at = self.created_at.unwrap_or(now);
        Product {
            id: self.id,
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            quantity: self.quantity,
            price: self.price,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        ProductDto {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            quantity: product.quantity,
            price: product.price,
            created_at: Some(product.created_at),
            updated_at: Some(product.updated_at),
        }
    }
}

// =============================================================================
// Request DTOs
// =============================================================================

/// Body of `POST {products_path}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductDto {
    #[serde(rename = "Nome")]
    pub name: String,

    #[serde(rename = "Descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Estoque")]
    pub quantity: i64,

    #[serde(rename = "Preco")]
    pub price: Money,
}

impl From<&NewProduct> for CreateProductDto {
    fn from(input: &NewProduct) -> Self {
        CreateProductDto {
            name: input.name.trim().to_string(),
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            quantity: input.quantity,
            price: input.price,
        }
    }
}

/// Body of `PUT {products_path}/{id}`. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductDto {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "Estoque", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(rename = "Preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

impl UpdateProductDto {
    pub fn new(id: &str, update: &ProductUpdate) -> Self {
        UpdateProductDto {
            id: id.to_string(),
            name: update.name.as_deref().map(|n| n.trim().to_string()),
            description: update.description.as_deref().map(|d| d.trim().to_string()),
            quantity: update.quantity,
            price: update.price,
        }
    }
}

/// Body of the sign-in request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "Email")]
    pub email: String,

    #[serde(rename = "Senha")]
    pub password: String,
}

/// Sign-in response. Only the token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "Token")]
    pub token: String,
}

// =============================================================================
// List Envelope
// =============================================================================

/// The two shapes a list response may take.
///
/// Anything else fails to decode instead of being read as an empty list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    /// `[ {...}, {...} ]`
    Bare(Vec<ProductDto>),

    /// `{ "items": [ {...} ], ... }`
    Wrapped {
        #[serde(alias = "Items")]
        items: Vec<ProductDto>,
    },
}

impl ListEnvelope {
    pub fn into_items(self) -> Vec<ProductDto> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Wrapped { items } => items,
        }
    }
}

// =============================================================================
// Field Decoders
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireId::deserialize(deserializer)? {
        WireId::Number(n) => n.to_string(),
        WireId::Text(s) => s,
    })
}

/// RFC 3339, or a bare `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{text}': {e}")))
}
