//! # Domain Types
//!
//! The product record and its two narrower input shapes.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewProduct    │   │    Product      │   │ ProductUpdate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │──►│  id             │◄──│  name?          │       │
//! │  │  description?   │   │  name           │   │  description?   │       │
//! │  │  quantity       │   │  description?   │   │  quantity?      │       │
//! │  │  price          │   │  quantity       │   │  price?         │       │
//! │  └─────────────────┘   │  price (Money)  │   └─────────────────┘       │
//! │        create          │  createdAt      │         update              │
//! │                        │  updatedAt      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `id` is either assigned by the remote API or derived from the creation
//! time in milliseconds when the record is created offline. Both end up as
//! plain strings so the two origins are interchangeable everywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
///
/// This is also the exact shape of each element in the persisted local
/// collection (camelCase keys, price as a decimal number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (remote-assigned or millisecond timestamp).
    pub id: String,

    /// Display name shown in the product list.
    pub name: String,

    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    /// Units in stock.
    pub quantity: i64,

    /// Unit price.
    pub price: Money,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last changed.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from creation input.
    ///
    /// Both timestamps get the same instant, so a freshly created record
    /// always has `created_at == updated_at`.
    pub fn from_new(id: impl Into<String>, input: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id: id.into(),
            name: input.name.trim().to_string(),
            description: normalize_description(input.description),
            quantity: input.quantity,
            price: input.price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update into this product and stamps `updated_at`.
    ///
    /// Absent fields are left untouched. A blank description clears it.
    pub fn apply(&mut self, update: &ProductUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = normalize_description(Some(description.clone()));
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.updated_at = now;
    }

    /// Total value of the units in stock (price × quantity).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Whether the product should be flagged as running out.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= LOW_STOCK_THRESHOLD
    }

    /// Whether this id was generated locally (all digits, millisecond clock).
    ///
    /// Remote ids can also be numeric, so this is a hint for display and
    /// diagnostics only.
    pub fn has_local_id(&self) -> bool {
        !self.id.is_empty() && self.id.len() >= 13 && self.id.chars().all(|c| c.is_ascii_digit())
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

// =============================================================================
// Creation Input
// =============================================================================

/// Fields required to create a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

impl NewProduct {
    /// Creates input without a description.
    pub fn new(name: impl Into<String>, quantity: i64, price: Money) -> Self {
        NewProduct {
            name: name.into(),
            description: None,
            quantity,
            price,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Update Input
// =============================================================================

/// A partial update: every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<Money>,
}

impl ProductUpdate {
    /// The shape used by the quick "adjust stock" action.
    pub fn quantity(quantity: i64) -> Self {
        ProductUpdate {
            quantity: Some(quantity),
            ..Default::default()
        }
    }

    /// The shape used by the edit screen (price and stock together).
    pub fn stock_and_price(quantity: i64, price: Money) -> Self {
        ProductUpdate {
            quantity: Some(quantity),
            price: Some(price),
            ..Default::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn panela(now: DateTime<Utc>) -> Product {
        Product::from_new(
            "1718000000000",
            NewProduct::new("  Panela  ", 15, Money::from_cents(2990))
                .with_description("Panela de pressão 5L"),
            now,
        )
    }

    #[test]
    fn test_from_new_stamps_equal_timestamps() {
        let now = Utc::now();
        let product = panela(now);

        assert_eq!(product.name, "Panela");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.description.as_deref(), Some("Panela de pressão 5L"));
    }

    #[test]
    fn test_apply_quantity_changes_only_quantity_and_updated_at() {
        let created = Utc::now();
        let original = panela(created);
        let mut updated = original.clone();

        updated.apply(&ProductUpdate::quantity(10), created + Duration::seconds(5));

        assert_eq!(updated.quantity, 10);
        assert_eq!(updated.updated_at, created + Duration::seconds(5));
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.price, original.price);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn test_apply_blank_description_clears_it() {
        let mut product = panela(Utc::now());
        let update = ProductUpdate {
            description: Some("   ".to_string()),
            ..Default::default()
        };

        product.apply(&update, Utc::now());
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_stock_value_and_low_stock() {
        let mut product = panela(Utc::now());
        assert_eq!(product.stock_value().cents(), 44850);
        assert!(!product.is_low_stock());

        product.quantity = 5;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_local_id_hint() {
        let product = panela(Utc::now());
        assert!(product.has_local_id());

        let mut remote = product.clone();
        remote.id = "42".to_string();
        assert!(!remote.has_local_id());
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let product = panela(Utc::now());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["price"], serde_json::json!(29.9));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_missing_description_is_omitted() {
        let product = Product::from_new(
            "1",
            NewProduct::new("Espátula de Silicone", 25, Money::from_cents(1590)),
            Utc::now(),
        );
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_update_shapes() {
        assert!(ProductUpdate::default().is_empty());
        assert!(!ProductUpdate::quantity(3).is_empty());

        let json = serde_json::to_value(ProductUpdate::quantity(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "quantity": 3 }));
    }
}
