//! # Validation Module
//!
//! Input validation for product creation and updates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile screens                                               │
//! │  ├── Field formatting (decimal comma, digits only)                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ProductService (Rust)                                        │
//! │  └── THIS MODULE: rules checked before any store is touched            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Server-side rules (a 400 here falls back like any other failure)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use estoque_core::money::Money;
//! use estoque_core::types::NewProduct;
//! use estoque_core::validation::validate_new_product;
//!
//! let input = NewProduct::new("Panela", 15, Money::from_cents(2990));
//! assert!(validate_new_product(&input).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, ProductUpdate};
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters after trimming
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional description (at most 500 characters).
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = description {
        if text.trim().chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    Ok(())
}

/// Validates a stock quantity. Zero is allowed (sold out).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a product id passed to update/delete.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Shape Validators
// =============================================================================

/// Validates every field of a creation input.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_description(input.description.as_deref())?;
    validate_quantity(input.quantity)?;
    validate_price(input.price)?;
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    validate_description(update.description.as_deref())?;
    if let Some(qty) = update.quantity {
        validate_quantity(qty)?;
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Panela de Pressão 5L").is_ok());
        assert!(validate_product_name(&"A".repeat(100)).is_ok());

        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_name_length_counts_characters_not_bytes() {
        // 100 accented characters are 200 bytes in UTF-8
        assert!(validate_product_name(&"ã".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("")).is_ok());
        assert!(validate_description(Some(&"d".repeat(500))).is_ok());
        assert!(validate_description(Some(&"d".repeat(501))).is_err());
    }

    #[test]
    fn test_validate_quantity_and_price() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(15).is_ok());
        assert!(validate_quantity(-1).is_err());

        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(2990)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_shapes() {
        let valid = NewProduct::new("Panela", 15, Money::from_cents(2990));
        assert!(validate_new_product(&valid).is_ok());

        let blank = NewProduct::new(" ", 15, Money::from_cents(2990));
        assert_eq!(
            validate_new_product(&blank),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );

        assert!(validate_update(&ProductUpdate::quantity(10)).is_ok());
        assert!(validate_update(&ProductUpdate::quantity(-10)).is_err());
        assert!(validate_update(&ProductUpdate::default()).is_ok());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("1718000000000").is_ok());
        assert!(validate_product_id("").is_err());
    }
}
