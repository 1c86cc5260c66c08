//! # Money Module
//!
//! Provides the `Money` type for handling product prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The mobile screens and the remote API exchange prices as JSON         │
//! │  numbers (e.g. "Preco": 29.9).                                          │
//! │                                                                         │
//! │    29.9 * 100 = 2989.9999999999995  ❌ truncation loses a cent          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents at the boundary                           │
//! │    JSON 29.9 ──round──► 2990 cents ──÷100──► JSON 29.9                 │
//! │    Arithmetic (stock value) happens on integers only                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use estoque_core::money::Money;
//!
//! let price = Money::from_cents(2990);
//! assert_eq!(price.to_string(), "R$ 29,90");
//!
//! // Form input uses a decimal comma
//! let typed = Money::parse("29,90").unwrap();
//! assert_eq!(typed, price);
//!
//! // Wire/JSON values are decimal numbers
//! let wire = Money::from_decimal(29.9).unwrap();
//! assert_eq!(wire.as_decimal(), 29.9);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Serialized as a decimal JSON number with at most two fractional digits,
/// which is what both the persisted collection and the remote API carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// ```rust
    /// use estoque_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(29, 90).cents(), 2990);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Converts a decimal amount (as found in JSON) to cents.
    ///
    /// Rounds to the nearest cent, so binary float noise such as
    /// `29.899999999999999` lands on 2990.
    ///
    /// ## Errors
    /// `InvalidFormat` for NaN, infinities and values outside the i64 cent range.
    pub fn from_decimal(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "is out of range".to_string(),
            });
        }

        Ok(Money(cents as i64))
    }

    /// Parses a price typed into a form.
    ///
    /// Accepts either a decimal comma or a decimal point, at most two
    /// fractional digits, and an optional `R$` prefix.
    ///
    /// ```rust
    /// use estoque_core::money::Money;
    ///
    /// assert_eq!(Money::parse("R$ 1.234").unwrap_err().to_string(),
    ///     "price has invalid format: at most 2 decimal places");
    /// assert_eq!(Money::parse("12,5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse("7").unwrap().cents(), 700);
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let text = input.trim();
        let text = text.strip_prefix("R$").unwrap_or(text).trim();

        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let normalized = digits.replace(',', ".");
        let mut parts = normalized.splitn(2, '.');
        let major_text = parts.next().unwrap_or_default();
        let minor_text = parts.next().unwrap_or_default();

        if minor_text.contains('.') {
            return Err(invalid("contains more than one decimal separator"));
        }
        if minor_text.len() > 2 {
            return Err(invalid("at most 2 decimal places"));
        }
        if major_text.is_empty() && minor_text.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if !major_text.chars().all(|c| c.is_ascii_digit())
            || !minor_text.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must contain only digits and one separator"));
        }

        let major: i64 = if major_text.is_empty() {
            0
        } else {
            major_text
                .parse()
                .map_err(|_| invalid("is out of range"))?
        };
        let minor: i64 = match minor_text.len() {
            0 => 0,
            1 => minor_text.parse::<i64>().map_err(|_| invalid("is out of range"))? * 10,
            _ => minor_text.parse().map_err(|_| invalid("is out of range"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("is out of range"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount (for JSON only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (unit price × stock).
    ///
    /// Saturates at the `i64` bounds; stock figures come from the wire.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian display format, as shown on the product list: `R$ 29,90`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal price such as 29.9 or \"29,90\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("price is out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom("price is out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
