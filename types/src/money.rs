//! Fixed-point currency amounts and the closed denomination set.
//!
//! All money is held as integer cents. Floating point only appears at the
//! edges (user text entry, config files, JSON reports) and is rounded to the
//! nearest cent on the way in.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A currency amount in whole cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(into = "f64", from = "f64")]
pub struct Cents(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("not a number: {0}")]
    NotANumber(String),
}

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Round a dollar amount to the nearest cent.
    #[must_use]
    pub fn from_dollars(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Parse user-entered text like `3.75`, ` $3.75 ` or `3`.
    pub fn parse_dollars(raw: &str) -> Result<Self, AmountParseError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::from_dollars(value)),
            _ => Err(AmountParseError::NotANumber(trimmed.to_string())),
        }
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn to_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs_diff(self, other: Cents) -> Cents {
        Cents(self.0.abs_diff(other.0) as i64)
    }

    /// `self - other`, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Cents) -> Cents {
        let diff = self.0 - other.0;
        if diff < 0 { Cents(0) } else { Cents(diff) }
    }
}

impl From<Cents> for f64 {
    fn from(value: Cents) -> Self {
        value.to_dollars()
    }
}

impl From<f64> for Cents {
    fn from(value: f64) -> Self {
        Cents::from_dollars(value)
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        Cents(iter.map(|c| c.0).sum())
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

// ============================================================================
// Denominations
// ============================================================================

/// Rendering size class of a monetary unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Bill,
    Coin,
}

/// The closed set of face values handled by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denomination {
    Penny,
    Nickel,
    Dime,
    Quarter,
    OneDollar,
    FiveDollar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no denomination with face value {0}")]
pub struct UnknownDenomination(pub Cents);

impl Denomination {
    /// Largest first. Greedy breakdown walks this order.
    pub const DESCENDING: [Denomination; 6] = [
        Denomination::FiveDollar,
        Denomination::OneDollar,
        Denomination::Quarter,
        Denomination::Dime,
        Denomination::Nickel,
        Denomination::Penny,
    ];

    #[must_use]
    pub const fn value(self) -> Cents {
        Cents::new(match self {
            Denomination::FiveDollar => 500,
            Denomination::OneDollar => 100,
            Denomination::Quarter => 25,
            Denomination::Dime => 10,
            Denomination::Nickel => 5,
            Denomination::Penny => 1,
        })
    }

    #[must_use]
    pub const fn size_class(self) -> SizeClass {
        if self.value().as_i64() >= 100 {
            SizeClass::Bill
        } else {
            SizeClass::Coin
        }
    }

    pub fn from_value(value: Cents) -> Result<Self, UnknownDenomination> {
        Self::DESCENDING
            .into_iter()
            .find(|d| d.value() == value)
            .ok_or(UnknownDenomination(value))
    }

    /// Largest denomination not exceeding `amount`.
    #[must_use]
    pub fn largest_within(amount: Cents) -> Option<Self> {
        Self::DESCENDING.into_iter().find(|d| d.value() <= amount)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// An immutable face value drawn from the closed denomination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonetaryUnit {
    denomination: Denomination,
}

impl MonetaryUnit {
    pub fn new(face_value: Cents) -> Result<Self, UnknownDenomination> {
        Denomination::from_value(face_value).map(Self::from)
    }

    #[must_use]
    pub fn face_value(self) -> Cents {
        self.denomination.value()
    }

    #[must_use]
    pub fn size_class(self) -> SizeClass {
        self.denomination.size_class()
    }

    #[must_use]
    pub fn denomination(self) -> Denomination {
        self.denomination
    }
}

impl From<Denomination> for MonetaryUnit {
    fn from(denomination: Denomination) -> Self {
        Self { denomination }
    }
}
