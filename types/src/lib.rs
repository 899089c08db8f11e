//! Core domain types for Till.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod geometry;
mod ids;
mod money;
mod report;

pub use geometry::{Point, Rect, Size};
pub use ids::TokenId;
pub use money::{
    AmountParseError, Cents, Denomination, MonetaryUnit, SizeClass, UnknownDenomination,
};
pub use report::{TaskDetails, TaskResult};

use serde::{Deserialize, Serialize};

// ============================================================================
// Change Policy
// ============================================================================

/// Decides whether the change handed back in the verify task is correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePolicy {
    AlwaysRight,
    AlwaysWrong,
    /// Coin flip per attempt.
    #[default]
    FiftyFifty,
}

impl ChangePolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangePolicy::AlwaysRight => "always_right",
            ChangePolicy::AlwaysWrong => "always_wrong",
            ChangePolicy::FiftyFifty => "fifty_fifty",
        }
    }

    /// Parse a policy name. Accepts both `snake_case` and `kebab-case`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "always_right" | "right" | "correct" => Some(ChangePolicy::AlwaysRight),
            "always_wrong" | "wrong" | "incorrect" => Some(ChangePolicy::AlwaysWrong),
            "fifty_fifty" | "random" | "50_50" => Some(ChangePolicy::FiftyFifty),
            _ => None,
        }
    }

    #[must_use]
    pub fn all() -> &'static [ChangePolicy] {
        &[
            ChangePolicy::AlwaysRight,
            ChangePolicy::AlwaysWrong,
            ChangePolicy::FiftyFifty,
        ]
    }
}

impl std::fmt::Display for ChangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ChangePolicy;

    #[test]
    fn policy_parse_accepts_cli_spelling() {
        assert_eq!(
            ChangePolicy::parse("always-wrong"),
            Some(ChangePolicy::AlwaysWrong)
        );
        assert_eq!(
            ChangePolicy::parse(" Fifty_Fifty "),
            Some(ChangePolicy::FiftyFifty)
        );
        assert_eq!(ChangePolicy::parse("sometimes"), None);
    }

    #[test]
    fn policy_round_trips_through_as_str() {
        for policy in ChangePolicy::all() {
            assert_eq!(ChangePolicy::parse(policy.as_str()), Some(*policy));
        }
    }

    #[test]
    fn policy_deserializes_snake_case() {
        let policy: ChangePolicy = serde_json::from_str("\"always_right\"").unwrap();
        assert_eq!(policy, ChangePolicy::AlwaysRight);
    }
}
