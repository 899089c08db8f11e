//! Construction-time settings for the task controllers.

use std::time::Duration;

use till_types::{Cents, ChangePolicy};

/// Scene size shared by both tasks, in pixels.
pub const SCENE_WIDTH: i32 = 1124;
pub const SCENE_HEIGHT: i32 = 768;

pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySettings {
    pub policy: ChangePolicy,
    pub price: Cents,
    pub payment: Cents,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            policy: ChangePolicy::FiftyFifty,
            price: Cents::new(125),
            payment: Cents::new(500),
        }
    }
}

impl VerifySettings {
    #[must_use]
    pub fn owed(&self) -> Cents {
        self.payment - self.price
    }
}

/// One line on the wallet task's receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    pub name: String,
    pub price: Cents,
}

impl ReceiptItem {
    #[must_use]
    pub fn new(name: impl Into<String>, price: Cents) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The grocery list used when none is configured. Totals $2.32.
#[must_use]
pub fn default_receipt() -> Vec<ReceiptItem> {
    vec![
        ReceiptItem::new("Campbell's Tomato Rice soup", Cents::new(79)),
        ReceiptItem::new("Tomato sauce", Cents::new(45)),
        ReceiptItem::new("Local brand Chicken Noodle soup", Cents::new(69)),
        ReceiptItem::new("Local brand Tomato soup", Cents::new(39)),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSettings {
    /// Length of one attempt.
    pub max_time: Duration,
    pub max_attempts: u32,
    pub items: Vec<ReceiptItem>,
    /// Present the receipt lines in random order.
    pub shuffle_items: bool,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(120),
            max_attempts: 3,
            items: default_receipt(),
            shuffle_items: true,
        }
    }
}
