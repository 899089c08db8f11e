//! Render-ready snapshot of a task.
//!
//! A [`TaskView`] is a flat description of what is on screen, in scene
//! coordinates. Presenters draw it without reaching back into task state.

use till_types::{Cents, Denomination, Rect, Size, TokenId};

use till_core::PaymentEngine;
use till_core::catalog::AssetCatalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneView {
    pub rect: Rect,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Neutral,
    Confirm,
    Decline,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub rect: Rect,
    pub label: &'static str,
    pub style: ButtonStyle,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenView {
    pub id: TokenId,
    pub rect: Rect,
    pub denomination: Denomination,
    pub label: String,
    pub highlighted: bool,
    pub dragging: bool,
    pub in_zone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFieldView {
    pub rect: Rect,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptView {
    pub rect: Rect,
    pub lines: Vec<(String, Cents)>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub title: &'static str,
    pub scene: Size,
    pub zones: Vec<ZoneView>,
    pub receipt: Option<ReceiptView>,
    pub tokens: Vec<TokenView>,
    pub buttons: Vec<ButtonView>,
    pub text_field: Option<TextFieldView>,
    /// Persistent lines at the top of the scene.
    pub status: Vec<String>,
    /// Scaffolding or feedback banner.
    pub message: Option<String>,
    pub finished: bool,
}

impl TaskView {
    #[must_use]
    pub fn new(title: &'static str, scene: Size) -> Self {
        Self {
            title,
            scene,
            zones: Vec::new(),
            receipt: None,
            tokens: Vec::new(),
            buttons: Vec::new(),
            text_field: None,
            status: Vec::new(),
            message: None,
            finished: false,
        }
    }

    /// Append every token of `engine` in draw order.
    pub fn push_tokens(&mut self, engine: &PaymentEngine, catalog: &AssetCatalog) {
        self.tokens.extend(engine.tokens().iter().map(|token| TokenView {
            id: token.id(),
            rect: token.rect(),
            denomination: token.denomination(),
            label: catalog.label(token.denomination()).to_string(),
            highlighted: token.is_highlighted(),
            dragging: token.is_dragging(),
            in_zone: token.in_zone(),
        }));
    }

    #[must_use]
    pub fn button(&self, label: &str) -> Option<&ButtonView> {
        self.buttons.iter().find(|b| b.label == label)
    }
}
