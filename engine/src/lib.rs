//! Task controllers and the frame loop for Till.
//!
//! This crate turns the domain pieces in `till-core` into runnable training
//! tasks and drives them through collaborator traits, without any terminal
//! dependencies.

mod input;
pub mod runtime;
mod settings;
mod task;
pub mod verify;
mod view;
pub mod wallet;

pub use input::{InputEvent, Key, PointerButton};
pub use runtime::{
    EventSource, FixedClock, FrameClock, Harness, PacedClock, Presenter, ScriptedEvents, run,
};
pub use settings::{
    DEFAULT_FPS, ReceiptItem, SCENE_HEIGHT, SCENE_WIDTH, VerifySettings, WalletSettings,
    default_receipt,
};
pub use task::Task;
pub use verify::{GuessError, VerifyChangeTask, VerifyPhase};
pub use view::{ButtonStyle, ButtonView, ReceiptView, TaskView, TextFieldView, TokenView, ZoneView};
pub use wallet::WalletTask;

pub use till_core::{AssetCatalog, AssetError};
pub use till_types::{Cents, ChangePolicy, Point, Rect, Size, TaskResult};
