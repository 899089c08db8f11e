//! Terminal front end for Till using ratatui.
//!
//! Scene geometry is fixed in pixels; [`SceneMap`] scales it onto whatever
//! terminal area is available, for drawing and for mapping mouse input back.

mod input;
mod presenter;
mod render;
mod scene;
mod theme;

pub use input::CrosstermEvents;
pub use presenter::TerminalPresenter;
pub use render::draw;
pub use scene::SceneMap;
pub use theme::{Glyphs, Palette, UiOptions, glyphs, palette, styles};
