//! Crossterm input, translated into scene events.

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect as CellRect;
use tracing::debug;

use till_engine::{EventSource, InputEvent, Key, PointerButton, Size};

use crate::scene::SceneMap;

const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Non-blocking reader over the terminal's event queue.
#[derive(Debug)]
pub struct CrosstermEvents {
    map: SceneMap,
}

impl CrosstermEvents {
    #[must_use]
    pub fn new(scene: Size, area: CellRect) -> Self {
        Self {
            map: SceneMap::new(scene, area),
        }
    }

    #[must_use]
    pub fn map(&self) -> SceneMap {
        self.map
    }

    /// Translate one terminal event. Returns `None` for events the tasks
    /// have no use for.
    pub fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => translate_key(key),
            Event::Mouse(mouse) => self.translate_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                self.map.resize(CellRect::new(0, 0, width, height));
                None
            }
            _ => None,
        }
    }

    fn translate_mouse(&self, mouse: MouseEvent) -> Option<InputEvent> {
        let pos = self.map.to_scene(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(button) => Some(InputEvent::PointerDown {
                pos,
                button: pointer_button(button),
            }),
            MouseEventKind::Up(button) => Some(InputEvent::PointerUp {
                pos,
                button: pointer_button(button),
            }),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                Some(InputEvent::PointerMove { pos })
            }
            _ => None,
        }
    }
}

impl EventSource for CrosstermEvents {
    fn drain(&mut self) -> Result<Vec<InputEvent>> {
        let mut out = Vec::new();
        for _ in 0..MAX_EVENTS_PER_FRAME {
            if !event::poll(Duration::ZERO).context("polling terminal input")? {
                break;
            }
            let raw = event::read().context("reading terminal input")?;
            if let Some(translated) = self.translate(raw) {
                out.push(translated);
            }
        }
        Ok(out)
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'C'))
    {
        return Some(InputEvent::Quit);
    }
    let event = match key.code {
        KeyCode::Esc => InputEvent::key(Key::Escape),
        KeyCode::Backspace => InputEvent::key(Key::Backspace),
        KeyCode::Enter => InputEvent::key(Key::Enter),
        KeyCode::Char(ch) => InputEvent::char(ch),
        _ => InputEvent::key(Key::Other),
    };
    Some(event)
}
