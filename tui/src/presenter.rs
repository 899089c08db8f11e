//! [`Presenter`] backed by a ratatui terminal.

use anyhow::{Context, Result};
use ratatui::Terminal;
use ratatui::backend::Backend;

use till_engine::{Presenter, TaskView};

use crate::render::draw;
use crate::theme::UiOptions;

pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
    options: UiOptions,
}

impl<B: Backend> TerminalPresenter<B> {
    pub fn new(backend: B, options: UiOptions) -> Result<Self> {
        let terminal = Terminal::new(backend)
            .map_err(|err| anyhow::anyhow!("failed to create terminal: {err}"))?;
        Ok(Self { terminal, options })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Presenter for TerminalPresenter<B> {
    fn present(&mut self, view: &TaskView) -> Result<()> {
        let options = self.options;
        self.terminal
            .draw(|frame| draw(frame, view, options))
            .map(|_| ())
            .map_err(|err| anyhow::anyhow!("{err}"))
            .context("drawing frame")
    }
}
