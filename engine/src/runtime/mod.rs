//! Boundary runtime: the frame loop and the collaborators it talks to.
//!
//! The loop is single threaded and cooperative. Each frame drains pending
//! input, waits for the frame clock, advances the task by the measured delta,
//! and hands a fresh [`TaskView`] to the presenter.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use chrono::Utc;

use till_types::TaskResult;

use crate::input::InputEvent;
use crate::task::Task;
use crate::view::TaskView;

/// Frame governor. Returns the time elapsed since the previous tick.
pub trait FrameClock {
    fn tick(&mut self, target_fps: u32) -> Duration;
}

/// Non-blocking source of user input.
pub trait EventSource {
    /// Everything queued since the last call. Never blocks.
    fn drain(&mut self) -> Result<Vec<InputEvent>>;
}

pub trait Presenter {
    fn present(&mut self, view: &TaskView) -> Result<()>;
}

/// Collaborators for one run of the loop.
pub struct Harness<'a> {
    pub clock: &'a mut dyn FrameClock,
    pub events: &'a mut dyn EventSource,
    pub presenter: &'a mut dyn Presenter,
    pub fps: u32,
}

/// Drive `task` until it finishes or the user quits, and return its report.
pub fn run(task: &mut dyn Task, harness: Harness<'_>) -> Result<TaskResult> {
    let Harness {
        clock,
        events,
        presenter,
        fps,
    } = harness;

    task.start(Utc::now());
    tracing::info!(subtask = task.subtask_id(), fps, "Task started");
    presenter.present(&task.view())?;

    while task.is_running() {
        for event in events.drain()? {
            if event.is_exit() {
                tracing::info!(subtask = task.subtask_id(), "Task abandoned");
                task.abort();
                break;
            }
            task.handle_event(&event);
            if !task.is_running() {
                break;
            }
        }
        if !task.is_running() {
            break;
        }

        let dt = clock.tick(fps);
        task.update(dt);
        presenter.present(&task.view())?;
    }

    presenter.present(&task.view())?;
    task.result()
        .cloned()
        .ok_or_else(|| anyhow!("task {} stopped without a result", task.subtask_id()))
}

/// Wall-clock governor that sleeps out the remainder of each frame.
#[derive(Debug)]
pub struct PacedClock {
    last: Instant,
}

impl PacedClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for PacedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for PacedClock {
    fn tick(&mut self, target_fps: u32) -> Duration {
        let frame = Duration::from_secs(1) / target_fps.max(1);
        let since = self.last.elapsed();
        if since < frame {
            thread::sleep(frame - since);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt
    }
}

/// Deterministic clock: every tick reports the same delta and never sleeps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    step: Duration,
}

impl FixedClock {
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self { step }
    }

    /// One frame at `fps`.
    #[must_use]
    pub fn at_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }
}

impl FrameClock for FixedClock {
    fn tick(&mut self, _target_fps: u32) -> Duration {
        self.step
    }
}

/// Replays scripted per-frame event batches, then asks to quit.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `events` together in the next frame.
    pub fn frame(mut self, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// `frames` frames with no input.
    pub fn idle(mut self, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(Vec::new(), frames));
        self
    }
}

impl EventSource for ScriptedEvents {
    fn drain(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self
            .frames
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit]))
    }
}
