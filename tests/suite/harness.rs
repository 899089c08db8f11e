//! Shared scaffolding for scripted runs.

use std::time::Duration;

use till_engine::{
    FixedClock, Harness, InputEvent, Point, Presenter, ScriptedEvents, Task, TaskResult,
    TaskView, run,
};

/// Keeps every frame it is shown.
#[derive(Default)]
pub struct RecordingPresenter {
    pub frames: Vec<TaskView>,
}

impl RecordingPresenter {
    pub fn last(&self) -> &TaskView {
        self.frames.last().expect("at least one frame")
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, view: &TaskView) -> anyhow::Result<()> {
        self.frames.push(view.clone());
        Ok(())
    }
}

/// Run `task` against `script` with a fixed frame delta.
pub fn play(
    task: &mut dyn Task,
    script: ScriptedEvents,
    step: Duration,
) -> (TaskResult, RecordingPresenter) {
    let mut events = script;
    let mut presenter = RecordingPresenter::default();
    let result = run(
        task,
        Harness {
            clock: &mut FixedClock::new(step),
            events: &mut events,
            presenter: &mut presenter,
            fps: 60,
        },
    )
    .expect("run completes");
    (result, presenter)
}

/// Press, drag and release in one frame.
pub fn drag(from: Point, to: Point) -> Vec<InputEvent> {
    vec![
        InputEvent::press(from),
        InputEvent::PointerMove { pos: to },
        InputEvent::release(to),
    ]
}

pub fn click(at: Point) -> Vec<InputEvent> {
    vec![InputEvent::press(at), InputEvent::release(at)]
}

pub fn typed(text: &str) -> Vec<InputEvent> {
    text.chars().map(InputEvent::char).collect()
}
