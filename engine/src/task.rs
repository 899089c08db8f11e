use std::time::Duration;

use chrono::{DateTime, Utc};

use till_types::TaskResult;

use crate::input::InputEvent;
use crate::view::TaskView;

/// A running training task driven by the frame loop.
///
/// Controllers are fed events and frame deltas and never poll or sleep. Once
/// the task finishes, [`Task::result`] returns the report and further events
/// and updates are ignored.
pub trait Task {
    fn subtask_id(&self) -> &'static str;

    /// Stamp the wall-clock start reported as `start_time`. The frame loop
    /// calls this just before its first frame.
    fn start(&mut self, at: DateTime<Utc>);

    fn handle_event(&mut self, event: &InputEvent);

    fn update(&mut self, dt: Duration);

    fn is_running(&self) -> bool {
        self.result().is_none()
    }

    /// End the task without a task action. Produces an abandoned result.
    fn abort(&mut self);

    fn view(&self) -> TaskView;

    fn result(&self) -> Option<&TaskResult>;
}

/// How a task came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ending {
    Success,
    Failure,
    GaveUp,
    Abandoned,
}

impl Ending {
    pub(crate) fn is_success(self) -> bool {
        self == Ending::Success
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Ending::Success => "success",
            Ending::Failure => "failure",
            Ending::GaveUp => "gave_up",
            Ending::Abandoned => "abandoned",
        }
    }
}
