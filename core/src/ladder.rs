//! Adaptive scaffolding ladder.
//!
//! The ladder watches how long the trainee has been idle and climbs one rung
//! at a time through increasingly direct help. The state machine is a single
//! pure function, [`next`]; [`ScaffoldingLadder`] wraps it with idle-time
//! accumulation for use from a frame loop.
//!
//! Rules:
//! - the rung never decreases,
//! - a transition needs idle time strictly above the current rung's threshold,
//! - every transition resets idle time to zero, so at most one transition
//!   happens per tick no matter how large the frame delta was,
//! - activity resets idle time and leaves the rung alone.

use std::time::Duration;

/// Side effect attached to entering a rung. Task controllers decide what each
/// one means in their scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intervention {
    /// Supportive, non-informative message.
    Encourage,
    /// Explicit description of the required action.
    Direct,
    /// Mark every candidate element.
    HighlightChoices,
    /// Mark the single element to act on next.
    HighlightTarget,
    /// Move the target somewhere easier without acting.
    PrepareTarget,
    /// Animate the target toward the goal, then put it back.
    GuideMotion,
    /// Animate the target and commit the action on the trainee's behalf.
    CompleteForUser,
    /// Rung reached with no visible effect.
    Hold,
}

impl Intervention {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Intervention::Encourage => "encourage",
            Intervention::Direct => "direct",
            Intervention::HighlightChoices => "highlight_choices",
            Intervention::HighlightTarget => "highlight_target",
            Intervention::PrepareTarget => "prepare_target",
            Intervention::GuideMotion => "guide_motion",
            Intervention::CompleteForUser => "complete_for_user",
            Intervention::Hold => "hold",
        }
    }
}

/// Definition of one rung: how long to wait on the rung below, and what
/// happens on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RungSpec {
    pub threshold: Duration,
    pub intervention: Intervention,
    /// Upper bound on the process score once this much help was needed.
    pub process_ceiling: Option<u8>,
}

impl RungSpec {
    #[must_use]
    pub const fn new(threshold_secs: u64, intervention: Intervention) -> Self {
        Self {
            threshold: Duration::from_secs(threshold_secs),
            intervention,
            process_ceiling: None,
        }
    }

    #[must_use]
    pub const fn with_process_ceiling(mut self, ceiling: u8) -> Self {
        self.process_ceiling = Some(ceiling);
        self
    }
}

const VERIFY_CHANGE_RUNGS: [RungSpec; 6] = [
    RungSpec::new(5, Intervention::Encourage),
    RungSpec::new(3, Intervention::Direct),
    RungSpec::new(3, Intervention::HighlightChoices),
    RungSpec::new(3, Intervention::HighlightTarget),
    RungSpec::new(3, Intervention::Hold),
    RungSpec::new(3, Intervention::Hold),
];

const WALLET_RUNGS: [RungSpec; 6] = [
    RungSpec::new(3, Intervention::Encourage),
    RungSpec::new(5, Intervention::Direct),
    RungSpec::new(5, Intervention::HighlightTarget).with_process_ceiling(2),
    RungSpec::new(5, Intervention::PrepareTarget),
    RungSpec::new(5, Intervention::GuideMotion).with_process_ceiling(1),
    RungSpec::new(5, Intervention::CompleteForUser),
];

/// Ordered rung definitions. Entry `i` describes the climb from rung `i` to
/// rung `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderTable {
    rungs: Vec<RungSpec>,
}

impl LadderTable {
    #[must_use]
    pub fn new(rungs: impl Into<Vec<RungSpec>>) -> Self {
        Self {
            rungs: rungs.into(),
        }
    }

    /// Yes/no verification of handed-back change.
    #[must_use]
    pub fn verify_change() -> Self {
        Self::new(VERIFY_CHANGE_RUNGS)
    }

    /// Paying from a limited wallet.
    #[must_use]
    pub fn wallet() -> Self {
        Self::new(WALLET_RUNGS)
    }

    #[must_use]
    pub fn max_rung(&self) -> u8 {
        self.rungs.len() as u8
    }

    /// Rule for climbing out of `rung`, or `None` at the top.
    #[must_use]
    pub fn above(&self, rung: u8) -> Option<&RungSpec> {
        self.rungs.get(usize::from(rung))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaffoldingState {
    pub rung: u8,
    pub idle: Duration,
}

/// A rung transition and its one-time side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Rung just entered.
    pub rung: u8,
    pub intervention: Intervention,
    pub process_ceiling: Option<u8>,
}

/// The transition function. Climbs at most one rung.
#[must_use]
pub fn next(state: ScaffoldingState, table: &LadderTable) -> (ScaffoldingState, Option<Step>) {
    let Some(spec) = table.above(state.rung) else {
        return (state, None);
    };
    if state.idle <= spec.threshold {
        return (state, None);
    }
    let rung = state.rung + 1;
    (
        ScaffoldingState {
            rung,
            idle: Duration::ZERO,
        },
        Some(Step {
            rung,
            intervention: spec.intervention,
            process_ceiling: spec.process_ceiling,
        }),
    )
}

/// A ladder instance for one task.
#[derive(Debug, Clone)]
pub struct ScaffoldingLadder {
    table: LadderTable,
    state: ScaffoldingState,
}

impl ScaffoldingLadder {
    #[must_use]
    pub fn new(table: LadderTable) -> Self {
        Self {
            table,
            state: ScaffoldingState::default(),
        }
    }

    /// Accumulate `delta` of idle time and apply at most one transition.
    pub fn tick(&mut self, delta: Duration) -> Option<Step> {
        self.state.idle = self.state.idle.saturating_add(delta);
        let (state, step) = next(self.state, &self.table);
        self.state = state;
        if let Some(step) = step {
            tracing::info!(
                rung = step.rung,
                intervention = step.intervention.as_str(),
                "Scaffolding rung reached"
            );
        }
        step
    }

    /// Qualifying user activity: idle time restarts, the rung stays.
    pub fn note_activity(&mut self) {
        self.state.idle = Duration::ZERO;
    }

    #[must_use]
    pub fn rung(&self) -> u8 {
        self.state.rung
    }

    #[must_use]
    pub fn idle(&self) -> Duration {
        self.state.idle
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state.rung >= self.table.max_rung()
    }
}
