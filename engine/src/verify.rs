//! Verify-given-change task.
//!
//! The trainee hands over the payment by dragging it into the payment area,
//! receives change, and must decide whether the change is right. Wrong change
//! can be corrected by typing the right amount.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use till_core::change::{decide_correct, shown_amount};
use till_core::scoring::{verify_give_up_independence, verify_process, verify_quality};
use till_core::{
    AssetCatalog, AssetError, ChangeLayout, Intervention, LadderTable, PaymentEngine,
    RandomSource, ReportBuilder, ScaffoldingLadder, Step, ThreadRandom, TokenSizes,
    greedy_breakdown, layout_breakdown,
};
use till_types::{
    AmountParseError, Cents, Denomination, Point, Rect, Size, SizeClass, TaskDetails, TaskResult,
};

use crate::input::{InputEvent, Key, PointerButton};
use crate::settings::{SCENE_HEIGHT, SCENE_WIDTH, VerifySettings};
use crate::task::{Ending, Task};
use crate::view::{ButtonStyle, ButtonView, TaskView, TextFieldView, ZoneView};

pub const SUBTASK_ID: &str = "incorrect_change";

const PAYMENT_AREA: Rect = Rect::new((SCENE_WIDTH - 400) / 2, (SCENE_HEIGHT - 500) / 2, 400, 200);
const CHANGE_BOX: Rect = Rect::new((SCENE_WIDTH - 150) / 2, 20, 600, 550);
const CHANGE_HEADER: i32 = 40;
const YES_BUTTON: Rect = Rect::new(50, SCENE_HEIGHT - 100, 150, 50);
const NO_BUTTON: Rect = Rect::new(300, SCENE_HEIGHT - 100, 150, 50);
const GIVE_UP_BUTTON: Rect = Rect::new(150, 500, 200, 50);
const GUESS_FIELD: Rect = Rect::new(50, 200, 200, 50);
const SUBMIT_BUTTON: Rect = Rect::new(260, 200, 100, 40);

const SIZES: TokenSizes = TokenSizes::new(Size::new(260, 130), Size::new(60, 60));
const SPACING: i32 = 20;

const GUESS_MAX_LEN: usize = 8;

const ENCOURAGE: &str = "You Got This!";
const DIRECT: &str = "Click YES if the change is correct and NO otherwise";
const CONFIRMED: &str = "Yes - Thanks!";
const WRONGLY_ACCEPTED: &str = "No - Actually it was wrong";
const ASK_CORRECTION: &str = "Yes - Enter the correct change and submit";
const WRONGLY_REJECTED: &str = "No - Actually it was right.";

/// Rejected correction attempt. The display text is shown to the trainee.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("Please enter a valid number like 1.25")]
    Invalid(#[from] AmountParseError),
    #[error("You entered {entered}. Try again or give up.")]
    Mismatch { entered: Cents },
}

/// Parse typed change and compare it with what is owed, at cent resolution.
pub fn parse_guess(text: &str, owed: Cents) -> Result<Cents, GuessError> {
    let entered = Cents::parse_dollars(text)?;
    if entered == owed {
        Ok(entered)
    } else {
        Err(GuessError::Mismatch { entered })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyPhase {
    /// Payment not yet handed over. The ladder is paused.
    Handoff,
    /// Change on the counter; Yes/No/Give Up.
    Review,
    /// Trainee rejected wrong change and is typing the right amount.
    Correcting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChoiceHighlight {
    #[default]
    None,
    Both,
    Correct,
}

pub struct VerifyChangeTask {
    settings: VerifySettings,
    catalog: AssetCatalog,
    handoff: PaymentEngine,
    change: PaymentEngine,
    ladder: ScaffoldingLadder,
    phase: VerifyPhase,
    owed: Cents,
    shown: Cents,
    shown_correct: bool,
    errors: u32,
    guess_text: String,
    last_guess: Option<Cents>,
    guess_accepted: bool,
    message: Option<String>,
    highlight: ChoiceHighlight,
    elapsed: Duration,
    started_at: DateTime<Utc>,
    result: Option<TaskResult>,
}

impl VerifyChangeTask {
    pub fn new(settings: VerifySettings, catalog: AssetCatalog) -> Result<Self, AssetError> {
        Self::with_random(settings, catalog, &mut ThreadRandom)
    }

    /// Build the task, drawing the correctness decision and the perturbation
    /// from `rng`. Every token is validated against the catalog here.
    pub fn with_random(
        settings: VerifySettings,
        catalog: AssetCatalog,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, AssetError> {
        let owed = settings.owed();
        let shown_correct = decide_correct(settings.policy, rng);
        let shown = shown_amount(owed, shown_correct, rng);

        let mut handoff = PaymentEngine::new(PAYMENT_AREA);
        spawn_payment(&mut handoff, &catalog, settings.payment)?;

        let mut change = PaymentEngine::new(CHANGE_BOX);
        let layout = ChangeLayout {
            area: CHANGE_BOX,
            header: CHANGE_HEADER,
            spacing: Size::new(SPACING, SPACING),
            sizes: SIZES,
        };
        for (denomination, top_left) in layout_breakdown(&greedy_breakdown(shown), &layout) {
            change.spawn(&catalog, denomination.value(), top_left, SIZES)?;
        }

        tracing::info!(
            policy = settings.policy.as_str(),
            owed = %owed,
            shown = %shown,
            correct = shown_correct,
            "Verify change task prepared"
        );

        Ok(Self {
            settings,
            catalog,
            handoff,
            change,
            ladder: ScaffoldingLadder::new(LadderTable::verify_change()),
            phase: VerifyPhase::Handoff,
            owed,
            shown,
            shown_correct,
            errors: 0,
            guess_text: String::new(),
            last_guess: None,
            guess_accepted: false,
            message: None,
            highlight: ChoiceHighlight::None,
            elapsed: Duration::ZERO,
            started_at: Utc::now(),
            result: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> VerifyPhase {
        self.phase
    }

    #[must_use]
    pub fn owed(&self) -> Cents {
        self.owed
    }

    #[must_use]
    pub fn shown_change(&self) -> Cents {
        self.shown
    }

    #[must_use]
    pub fn shown_is_correct(&self) -> bool {
        self.shown_correct
    }

    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }

    #[must_use]
    pub fn rung(&self) -> u8 {
        self.ladder.rung()
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn guess_text(&self) -> &str {
        &self.guess_text
    }

    /// Pieces handed back, in breakdown order.
    #[must_use]
    pub fn change_pieces(&self) -> Vec<Denomination> {
        self.change.tokens().iter().map(|t| t.denomination()).collect()
    }

    fn handle_handoff(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => {
                self.handoff.begin_drag(pos);
            }
            InputEvent::PointerMove { pos } => self.handoff.drag_to(pos),
            InputEvent::PointerUp { .. } => {
                let Some(release) = self.handoff.release() else {
                    return;
                };
                if !release.in_zone {
                    self.handoff.snap_home(release.token);
                }
                if release.total == self.settings.payment {
                    self.enter_review();
                }
            }
            _ => {}
        }
    }

    fn enter_review(&mut self) {
        self.phase = VerifyPhase::Review;
        self.ladder.note_activity();
        tracing::info!(shown = %self.shown, "Payment handed over, change shown");
    }

    fn handle_review(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { pos, button } => {
                self.ladder.note_activity();
                if button != PointerButton::Primary {
                    return;
                }
                if GIVE_UP_BUTTON.contains(pos) {
                    self.finish(Ending::GaveUp);
                } else if self.phase == VerifyPhase::Correcting {
                    if SUBMIT_BUTTON.contains(pos) {
                        self.submit_guess();
                    }
                } else if YES_BUTTON.contains(pos) {
                    self.answer(true);
                } else if NO_BUTTON.contains(pos) {
                    self.answer(false);
                }
            }
            InputEvent::KeyDown { key, ch } if self.phase == VerifyPhase::Correcting => {
                self.ladder.note_activity();
                match key {
                    Key::Backspace => {
                        self.guess_text.pop();
                    }
                    Key::Enter => self.submit_guess(),
                    Key::Char => {
                        if let Some(ch) = ch {
                            self.push_guess_char(ch);
                        }
                    }
                    Key::Escape | Key::Other => {}
                }
            }
            _ => {}
        }
    }

    fn answer(&mut self, said_correct: bool) {
        tracing::info!(said_correct, shown_correct = self.shown_correct, "Change answered");
        match (said_correct, self.shown_correct) {
            (true, true) => {
                self.message = Some(CONFIRMED.to_string());
                self.finish(Ending::Success);
            }
            (true, false) => {
                self.errors += 1;
                self.message = Some(WRONGLY_ACCEPTED.to_string());
            }
            (false, false) => {
                self.message = Some(ASK_CORRECTION.to_string());
                self.phase = VerifyPhase::Correcting;
            }
            (false, true) => {
                self.errors += 1;
                self.message = Some(WRONGLY_REJECTED.to_string());
                self.finish(Ending::Failure);
            }
        }
    }

    fn push_guess_char(&mut self, ch: char) {
        if self.guess_text.len() >= GUESS_MAX_LEN {
            return;
        }
        if ch.is_ascii_digit() || (ch == '.' && !self.guess_text.contains('.')) {
            self.guess_text.push(ch);
        }
    }

    fn submit_guess(&mut self) {
        match parse_guess(&self.guess_text, self.owed) {
            Ok(guess) => {
                self.last_guess = Some(guess);
                self.guess_accepted = true;
                self.message = Some(CONFIRMED.to_string());
                self.finish(Ending::Success);
            }
            Err(err @ GuessError::Invalid(_)) => {
                self.message = Some(err.to_string());
            }
            Err(err @ GuessError::Mismatch { entered }) => {
                tracing::info!(entered = %entered, owed = %self.owed, "Wrong correction");
                self.last_guess = Some(entered);
                self.errors += 1;
                self.message = Some(err.to_string());
            }
        }
    }

    fn apply(&mut self, step: Step) {
        match step.intervention {
            Intervention::Encourage => self.message = Some(ENCOURAGE.to_string()),
            Intervention::Direct => self.message = Some(DIRECT.to_string()),
            Intervention::HighlightChoices => self.highlight = ChoiceHighlight::Both,
            Intervention::HighlightTarget => self.highlight = ChoiceHighlight::Correct,
            Intervention::PrepareTarget
            | Intervention::GuideMotion
            | Intervention::CompleteForUser
            | Intervention::Hold => {}
        }
    }

    fn finish(&mut self, ending: Ending) {
        if self.result.is_some() {
            return;
        }
        let success = ending.is_success();
        let independence = if ending == Ending::GaveUp {
            verify_give_up_independence(self.shown_correct, self.shown.abs_diff(self.owed))
        } else {
            self.ladder.rung()
        };
        let accepted = match self.last_guess {
            Some(guess) if self.guess_accepted => guess,
            _ => self.shown,
        };
        let quality = verify_quality(accepted.abs_diff(self.owed));
        let process = verify_process(success, self.errors);

        tracing::info!(outcome = ending.as_str(), errors = self.errors, "Verify change task ended");

        self.result = Some(
            ReportBuilder::new(SUBTASK_ID, self.started_at)
                .elapsed(self.elapsed)
                .errors(self.errors)
                .scores(independence, quality, process)
                .success(success)
                .abandoned(ending == Ending::Abandoned)
                .build(TaskDetails::VerifyChange {
                    target_change: self.owed,
                    shown_change: self.shown,
                    user_guess: self.last_guess,
                }),
        );
    }

    fn handoff_instruction(&self) -> String {
        match self.handoff.tokens() {
            [only] if only.unit().size_class() == SizeClass::Bill => format!(
                "Drag the {} bill into the payment area",
                self.catalog.label(only.denomination())
            ),
            _ => format!("Drag {} into the payment area", self.settings.payment),
        }
    }

    fn button(&self, rect: Rect, label: &'static str, style: ButtonStyle, correct: bool) -> ButtonView {
        let highlighted = match self.highlight {
            ChoiceHighlight::None => false,
            ChoiceHighlight::Both => true,
            ChoiceHighlight::Correct => correct,
        };
        ButtonView {
            rect,
            label,
            style,
            highlighted,
        }
    }
}

/// Lay the payment out along the bottom edge, centered, largest piece first.
fn spawn_payment(
    engine: &mut PaymentEngine,
    catalog: &AssetCatalog,
    payment: Cents,
) -> Result<(), AssetError> {
    let pieces = greedy_breakdown(payment);
    let width: i32 = pieces
        .iter()
        .map(|d| SIZES.for_class(d.size_class()).width + SPACING)
        .sum::<i32>()
        - SPACING;
    let mut x = (SCENE_WIDTH - width) / 2;
    for piece in pieces {
        let size = SIZES.for_class(piece.size_class());
        let top_left = Point::new(x, SCENE_HEIGHT - size.height - SPACING);
        engine.spawn(catalog, piece.value(), top_left, SIZES)?;
        x += size.width + SPACING;
    }
    Ok(())
}

impl Task for VerifyChangeTask {
    fn subtask_id(&self) -> &'static str {
        SUBTASK_ID
    }

    fn start(&mut self, at: DateTime<Utc>) {
        self.started_at = at;
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if self.result.is_some() {
            return;
        }
        match self.phase {
            VerifyPhase::Handoff => self.handle_handoff(event),
            VerifyPhase::Review | VerifyPhase::Correcting => self.handle_review(event),
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.result.is_some() {
            return;
        }
        self.elapsed += dt;
        if self.phase == VerifyPhase::Handoff {
            return;
        }
        if let Some(step) = self.ladder.tick(dt) {
            self.apply(step);
        }
    }

    fn abort(&mut self) {
        self.finish(Ending::Abandoned);
    }

    fn view(&self) -> TaskView {
        let mut view = TaskView::new("Is this the correct change?", Size::new(SCENE_WIDTH, SCENE_HEIGHT));
        view.finished = self.result.is_some();
        view.message.clone_from(&self.message);

        if self.phase == VerifyPhase::Handoff {
            view.status.push(self.handoff_instruction());
            view.zones.push(ZoneView {
                rect: PAYMENT_AREA,
                label: "Payment Area".to_string(),
            });
            view.push_tokens(&self.handoff, &self.catalog);
            return view;
        }

        view.status.push(format!(
            "You paid {} for an item that cost {}",
            self.settings.payment, self.settings.price
        ));
        view.status.push("Is this the correct change?".to_string());
        view.zones.push(ZoneView {
            rect: CHANGE_BOX,
            label: "Change Received".to_string(),
        });
        view.push_tokens(&self.change, &self.catalog);

        if self.phase == VerifyPhase::Correcting {
            view.text_field = Some(TextFieldView {
                rect: GUESS_FIELD,
                text: self.guess_text.clone(),
            });
            view.buttons.push(ButtonView {
                rect: SUBMIT_BUTTON,
                label: "Submit",
                style: ButtonStyle::Neutral,
                highlighted: false,
            });
        } else {
            view.buttons
                .push(self.button(YES_BUTTON, "Yes", ButtonStyle::Confirm, self.shown_correct));
            view.buttons
                .push(self.button(NO_BUTTON, "No", ButtonStyle::Decline, !self.shown_correct));
        }
        view.buttons.push(ButtonView {
            rect: GIVE_UP_BUTTON,
            label: "Give Up",
            style: ButtonStyle::Danger,
            highlighted: false,
        });
        view
    }

    fn result(&self) -> Option<&TaskResult> {
        self.result.as_ref()
    }
}
