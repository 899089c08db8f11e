//! Pay-with-limited-wallet task.
//!
//! The trainee pays a receipt total from a fixed wallet by dragging bills and
//! coins into the pay zone, then presses Submit. The running total is hidden
//! unless the scaffolding ladder reveals it. Each attempt is timed; a timeout
//! sends every token home and starts the next attempt.

use std::time::Duration;

use chrono::{DateTime, Utc};

use till_core::scoring::{PROCESS_MAX, wallet_give_up_independence, wallet_quality};
use rand::Rng;
use rand::seq::SliceRandom;

use till_core::{
    AssetCatalog, AssetError, Glide, GlideMode, GlideStatus, Intervention, LadderTable,
    PaymentEngine, ReportBuilder, ScaffoldingLadder, Step, TokenSizes,
};
use till_types::{Cents, Denomination, Point, Rect, Size, TaskDetails, TaskResult, TokenId};

use crate::input::{InputEvent, PointerButton};
use crate::settings::{ReceiptItem, SCENE_HEIGHT, SCENE_WIDTH, WalletSettings};
use crate::task::{Ending, Task};
use crate::view::{ButtonStyle, ButtonView, ReceiptView, TaskView, ZoneView};

pub const SUBTASK_ID: &str = "make_change_submit";

const PAY_ZONE: Rect = Rect::new(SCENE_WIDTH - 610, SCENE_HEIGHT - 730, 550, 300);
const BUTTON: Size = Size::new(160, 50);
const SUBMIT_BUTTON: Rect = Rect::new(
    PAY_ZONE.center().x - BUTTON.width / 2,
    PAY_ZONE.bottom() + 20,
    BUTTON.width,
    BUTTON.height,
);
const GIVE_UP_BUTTON: Rect = Rect::new(
    20,
    SCENE_HEIGHT / 2 - BUTTON.height / 2 - 35,
    BUTTON.width,
    BUTTON.height,
);
const RECEIPT: Rect = Rect::new(40, 40, 420, 240);

const SIZES: TokenSizes = TokenSizes::new(Size::new(120, 55), Size::new(60, 60));
const INVENTORY_ORIGIN: Point = Point::new(40, SCENE_HEIGHT - 140);
const INVENTORY_GAP: i32 = 10;
const PER_ROW: usize = 10;

/// Wallet contents, largest denomination first. 40 tokens worth $12.60.
pub const WALLET: [(Denomination, usize); 6] = [
    (Denomination::FiveDollar, 1),
    (Denomination::OneDollar, 5),
    (Denomination::Quarter, 4),
    (Denomination::Dime, 10),
    (Denomination::Nickel, 10),
    (Denomination::Penny, 10),
];

const ENCOURAGE: &str = "You Got This!";
const DIRECTIVE: &str = "Move the highlighted object to the payment area like this ^";

/// Scaffolding banner. The running-total text is rendered from live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Banner {
    Encourage,
    RunningTotal,
    Directive,
}

pub struct WalletTask {
    settings: WalletSettings,
    catalog: AssetCatalog,
    engine: PaymentEngine,
    ladder: ScaffoldingLadder,
    items: Vec<ReceiptItem>,
    target: Cents,
    attempt: u32,
    attempt_elapsed: Duration,
    elapsed: Duration,
    errors: u32,
    drag_events: u32,
    extraneous_moves: u32,
    process_cap: u8,
    banner: Option<Banner>,
    glide: Option<Glide>,
    started_at: DateTime<Utc>,
    result: Option<TaskResult>,
}

impl WalletTask {
    pub fn new(settings: WalletSettings, catalog: AssetCatalog) -> Result<Self, AssetError> {
        Self::with_random(settings, catalog, &mut rand::rng())
    }

    /// Build the task, shuffling the receipt with `rng` when enabled.
    pub fn with_random<R: Rng + ?Sized>(
        settings: WalletSettings,
        catalog: AssetCatalog,
        rng: &mut R,
    ) -> Result<Self, AssetError> {
        let mut items = settings.items.clone();
        if settings.shuffle_items {
            items.shuffle(rng);
        }
        let target = items.iter().map(|item| item.price).sum();

        let mut engine = PaymentEngine::new(PAY_ZONE);
        fill_wallet(&mut engine, &catalog)?;

        tracing::info!(
            target = %target,
            items = items.len(),
            max_time_sec = settings.max_time.as_secs(),
            max_attempts = settings.max_attempts,
            "Wallet task prepared"
        );

        Ok(Self {
            settings,
            catalog,
            engine,
            ladder: ScaffoldingLadder::new(LadderTable::wallet()),
            items,
            target,
            attempt: 1,
            attempt_elapsed: Duration::ZERO,
            elapsed: Duration::ZERO,
            errors: 0,
            drag_events: 0,
            extraneous_moves: 0,
            process_cap: PROCESS_MAX,
            banner: None,
            glide: None,
            started_at: Utc::now(),
            result: None,
        })
    }

    #[must_use]
    pub fn target(&self) -> Cents {
        self.target
    }

    #[must_use]
    pub fn paid(&self) -> Cents {
        self.engine.total()
    }

    #[must_use]
    pub fn engine(&self) -> &PaymentEngine {
        &self.engine
    }

    #[must_use]
    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    #[must_use]
    pub fn rung(&self) -> u8 {
        self.ladder.rung()
    }

    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }

    #[must_use]
    pub fn drag_events(&self) -> u32 {
        self.drag_events
    }

    #[must_use]
    pub fn extraneous_moves(&self) -> u32 {
        self.extraneous_moves
    }

    #[must_use]
    pub fn process_cap(&self) -> u8 {
        self.process_cap
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.banner.map(|banner| match banner {
            Banner::Encourage => ENCOURAGE.to_string(),
            Banner::RunningTotal => format!(
                "You have paid {}, and need to pay {} more.",
                self.engine.total(),
                self.target.saturating_sub(self.engine.total())
            ),
            Banner::Directive => DIRECTIVE.to_string(),
        })
    }

    fn owed(&self) -> Cents {
        self.target.saturating_sub(self.engine.total())
    }

    fn on_pointer_down(&mut self, pos: Point) {
        if SUBMIT_BUTTON.contains(pos) {
            self.submit();
        } else if GIVE_UP_BUTTON.contains(pos) {
            tracing::info!(paid = %self.engine.total(), "Wallet task given up");
            self.finish(Ending::GaveUp);
        } else if let Some(id) = self.engine.begin_drag(pos) {
            self.drag_events += 1;
            if self.glide.is_some_and(|glide| glide.token() == id) {
                tracing::debug!(token = %id, "Animation cancelled by grab");
                self.glide = None;
            }
        }
    }

    fn on_pointer_up(&mut self) {
        let Some(release) = self.engine.release() else {
            return;
        };
        if release.left_zone {
            self.extraneous_moves += 1;
        }
        if release.in_zone {
            self.engine.set_highlight(release.token, false);
        }
    }

    fn submit(&mut self) {
        let paid = self.engine.total();
        let success = paid == self.target;
        if !success {
            self.errors += 1;
        }
        tracing::info!(paid = %paid, target = %self.target, success, "Payment submitted");
        self.finish(if success {
            Ending::Success
        } else {
            Ending::Failure
        });
    }

    fn time_out(&mut self) {
        self.errors += 1;
        tracing::info!(attempt = self.attempt, "Attempt timed out");
        if self.attempt >= self.settings.max_attempts {
            self.finish(Ending::Failure);
            return;
        }
        self.attempt += 1;
        self.engine.reset_all();
        self.glide = None;
        self.attempt_elapsed = Duration::ZERO;
        self.ladder.note_activity();
    }

    /// Highlight the available token of the largest denomination that fits
    /// what is still owed, replacing any previous highlight.
    fn pick_target(&mut self) -> Option<TokenId> {
        if let Some(previous) = self.engine.highlighted() {
            self.engine.set_highlight(previous, false);
        }
        let id = self.engine.best_fit(self.owed())?;
        self.engine.set_highlight(id, true);
        Some(id)
    }

    /// The highlighted token if it is still usable, otherwise a fresh pick.
    fn current_target(&mut self) -> Option<TokenId> {
        match self.engine.highlighted() {
            Some(id)
                if self
                    .engine
                    .token(id)
                    .is_some_and(|t| !t.in_zone() && !t.is_dragging()) =>
            {
                Some(id)
            }
            _ => self.pick_target(),
        }
    }

    /// Move the target into the slot nearest the pay zone.
    fn prepare_target(&mut self, id: TokenId) {
        let zone_center = self.engine.zone().center();
        let Some(nearest) = self.engine.nearest_outside_zone(id) else {
            return;
        };
        let distance = |engine: &PaymentEngine, id: TokenId| {
            engine
                .token(id)
                .map_or(i64::MAX, |t| t.rect().center().distance_sq(zone_center))
        };
        if distance(&self.engine, nearest) < distance(&self.engine, id) {
            self.engine.swap_places(id, nearest);
        }
    }

    fn apply(&mut self, step: Step) {
        if let Some(ceiling) = step.process_ceiling {
            self.process_cap = self.process_cap.min(ceiling);
        }
        match step.intervention {
            Intervention::Encourage => self.banner = Some(Banner::Encourage),
            Intervention::Direct => self.banner = Some(Banner::RunningTotal),
            Intervention::HighlightTarget => {
                if self.pick_target().is_none() {
                    tracing::debug!("Nothing to highlight");
                }
            }
            Intervention::PrepareTarget => {
                if let Some(id) = self.current_target() {
                    self.prepare_target(id);
                }
            }
            Intervention::GuideMotion => {
                self.banner = Some(Banner::Directive);
                if let Some(id) = self.current_target() {
                    self.glide = Some(Glide::new(id, GlideMode::Rehearse));
                }
            }
            Intervention::CompleteForUser => {
                if let Some(id) = self.current_target() {
                    self.glide = Some(Glide::new(id, GlideMode::Commit));
                }
            }
            Intervention::HighlightChoices | Intervention::Hold => {}
        }
    }

    fn advance_glide(&mut self) {
        let Some(glide) = self.glide else {
            return;
        };
        match glide.advance(&mut self.engine) {
            GlideStatus::Moving => {}
            GlideStatus::Arrived { committed } => {
                self.glide = None;
                if committed {
                    self.engine.set_highlight(glide.token(), false);
                    tracing::info!(paid = %self.engine.total(), "Token placed for the trainee");
                }
            }
            GlideStatus::Lost => self.glide = None,
        }
    }

    fn finish(&mut self, ending: Ending) {
        if self.result.is_some() {
            return;
        }
        self.glide = None;
        let paid = self.engine.total();
        let diff = self.target.abs_diff(paid);
        let quality = wallet_quality(diff, paid);
        let (independence, process) = if ending == Ending::GaveUp {
            (wallet_give_up_independence(diff, paid), 0)
        } else {
            (self.ladder.rung(), self.process_cap)
        };

        tracing::info!(outcome = ending.as_str(), paid = %paid, "Wallet task ended");

        self.result = Some(
            ReportBuilder::new(SUBTASK_ID, self.started_at)
                .elapsed(self.elapsed)
                .errors(self.errors)
                .scores(independence, quality, process)
                .success(ending.is_success())
                .abandoned(ending == Ending::Abandoned)
                .build(TaskDetails::Wallet {
                    target_total: self.target,
                    payment_given: paid,
                    drag_events: self.drag_events,
                    extraneous_moves: self.extraneous_moves,
                    attempts_used: self.attempt,
                }),
        );
    }

    fn status_line(&self) -> String {
        let remaining = self.settings.max_time.saturating_sub(self.attempt_elapsed);
        let secs = remaining.as_millis().div_ceil(1000);
        let attempts_left = self.settings.max_attempts.saturating_sub(self.attempt) + 1;
        format!("Time: {secs}s  Attempts: {attempts_left}")
    }
}

/// Grid the wallet from the bottom-left corner, ten per row, rows stacking
/// upward.
fn fill_wallet(engine: &mut PaymentEngine, catalog: &AssetCatalog) -> Result<(), AssetError> {
    let mut pos = INVENTORY_ORIGIN;
    let mut placed = 0;
    for (denomination, count) in WALLET {
        let size = SIZES.for_class(denomination.size_class());
        for _ in 0..count {
            engine.spawn(catalog, denomination.value(), pos, SIZES)?;
            placed += 1;
            pos.x += size.width + INVENTORY_GAP;
            if placed % PER_ROW == 0 {
                pos.x = INVENTORY_ORIGIN.x;
                pos.y -= size.height + INVENTORY_GAP;
            }
        }
    }
    Ok(())
}

impl Task for WalletTask {
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
        match *event {
            InputEvent::PointerDown { pos, button } => {
                self.ladder.note_activity();
                if button == PointerButton::Primary {
                    self.on_pointer_down(pos);
                }
            }
            InputEvent::PointerMove { pos } => self.engine.drag_to(pos),
            InputEvent::PointerUp { .. } => self.on_pointer_up(),
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) {
        if self.result.is_some() {
            return;
        }
        self.elapsed += dt;
        self.attempt_elapsed += dt;

        self.advance_glide();
        if let Some(step) = self.ladder.tick(dt) {
            self.apply(step);
        }
        if self.attempt_elapsed >= self.settings.max_time {
            self.time_out();
        }
    }

    fn abort(&mut self) {
        self.finish(Ending::Abandoned);
    }

    fn view(&self) -> TaskView {
        let mut view = TaskView::new("Pay for your groceries", Size::new(SCENE_WIDTH, SCENE_HEIGHT));
        view.finished = self.result.is_some();
        view.message = self.message();
        view.status.push(self.status_line());
        view.receipt = Some(ReceiptView {
            rect: RECEIPT,
            lines: self
                .items
                .iter()
                .map(|item| (item.name.clone(), item.price))
                .collect(),
            total: self.target,
        });
        view.zones.push(ZoneView {
            rect: PAY_ZONE,
            label: "Drag Here To Pay".to_string(),
        });
        view.push_tokens(&self.engine, &self.catalog);
        view.buttons.push(ButtonView {
            rect: SUBMIT_BUTTON,
            label: "Submit",
            style: ButtonStyle::Confirm,
            highlighted: false,
        });
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
