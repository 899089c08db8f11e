//! Demonstration motion: slide a token toward the zone center a few pixels
//! per tick.

use till_types::{Point, TokenId};

use crate::payment::PaymentEngine;

/// Pixels per axis per tick.
pub const STEP: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideMode {
    /// Show the motion, then return the token to its home slot.
    Rehearse,
    /// Drop the token into the zone on arrival.
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideStatus {
    Moving,
    Arrived { committed: bool },
    /// The token no longer exists in the engine.
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glide {
    token: TokenId,
    mode: GlideMode,
}

impl Glide {
    #[must_use]
    pub fn new(token: TokenId, mode: GlideMode) -> Self {
        Self { token, mode }
    }

    #[must_use]
    pub fn token(&self) -> TokenId {
        self.token
    }

    /// Advance one tick. Arrival is the token center entering the zone.
    pub fn advance(&self, engine: &mut PaymentEngine) -> GlideStatus {
        let Some(token) = engine.token(self.token) else {
            return GlideStatus::Lost;
        };
        let zone = engine.zone();
        let target = zone.center();
        let current = token.rect().center();
        let next = Point::new(
            step_toward(current.x, target.x, STEP),
            step_toward(current.y, target.y, STEP),
        );
        engine.set_center(self.token, next);

        if !zone.contains(next) {
            return GlideStatus::Moving;
        }
        match self.mode {
            GlideMode::Commit => {
                engine.commit_to_zone(self.token);
                GlideStatus::Arrived { committed: true }
            }
            GlideMode::Rehearse => {
                engine.snap_home(self.token);
                GlideStatus::Arrived { committed: false }
            }
        }
    }
}

fn step_toward(from: i32, to: i32, step: i32) -> i32 {
    if (to - from).abs() <= step {
        to
    } else if to > from {
        from + step
    } else {
        from - step
    }
}

#[cfg(test)]
mod tests {
    use super::{Glide, GlideMode, GlideStatus, step_toward};
    use crate::catalog::AssetCatalog;
    use crate::payment::{PaymentEngine, TokenSizes};
    use till_types::{Cents, Point, Rect, Size};

    fn setup() -> (PaymentEngine, till_types::TokenId) {
        let mut engine = PaymentEngine::new(Rect::new(100, 0, 50, 50));
        let sizes = TokenSizes::new(Size::new(12, 6), Size::new(6, 6));
        let id = engine
            .spawn(
                &AssetCatalog::builtin(),
                Cents::new(25),
                Point::new(0, 100),
                sizes,
            )
            .unwrap();
        (engine, id)
    }

    fn run(glide: Glide, engine: &mut PaymentEngine) -> (usize, GlideStatus) {
        for n in 1..=1_000 {
            let status = glide.advance(engine);
            if status != GlideStatus::Moving {
                return (n, status);
            }
        }
        panic!("glide never arrived");
    }

    #[test]
    fn steps_clamp_onto_the_target() {
        assert_eq!(step_toward(0, 10, 2), 2);
        assert_eq!(step_toward(9, 10, 2), 10);
        assert_eq!(step_toward(10, 0, 2), 8);
        assert_eq!(step_toward(5, 5, 2), 5);
    }

    #[test]
    fn commit_drops_the_token_and_updates_total() {
        let (mut engine, id) = setup();
        let (_, status) = run(Glide::new(id, GlideMode::Commit), &mut engine);
        assert_eq!(status, GlideStatus::Arrived { committed: true });
        assert!(engine.token(id).unwrap().in_zone());
        assert_eq!(engine.total(), Cents::new(25));
    }

    #[test]
    fn rehearse_returns_home_without_paying() {
        let (mut engine, id) = setup();
        let (ticks, status) = run(Glide::new(id, GlideMode::Rehearse), &mut engine);
        assert!(ticks > 1);
        assert_eq!(status, GlideStatus::Arrived { committed: false });
        let token = engine.token(id).unwrap();
        assert_eq!(token.rect().top_left(), Point::new(0, 100));
        assert!(!token.in_zone());
        assert_eq!(engine.total(), Cents::ZERO);
    }

    #[test]
    fn each_tick_moves_at_most_one_step_per_axis() {
        let (mut engine, id) = setup();
        let glide = Glide::new(id, GlideMode::Commit);
        let before = engine.token(id).unwrap().rect().center();
        glide.advance(&mut engine);
        let after = engine.token(id).unwrap().rect().center();
        assert_eq!(after, Point::new(before.x + 2, before.y - 2));
    }
}
