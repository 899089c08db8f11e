//! Post-hoc scoring rules.
//!
//! Independence is the highest scaffolding rung reached, overridden on give-up
//! by a severity bucket. Quality buckets how close the final money was to the
//! truth. Process buckets either domain errors (verify task) or assistance
//! consumed (wallet task). All scales run 0..=3 except independence.

use till_types::Cents;

pub const QUALITY_MAX: u8 = 3;
pub const PROCESS_MAX: u8 = 3;

/// Give-up bucket: shown change was wrong, but close.
pub const GAVE_UP_MINOR_MISS: u8 = 7;
/// Give-up bucket: shown change was wrong by a lot.
pub const GAVE_UP_MAJOR_MISS: u8 = 8;
/// Give-up bucket: nothing useful on the table.
pub const GAVE_UP_NO_ATTEMPT: u8 = 9;

/// Difference that still counts as a reasonable attempt on give-up.
pub const REASONABLE_MISS: Cents = Cents::new(150);

/// Independence override when the trainee gives up on checking change.
#[must_use]
pub fn verify_give_up_independence(shown_was_correct: bool, diff: Cents) -> u8 {
    if shown_was_correct {
        GAVE_UP_NO_ATTEMPT
    } else if diff < REASONABLE_MISS {
        GAVE_UP_MINOR_MISS
    } else {
        GAVE_UP_MAJOR_MISS
    }
}

/// Closeness of the change the trainee ends up accepting.
#[must_use]
pub fn verify_quality(diff: Cents) -> u8 {
    match diff.as_i64() {
        0 => QUALITY_MAX,
        d if d < 10 => 2,
        d if d < 50 => 1,
        _ => 0,
    }
}

/// Error-based process score for the verify task.
#[must_use]
pub fn verify_process(success: bool, errors: u32) -> u8 {
    if !success {
        return 0;
    }
    match errors {
        0..=2 => PROCESS_MAX,
        3 => 2,
        4 => 1,
        _ => 0,
    }
}

/// Independence override when the trainee gives up on paying.
///
/// The middle bucket compares against the amount already paid, so a trainee
/// who paid nothing always lands in the top bucket unless they were close.
#[must_use]
pub fn wallet_give_up_independence(diff: Cents, paid: Cents) -> u8 {
    if diff < REASONABLE_MISS {
        GAVE_UP_MINOR_MISS
    } else if diff < paid {
        GAVE_UP_MAJOR_MISS
    } else {
        GAVE_UP_NO_ATTEMPT
    }
}

/// Closeness of the final payment to the receipt total.
#[must_use]
pub fn wallet_quality(diff: Cents, paid: Cents) -> u8 {
    if diff.is_zero() {
        QUALITY_MAX
    } else if diff < Cents::new(100) {
        2
    } else if diff < paid {
        1
    } else {
        0
    }
}
