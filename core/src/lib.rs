//! Core domain logic for Till.
//!
//! Everything here is deterministic given its inputs: frame deltas are passed
//! in, randomness comes through [`RandomSource`], and nothing draws or polls.
//! The task controllers in `till-engine` compose these pieces.

pub mod catalog;
pub mod change;
pub mod glide;
pub mod ladder;
pub mod payment;
mod random;
mod report;
pub mod scoring;

pub use catalog::{Asset, AssetCatalog, AssetError};
pub use change::{ChangeLayout, greedy_breakdown, layout_breakdown};
pub use glide::{Glide, GlideMode, GlideStatus};
pub use ladder::{Intervention, LadderTable, RungSpec, ScaffoldingLadder, ScaffoldingState, Step};
pub use payment::{PaymentEngine, Release, Token, TokenSizes};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use report::ReportBuilder;
