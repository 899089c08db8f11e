//! Whole-task scenarios driven through the frame loop.

mod harness;
mod verify_flow;
mod wallet_flow;
