//! Planning: what has to happen to satisfy every requirement.
//!
//! The plan is derived fresh from the live machine on every run and is never
//! written to disk.

pub mod action;
pub mod planner;

pub use action::{Action, PlanResult, SkipReason};
pub use planner::Planner;
