//! Plan execution.
//!
//! # Modules
//!
//! - [`engine`] - The [`Executor`]: pre-flight, sequential actions, verification
//! - [`report`] - Per-action outcomes and the final status of each requirement
//! - [`network`] - Connectivity probe used by the pre-flight

pub mod engine;
pub mod network;
pub mod report;

pub use engine::{remediation, Executor};
pub use network::network_reachable;
pub use report::{ActionReport, ExecutionReport, FinalStatus, Outcome, Verification};
