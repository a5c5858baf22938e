//! Requirement definitions and probed status.
//!
//! # Modules
//!
//! - [`registry`] - Requirement and backend spec types, built-in defaults
//! - [`status`] - Probed tool status

pub mod registry;
pub mod status;

pub use registry::{
    builtin_requirements, find_requirement, validate_requirements, BackendSpec, Requirement,
};
pub use status::ToolStatus;
