//! Facts about the machine: platform, installed tools, versions.
//!
//! Every probe is total. Anything that cannot be determined degrades to an
//! `Unknown` variant or "not installed" instead of an error.
//!
//! # Example
//!
//! ```
//! use envboot::probe::{detect_platform, meets_minimum};
//!
//! let platform = detect_platform();
//! println!("Running on {}", platform);
//! assert!(meets_minimum("18.2.0", Some(18)));
//! ```

pub mod path;
pub mod platform;
pub mod tool;
pub mod version;

pub use path::{is_executable, parse_system_path, resolve_tool_path, split_path};
pub use platform::{
    detect_platform, detect_platform_with, Arch, LinuxDistro, OsFamily, OsKind, Platform,
    ShellKind,
};
pub use tool::{detect_tool, ProbeOutcome, SystemToolProbe, ToolProbe};
pub use version::{extract_version, meets_minimum, parse_major};
