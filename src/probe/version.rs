//! Version extraction and minimum-version comparison.
//!
//! Only the major version takes part in comparisons. Anything that cannot
//! be parsed counts as major version 0, so a declared minimum triggers an
//! upgrade instead of an error.

use regex::Regex;
use std::sync::OnceLock;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[vV]?\d+(?:\.\d+)*").expect("static version pattern"))
}

/// Extract the first version-looking token from tool output.
///
/// `"git version 2.43.0"` yields `"2.43.0"`, `"v20.11.1"` yields `"v20.11.1"`.
pub fn extract_version(output: &str) -> Option<String> {
    version_regex()
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Parse the leading integer before the first `.`, after an optional `v`.
///
/// Returns 0 when the leading component is not an integer.
pub fn parse_major(version: &str) -> u32 {
    let trimmed = version.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    trimmed
        .split('.')
        .next()
        .and_then(|major| major.parse().ok())
        .unwrap_or(0)
}

/// Whether `version` satisfies `minimum` (inclusive).
///
/// With no minimum every installed version qualifies, unparsable ones too.
pub fn meets_minimum(version: &str, minimum: Option<u32>) -> bool {
    match minimum {
        None => true,
        Some(min) => parse_major(version) >= min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meets_minimum_above() {
        assert!(meets_minimum("18.2.0", Some(18)));
        assert!(meets_minimum("v20.11.1", Some(18)));
    }

    #[test]
    fn meets_minimum_below() {
        assert!(!meets_minimum("16.0.0", Some(18)));
    }

    #[test]
    fn meets_minimum_equal_counts() {
        assert!(meets_minimum("18", Some(18)));
        assert!(meets_minimum("18.0.0", Some(18)));
    }

    #[test]
    fn meets_minimum_unparsable_is_false_without_panicking() {
        assert!(!meets_minimum("not-a-version", Some(18)));
        assert!(!meets_minimum("", Some(18)));
    }

    #[test]
    fn no_minimum_accepts_anything() {
        assert!(meets_minimum("garbage", None));
        assert!(meets_minimum("0", None));
    }

    #[test]
    fn parse_major_strips_leading_v() {
        assert_eq!(parse_major("v22.1.0"), 22);
        assert_eq!(parse_major("V9"), 9);
        assert_eq!(parse_major(" 3.12.1 "), 3);
        assert_eq!(parse_major("x.1"), 0);
    }

    #[test]
    fn extract_version_from_tool_output() {
        assert_eq!(
            extract_version("git version 2.43.0\n"),
            Some("2.43.0".to_string())
        );
        assert_eq!(extract_version("v20.11.1"), Some("v20.11.1".to_string()));
        assert_eq!(
            extract_version("1.0.17 (Claude Code)"),
            Some("1.0.17".to_string())
        );
        assert_eq!(extract_version("no digits here"), None);
    }
}
