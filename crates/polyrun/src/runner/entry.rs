//! Java entry point discovery

use std::sync::LazyLock;

use regex::Regex;

static PUBLIC_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid regex"));

/// Name of the first `public class` declared in `code`, if any
///
/// This is a textual match: declarations inside comments or strings count.
pub fn public_class(code: &str) -> Option<&str> {
    PUBLIC_CLASS
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
