//! Best-effort function name extraction for labelling located regions.

use std::sync::LazyLock;

use regex::Regex;

static DECLARATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?:export\s+)?(?:async\s+)?(?:function\s+|const\s+|let\s+|var\s+)?\s*([a-zA-Z0-9_$]+)\s*(?:[:=(]|\s*=>)",
    )
    .ok()
});

static METHOD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:async\s+)?(?:get\s+|set\s+)?([a-zA-Z0-9_$]+)\s*\(").ok()
});

const CONTROL_FLOW: [&str; 6] = ["if", "for", "while", "switch", "catch", "constructor"];

/// Extracts a function or method name from a single declaration line.
///
/// Declaration forms (`export async function name(`, `const name =`) are
/// tried before method shorthand (`async get name(`). Control-flow keywords
/// that look like calls are never reported. `None` is an ordinary result.
///
/// # Example
///
/// ```
/// use suture::source::extract_name;
///
/// assert_eq!(
///     extract_name("export async function loadUser(id) {").as_deref(),
///     Some("loadUser")
/// );
/// assert_eq!(extract_name("  if (ready) {"), None);
/// ```
#[must_use]
pub fn extract_name(line: &str) -> Option<String> {
    capture_name(&DECLARATION, line).or_else(|| capture_name(&METHOD, line))
}

fn capture_name(pattern: &LazyLock<Option<Regex>>, line: &str) -> Option<String> {
    let regex = pattern.as_ref()?;
    let name = regex.captures(line)?.get(1)?.as_str();
    if CONTROL_FLOW.contains(&name) {
        None
    } else {
        Some(name.to_owned())
    }
}
