//! Heuristic extraction of file paths from freeform text.
//!
//! Assistant explanations and chat messages tend to mention the files they
//! touch as `// app/page.tsx`, `File: lib/db.ts` or plain inline paths.
//! [`detect_paths`] collects those mentions so edits can be routed, but the
//! result is a guess: callers confirm before committing anything.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// File extensions recognised as the tail of a path mention.
pub const KNOWN_EXTENSIONS: [&str; 23] = [
    "tsx", "ts", "jsx", "js", "mjs", "cjs", "json", "css", "scss", "html", "mdx", "md", "rs",
    "toml", "yaml", "yml", "py", "go", "sql", "sh", "env", "txt", "prisma",
];

static PATH_MENTION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let extensions = KNOWN_EXTENSIONS.join("|");
    Regex::new(&format!(
        r"(?:(?://|/\*|File:|Path:)\s*)?((?:\.{{1,2}}[\\/])?[A-Za-z0-9_@()\[\]\-]+(?:[\\/.][A-Za-z0-9_@()\[\]\-]+)*\.(?:{extensions}))(?:\*/)?\b"
    ))
    .ok()
});

/// Collects path-shaped tokens that end in a [known extension](KNOWN_EXTENSIONS).
///
/// Backslashes are normalised to `/`, a leading `./` is dropped and trailing
/// comment closers are stripped. Duplicates collapse.
///
/// # Example
///
/// ```
/// use suture::source::detect_paths;
///
/// let found = detect_paths("// File: app\\page.tsx\nthen update ./lib/db.ts and lib/db.ts");
/// assert_eq!(
///     found.into_iter().collect::<Vec<_>>(),
///     vec!["app/page.tsx".to_owned(), "lib/db.ts".to_owned()]
/// );
/// ```
#[must_use]
pub fn detect_paths(text: &str) -> BTreeSet<String> {
    let Some(pattern) = PATH_MENTION.as_ref() else {
        return BTreeSet::new();
    };

    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|mention| normalise(mention.as_str()))
        .collect()
}

fn normalise(raw: &str) -> Option<String> {
    let slashed = raw.replace('\\', "/");
    let trimmed = slashed
        .trim_end_matches("*/")
        .trim_end()
        .trim_start_matches("./");
    if trimmed.is_empty() || (trimmed.starts_with('.') && !trimmed.starts_with("../")) {
        return None;
    }
    Some(trimmed.to_owned())
}
