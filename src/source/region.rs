//! Function body boundary detection.
//!
//! [`locate`] finds the full-line span of the function or method whose
//! declaration sits on (or near) a given offset. The search is textual: it
//! understands comments, string literals and bracket nesting, but it does
//! not parse. When no balanced body can be proven the caller gets
//! [`PatchError::BoundaryNotFound`] and must skip the edit.

use std::sync::LazyLock;

use regex::Regex;

use super::names::extract_name;
use super::scanner::{Scanner, Token};
use crate::error::PatchError;

/// Half-open `[start, end)` byte range into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRegion {
    start: usize,
    end: usize,
}

impl SourceRegion {
    /// Offsets reported to external callers when no region was found.
    pub const NOT_FOUND_OFFSETS: (i64, i64) = (-1, -1);

    /// Creates a region, returning `None` when `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Option<Self> {
        if start > end {
            None
        } else {
            Some(Self { start, end })
        }
    }

    /// Inclusive start offset.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the region covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Region as signed `(start, end)` offsets.
    #[must_use]
    pub fn as_offsets(&self) -> (i64, i64) {
        (
            i64::try_from(self.start).unwrap_or(i64::MAX),
            i64::try_from(self.end).unwrap_or(i64::MAX),
        )
    }

    /// Borrows the covered text.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::RegionOutOfBounds`] when the region does not lie
    /// on character boundaries of `text`.
    pub fn slice<'text>(&self, text: &'text str) -> Result<&'text str, PatchError> {
        text.get(self.start..self.end)
            .ok_or_else(|| self.out_of_bounds(text))
    }

    /// Returns a copy of `text` with the region replaced by `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::RegionOutOfBounds`] when the region does not lie
    /// on character boundaries of `text`.
    pub fn splice(&self, text: &str, replacement: &str) -> Result<String, PatchError> {
        let head = text.get(..self.start).ok_or_else(|| self.out_of_bounds(text))?;
        let tail = text.get(self.end..).ok_or_else(|| self.out_of_bounds(text))?;

        let mut spliced = String::with_capacity(head.len() + replacement.len() + tail.len());
        spliced.push_str(head);
        spliced.push_str(replacement);
        spliced.push_str(tail);
        Ok(spliced)
    }

    const fn out_of_bounds(&self, text: &str) -> PatchError {
        PatchError::RegionOutOfBounds {
            start: self.start,
            end: self.end,
            len: text.len(),
        }
    }
}

// `name(args): ReturnType` where the annotation carries no body brace.
static RETURN_ANNOTATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\)\s*:\s*[^{};=]+$").ok());

const DECLARATION_KEYWORDS: [&str; 8] = [
    "async", "function", "const", "let", "var", "class", "get", "set",
];

/// Locates the function or method body whose declaration line contains
/// `approx_index`.
///
/// The returned region starts at the beginning of the declaration line and
/// ends at the newline that follows the closing brace (or at the end of the
/// text), so whole lines can be swapped without touching neighbours.
///
/// # Errors
///
/// Returns [`PatchError::BoundaryNotFound`] when no opening brace follows the
/// declaration line or when the body never balances before the text ends.
///
/// # Example
///
/// ```
/// use suture::source::locate;
///
/// let text = "const a = 1;\nfunction add(x, y) {\n  return x + y;\n}\nadd(1, 2);\n";
/// let region = locate(text, 20).expect("function body should be found");
/// assert_eq!(
///     region.slice(text).expect("region fits text"),
///     "function add(x, y) {\n  return x + y;\n}"
/// );
/// ```
pub fn locate(text: &str, approx_index: usize) -> Result<SourceRegion, PatchError> {
    let not_found = PatchError::BoundaryNotFound {
        offset: approx_index,
    };
    let bytes = text.as_bytes();
    let anchor = approx_index.min(bytes.len());
    let decl_line_start = bytes
        .get(..anchor)
        .and_then(|head| head.iter().rposition(|byte| *byte == b'\n'))
        .map_or(0, |newline| newline + 1);

    let brace_start = find_body_brace(text, decl_line_start).ok_or_else(|| not_found.clone())?;
    let closing_brace = find_matching_brace(bytes, brace_start).ok_or(not_found)?;
    let line_end = bytes
        .get(closing_brace..)
        .and_then(|tail| tail.iter().position(|byte| *byte == b'\n'))
        .map_or(bytes.len(), |offset| closing_brace + offset);

    let region = SourceRegion {
        start: decl_line_start,
        end: line_end,
    };
    let declaration = text
        .get(decl_line_start..)
        .and_then(|rest| rest.lines().next())
        .unwrap_or_default();
    tracing::debug!(
        name = extract_name(declaration).as_deref().unwrap_or("<anonymous>"),
        start = region.start,
        end = region.end,
        "located function region"
    );
    Ok(region)
}

/// Sentinel-returning form of [`locate`] for callers that exchange raw
/// offsets.
///
/// Negative indices are treated as zero. Returns
/// [`SourceRegion::NOT_FOUND_OFFSETS`] when no region exists.
#[must_use]
pub fn locate_offsets(text: &str, approx_index: i64) -> (i64, i64) {
    let anchor = usize::try_from(approx_index.max(0)).unwrap_or(usize::MAX);
    locate(text, anchor).map_or(SourceRegion::NOT_FOUND_OFFSETS, |region| {
        region.as_offsets()
    })
}

fn find_body_brace(text: &str, decl_line_start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut scanner = Scanner::new();

    for (pos, byte) in bytes.iter().enumerate().skip(decl_line_start) {
        let token = scanner.feed(*byte);
        if token == Token::OpenBrace && scanner.paren_depth() == 0 {
            let preceding = text.get(decl_line_start..pos).unwrap_or_default();
            if is_signature_tail(preceding) {
                return Some(pos);
            }
        }

        if *byte == b'\n' && starts_new_declaration(text.get(pos + 1..).unwrap_or_default()) {
            return None;
        }
    }

    None
}

fn find_matching_brace(bytes: &[u8], brace_start: usize) -> Option<usize> {
    let mut scanner = Scanner::new();
    let mut depth = 1_u32;

    for (pos, byte) in bytes.iter().enumerate().skip(brace_start + 1) {
        match scanner.feed(*byte) {
            Token::OpenBrace => depth += 1,
            Token::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            Token::Other | Token::OpenParen | Token::CloseParen => {}
        }
    }

    None
}

/// Whether the text before a `{` looks like the end of a function signature.
///
/// Method shorthand (`name(args)`) ends in `)` and is covered by the first
/// check.
fn is_signature_tail(preceding: &str) -> bool {
    let trimmed = preceding.trim();
    if trimmed.ends_with(')') || trimmed.ends_with("=>") {
        return true;
    }
    if trimmed.chars().next_back().is_some_and(is_identifier_char) {
        return true;
    }
    RETURN_ANNOTATION
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(trimmed))
}

/// Whether a line begins something that cannot belong to a pending
/// signature: a declaration keyword, a call-shaped `name(`, or a comment.
fn starts_new_declaration(rest: &str) -> bool {
    let line = rest.trim_start();
    if line.starts_with("//") || line.starts_with("/*") {
        return true;
    }

    let word_len = line
        .char_indices()
        .find(|(_, ch)| !is_identifier_char(*ch))
        .map_or(line.len(), |(index, _)| index);
    if word_len == 0 {
        return false;
    }
    let (word, after) = line.split_at(word_len);

    if DECLARATION_KEYWORDS.contains(&word) && after.starts_with(char::is_whitespace) {
        return true;
    }
    after.trim_start().starts_with('(')
}

const fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{SourceRegion, locate, locate_offsets};
    use crate::error::PatchError;

    const PLAIN: &str = "import x from 'y';\n\nfunction greet(name) {\n  if (name) {\n    return `hi ${name}`;\n  }\n  return 'hi';\n}\n\nconsole.log(greet('a'));\n";

    const DECOYS: &str = "import x from 'y';\n\nfunction greet(name) {\n  const s = \"{not a brace}\";\n  // } fake\n  if (name) {\n    return `hi ${name}`;\n  }\n  return 'hi';\n}\n\nconsole.log(greet('a'));\n";

    fn region_text(text: &str, offset: usize) -> String {
        let region = locate(text, offset).expect("region should be found");
        region
            .slice(text)
            .expect("region should fit the text")
            .to_owned()
    }

    fn offset_of(text: &str, needle: &str) -> usize {
        text.find(needle).expect("needle should be present")
    }

    #[rstest]
    fn finds_plain_function() {
        let offset = offset_of(PLAIN, "function greet");
        assert_eq!(
            region_text(PLAIN, offset),
            "function greet(name) {\n  if (name) {\n    return `hi ${name}`;\n  }\n  return 'hi';\n}"
        );
    }

    #[rstest]
    fn accepts_offset_anywhere_on_declaration_line() {
        let start = offset_of(PLAIN, "function greet");
        let middle = offset_of(PLAIN, "(name) {");
        assert_eq!(locate(PLAIN, start), locate(PLAIN, middle));
    }

    #[rstest]
    fn strings_and_comments_do_not_shift_the_end() {
        let region = locate(DECOYS, offset_of(DECOYS, "function greet"))
            .expect("region should be found");
        let text = region.slice(DECOYS).expect("region should fit");
        assert!(text.ends_with("return 'hi';\n}"), "unexpected region: {text}");
        assert!(text.contains("\"{not a brace}\""));
        assert!(text.contains("// } fake"));
    }

    #[rstest]
    fn region_is_brace_balanced() {
        let text = region_text(DECOYS, offset_of(DECOYS, "function greet"));
        let mut scanner = crate::source::scanner::Scanner::new();
        for byte in text.bytes() {
            let _token = scanner.feed(byte);
        }
        assert_eq!(scanner.brace_depth(), 0, "braces should balance");
    }

    #[rstest]
    fn replacing_region_with_itself_is_identity() {
        let region = locate(DECOYS, offset_of(DECOYS, "function greet"))
            .expect("region should be found");
        let original = region.slice(DECOYS).expect("region should fit");
        let spliced = region
            .splice(DECOYS, original)
            .expect("splice should succeed");
        assert_eq!(spliced, DECOYS);
    }

    #[rstest]
    fn default_parameter_object_is_not_the_body() {
        let text = "function configure(opts = { retries: 3 }) {\n  return opts;\n}\n";
        assert_eq!(region_text(text, 0), text.trim_end());
    }

    #[rstest]
    #[case::arrow("export const load = async (id: string) => {\n  return id;\n};\n", "};")]
    #[case::method("class A {\n  async run(x) {\n    return x;\n  }\n}\n", "  }")]
    #[case::typed_return("function f(): Promise<string[]> {\n  return g();\n}\n", "}")]
    #[case::class_body("class Widget {\n  size = 1;\n}\n", "}")]
    fn recognises_common_signature_shapes(#[case] text: &str, #[case] last_line: &str) {
        let offset = if text.starts_with("class A") {
            offset_of(text, "async run")
        } else {
            0
        };
        let found = region_text(text, offset);
        assert!(
            found.ends_with(last_line),
            "region should end with {last_line:?}, got {found:?}"
        );
    }

    #[rstest]
    fn top_level_statement_yields_sentinel() {
        let offset = offset_of(PLAIN, "console.log");
        assert_eq!(
            locate_offsets(PLAIN, i64::try_from(offset).expect("offset fits")),
            SourceRegion::NOT_FOUND_OFFSETS
        );
        assert!(matches!(
            locate(PLAIN, offset),
            Err(PatchError::BoundaryNotFound { .. })
        ));
    }

    #[rstest]
    fn unbalanced_body_is_not_guessed() {
        let text = "function broken() {\n  if (x) {\n    return 1;\n}\n";
        assert_eq!(locate_offsets(text, 0), SourceRegion::NOT_FOUND_OFFSETS);
    }

    #[rstest]
    fn stops_at_next_declaration_when_no_brace_found() {
        let text = "const value = compute()\nfunction later() {\n  return 1;\n}\n";
        assert_eq!(locate_offsets(text, 0), SourceRegion::NOT_FOUND_OFFSETS);
    }

    #[rstest]
    fn closing_brace_on_last_line_ends_at_text_end() {
        let text = "function tail() {\n  return 1;\n}";
        assert_eq!(locate_offsets(text, 3), (0, 31));
    }

    #[rstest]
    fn negative_index_is_clamped() {
        let text = "function head() {\n}\n";
        assert_eq!(locate_offsets(text, -5), (0, 19));
    }

    #[rstest]
    fn splice_rejects_regions_outside_text() {
        let region = SourceRegion::new(2, 40).expect("ordered offsets");
        assert!(matches!(
            region.splice("short", "x"),
            Err(PatchError::RegionOutOfBounds { len: 5, .. })
        ));
    }
}
