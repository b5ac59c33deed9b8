//! Comment- and string-aware byte scanner.
//!
//! The scanner walks source text one byte at a time and reports which
//! structural characters (`(`, `)`, `{`, `}`) occur in code context. Bytes
//! inside line comments, block comments and string literals are consumed
//! silently, so braces or comment markers inside `"{not a brace}"` never
//! disturb the depth counters.
//!
//! All delimiters the scanner reacts to are ASCII, which keeps every offset
//! it reports on a UTF-8 character boundary.

/// Lexical context of the byte most recently fed to a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Ordinary code.
    #[default]
    Code,
    /// Inside a `//` comment, up to the end of the line.
    LineComment,
    /// Inside a `/* ... */` comment.
    BlockComment,
    /// Inside a string literal opened by the contained quote byte.
    Str(u8),
}

/// Structural character observed in code context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Any byte without structural meaning, or a byte inside a comment or
    /// string.
    Other,
    /// `(` in code.
    OpenParen,
    /// `)` in code.
    CloseParen,
    /// `{` in code.
    OpenBrace,
    /// `}` in code.
    CloseBrace,
}

/// Single-pass state machine tracking comment/string context and nesting.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    state: ScanState,
    slash_pending: bool,
    star_pending: bool,
    escaped: bool,
    paren_depth: i64,
    brace_depth: i64,
}

impl Scanner {
    /// Creates a scanner positioned in code context with zero depth.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ScanState::Code,
            slash_pending: false,
            star_pending: false,
            escaped: false,
            paren_depth: 0,
            brace_depth: 0,
        }
    }

    /// Current lexical context.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Running count of unmatched code-context `(`.
    ///
    /// Goes negative when a scan starts inside an argument list and meets
    /// its closing parenthesis first.
    #[must_use]
    pub const fn paren_depth(&self) -> i64 {
        self.paren_depth
    }

    /// Running count of unmatched code-context `{`.
    #[must_use]
    pub const fn brace_depth(&self) -> i64 {
        self.brace_depth
    }

    /// Advances the machine by one byte and reports its structural meaning.
    pub fn feed(&mut self, byte: u8) -> Token {
        match self.state {
            ScanState::LineComment => {
                if byte == b'\n' {
                    self.state = ScanState::Code;
                }
                Token::Other
            }
            ScanState::BlockComment => {
                if byte == b'/' && self.star_pending {
                    self.state = ScanState::Code;
                }
                self.star_pending = byte == b'*';
                Token::Other
            }
            ScanState::Str(quote) => {
                self.feed_string(quote, byte);
                Token::Other
            }
            ScanState::Code => self.feed_code(byte),
        }
    }

    fn feed_string(&mut self, quote: u8, byte: u8) {
        if self.escaped {
            self.escaped = false;
        } else if byte == b'\\' {
            self.escaped = true;
        } else if byte == quote || (byte == b'\n' && quote != b'`') {
            // Plain quotes cannot span lines; ending them at the newline keeps
            // a stray apostrophe from swallowing the rest of the file.
            self.state = ScanState::Code;
        }
    }

    fn feed_code(&mut self, byte: u8) -> Token {
        let after_slash = self.slash_pending;
        self.slash_pending = false;

        match byte {
            b'/' if after_slash => {
                self.state = ScanState::LineComment;
                Token::Other
            }
            b'*' if after_slash => {
                self.state = ScanState::BlockComment;
                self.star_pending = false;
                Token::Other
            }
            b'/' => {
                self.slash_pending = true;
                Token::Other
            }
            b'"' | b'\'' | b'`' => {
                self.state = ScanState::Str(byte);
                self.escaped = false;
                Token::Other
            }
            b'(' => {
                self.paren_depth += 1;
                Token::OpenParen
            }
            b')' => {
                self.paren_depth -= 1;
                Token::CloseParen
            }
            b'{' => {
                self.brace_depth += 1;
                Token::OpenBrace
            }
            b'}' => {
                self.brace_depth -= 1;
                Token::CloseBrace
            }
            _ => Token::Other,
        }
    }
}
