/// Lexical state of the byte the cursor is about to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    /// `#` to end of line.
    Comment,
    /// `"..."` or `'...'`, closed by the stored delimiter.
    Quoted(u8),
    /// `"""..."""` or `'''...'''`.
    Heredoc(u8),
    /// `~r/.../`, `~w(...)` and friends. Paired delimiters nest.
    Sigil { open: u8, close: u8, depth: u32 },
}

/// One unit consumed by [`Cursor::advance`].
///
/// A unit is a single character in the common case, or a whole delimiter /
/// escape sequence (`"""`, `\"`, `?x`, `~r/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Byte offset where the unit starts.
    pub start: usize,
    /// Byte offset just past the unit.
    pub next: usize,
    /// The unit belongs to a string, charlist, sigil or char literal,
    /// delimiters included.
    pub in_string: bool,
    /// The unit belongs to a line comment, `#` included.
    pub in_comment: bool,
}

impl Step {
    /// True when keyword matching is allowed at `start`.
    pub fn is_code(&self) -> bool {
        !self.in_string && !self.in_comment
    }
}

/// A string- and comment-aware scanner over Elixir source.
///
/// Starts in code state at `start`; callers must only start at offsets that
/// are known to be outside literals (line starts found on masked text, or 0).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    i: usize,
    mode: Mode,
    /// Open `#{ ... }` interpolations, innermost last: the string mode to
    /// resume at the closing `}` and the count of unclosed `{` seen inside.
    interpolations: Vec<(Mode, u32)>,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str, start: usize) -> Self {
        Self {
            s,
            i: start.min(s.len()),
            mode: Mode::Code,
            interpolations: Vec::new(),
        }
    }

    /// Returns the current byte offset.
    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// True while inside a literal or comment that has not been closed yet.
    pub fn in_literal(&self) -> bool {
        self.mode != Mode::Code || !self.interpolations.is_empty()
    }

    fn bytes(&self) -> &'a [u8] {
        self.s.as_bytes()
    }

    fn peek_at(&self, at: usize) -> Option<u8> {
        self.bytes().get(at).copied()
    }

    fn starts_with(&self, pat: &[u8]) -> bool {
        self.bytes()[self.i..].starts_with(pat)
    }

    /// Width of the character at byte offset `at`, or 0 at end of input.
    fn char_width(&self, at: usize) -> usize {
        self.s
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8)
    }

    /// Width of a backslash escape starting at the cursor.
    fn escape_width(&self) -> usize {
        1 + self.char_width(self.i + 1)
    }

    /// Consumes the next unit and reports whether it was code, string or comment.
    pub fn advance(&mut self) -> Option<Step> {
        let b = self.peek_at(self.i)?;
        let start = self.i;
        let interpolating = !self.interpolations.is_empty();
        let (width, in_string, in_comment) = match self.mode {
            Mode::Quoted(_) | Mode::Heredoc(_)
                if b == b'#' && self.peek_at(start + 1) == Some(b'{') =>
            {
                self.interpolations.push((self.mode, 0));
                self.mode = Mode::Code;
                (2, true, false)
            }
            Mode::Code => self.advance_code(b),
            Mode::Comment => {
                if b == b'\n' {
                    self.mode = Mode::Code;
                    (1, false, false)
                } else {
                    (self.char_width(start), false, true)
                }
            }
            Mode::Quoted(delim) => {
                if b == b'\\' {
                    (self.escape_width(), true, false)
                } else {
                    if b == delim {
                        self.mode = Mode::Code;
                    }
                    (self.char_width(start), true, false)
                }
            }
            Mode::Heredoc(delim) => {
                if b == b'\\' {
                    (self.escape_width(), true, false)
                } else if self.starts_with(&[delim; 3]) {
                    self.mode = Mode::Code;
                    (3, true, false)
                } else {
                    (self.char_width(start), true, false)
                }
            }
            Mode::Sigil { open, close, depth } => {
                if b == b'\\' {
                    (self.escape_width(), true, false)
                } else {
                    if b == close {
                        self.mode = match depth {
                            0 => Mode::Code,
                            d => Mode::Sigil {
                                open,
                                close,
                                depth: d - 1,
                            },
                        };
                    } else if b == open && open != close {
                        self.mode = Mode::Sigil {
                            open,
                            close,
                            depth: depth + 1,
                        };
                    }
                    (self.char_width(start), true, false)
                }
            }
        };
        self.i = (start + width.max(1)).min(self.s.len());
        Some(Step {
            start,
            next: self.i,
            // Interpolated code belongs to the enclosing literal.
            in_string: in_string || interpolating,
            in_comment,
        })
    }

    fn advance_code(&mut self, b: u8) -> (usize, bool, bool) {
        match b {
            b'"' | b'\'' if self.starts_with(&[b; 3]) => {
                self.mode = Mode::Heredoc(b);
                (3, true, false)
            }
            b'"' | b'\'' => {
                self.mode = Mode::Quoted(b);
                (1, true, false)
            }
            b'{' | b'}' if !self.interpolations.is_empty() => {
                self.interpolation_brace(b);
                (1, false, false)
            }
            b'#' => {
                self.mode = Mode::Comment;
                (1, false, true)
            }
            b'?' if self.is_char_literal() => {
                let body = match self.peek_at(self.i + 1) {
                    Some(b'\\') => 1 + self.char_width(self.i + 2),
                    _ => self.char_width(self.i + 1),
                };
                (1 + body, true, false)
            }
            b'~' => match self.sigil_opening() {
                Some((width, mode)) => {
                    self.mode = mode;
                    (width, true, false)
                }
                None => (1, false, false),
            },
            _ => (self.char_width(self.i), false, false),
        }
    }

    /// Tracks braces inside `#{ ... }`; the unmatched `}` resumes the string.
    fn interpolation_brace(&mut self, b: u8) {
        let Some((resume, depth)) = self.interpolations.last_mut() else {
            return;
        };
        if b == b'{' {
            *depth += 1;
        } else if *depth > 0 {
            *depth -= 1;
        } else {
            self.mode = *resume;
            self.interpolations.pop();
        }
    }

    /// `?x` is a character literal unless `?` ends an identifier (`valid?`).
    fn is_char_literal(&self) -> bool {
        let follows_ident = self.i > 0 && super::keyword::is_ident_byte(self.bytes()[self.i - 1]);
        let has_body = self
            .peek_at(self.i + 1)
            .is_some_and(|n| !n.is_ascii_whitespace());
        !follows_ident && has_body
    }

    /// Recognizes `~name<delim>` and returns the opener width and the state to enter.
    fn sigil_opening(&self) -> Option<(usize, Mode)> {
        let bytes = self.bytes();
        let mut j = self.i + 1;
        while bytes.get(j).is_some_and(u8::is_ascii_alphabetic) {
            j += 1;
        }
        if j == self.i + 1 {
            return None;
        }
        let delim = *bytes.get(j)?;
        if (delim == b'"' || delim == b'\'') && bytes[j..].starts_with(&[delim; 3]) {
            return Some((j + 3 - self.i, Mode::Heredoc(delim)));
        }
        let close = match delim {
            b'(' => b')',
            b'[' => b']',
            b'{' => b'}',
            b'<' => b'>',
            b'/' | b'|' | b'"' | b'\'' => delim,
            _ => return None,
        };
        Some((
            j + 1 - self.i,
            Mode::Sigil {
                open: delim,
                close,
                depth: 0,
            },
        ))
    }
}

impl Iterator for Cursor<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.advance()
    }
}
