//! Word-boundary keyword recognition for `do` / `fn` / `end`.

/// Opens a block: `name do`.
pub const BLOCK_OPEN: &str = "do";
/// Closes a block opened by `do` or `fn`.
pub const BLOCK_CLOSE: &str = "end";
/// Opens an anonymous function, closed by [`BLOCK_CLOSE`].
pub const FN_OPEN: &str = "fn";

/// A block delimiter recognized in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockToken {
    /// `do`
    Open,
    /// `fn`
    Fn,
    /// `end`
    Close,
}

impl BlockToken {
    pub fn len(self) -> usize {
        match self {
            Self::Open => BLOCK_OPEN.len(),
            Self::Fn => FN_OPEN.len(),
            Self::Close => BLOCK_CLOSE.len(),
        }
    }

    /// Contribution to nesting depth.
    pub fn delta(self) -> i32 {
        match self {
            Self::Open | Self::Fn => 1,
            Self::Close => -1,
        }
    }
}

/// Bytes that may appear inside an identifier or atom name.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'?' || b == b'!'
}

fn preceded_ok(bytes: &[u8], at: usize) -> bool {
    at == 0
        || matches!(
            bytes[at - 1],
            b' ' | b'\t' | b'\n' | b'\r' | b'(' | b'[' | b'{' | b',' | b';' | b'='
        )
}

fn followed_ok(bytes: &[u8], after: usize) -> bool {
    match bytes.get(after) {
        None => true,
        Some(b) => matches!(
            b,
            b' ' | b'\t' | b'\n' | b'\r' | b')' | b']' | b'}' | b',' | b';' | b'(' | b'#'
        ),
    }
}

/// True when `kw` occurs at `at` as a whole word.
///
/// `do:` (the keyword-argument shorthand) never counts, nor do atoms
/// (`:end`), fields (`x.end`), attributes (`@do`) or identifier fragments
/// (`done`, `endpoint`, `undo`).
pub fn keyword_at(source: &str, at: usize, kw: &str) -> bool {
    let bytes = source.as_bytes();
    let after = at + kw.len();
    bytes.get(at..after) == Some(kw.as_bytes())
        && preceded_ok(bytes, at)
        && followed_ok(bytes, after)
}

/// The block delimiter starting at `at`, if any.
pub fn block_token_at(source: &str, at: usize) -> Option<BlockToken> {
    let b = *source.as_bytes().get(at)?;
    match b {
        b'd' if keyword_at(source, at, BLOCK_OPEN) => Some(BlockToken::Open),
        b'f' if keyword_at(source, at, FN_OPEN) => Some(BlockToken::Fn),
        b'e' if keyword_at(source, at, BLOCK_CLOSE) => Some(BlockToken::Close),
        _ => None,
    }
}

/// Net nesting change of one masked line (literals and comments blanked).
///
/// A one-line `fn x -> x end` nets to zero, so it never shifts the depth of
/// the surrounding block.
pub fn line_delta(masked_line: &str) -> i32 {
    let mut delta = 0;
    let mut at = 0;
    while at < masked_line.len() {
        match block_token_at(masked_line, at) {
            Some(token) => {
                delta += token.delta();
                at += token.len();
            }
            None => at += 1,
        }
    }
    delta
}

/// True when trimmed `line` starts with `keyword` as a whole word.
///
/// A following `:` disqualifies the match, so `action: :read` inside an option
/// list is not an `action` declaration.
pub fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    match line.strip_prefix(keyword) {
        Some(rest) => match rest.bytes().next() {
            None => true,
            Some(b) => !is_ident_byte(b) && b != b':',
        },
        None => false,
    }
}
