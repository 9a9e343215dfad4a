//! # Lexical Scanning
//!
//! Low-level primitives shared by every parser stage:
//!
//! - **`cursor`**: `Cursor` walks source text unit by unit while tracking
//!   string, sigil, heredoc and comment state
//! - **`keyword`**: word-boundary rules for `do` / `fn` / `end` and for
//!   child keywords
//! - **`mask`**: produces an offset-preserving copy of the source with all
//!   literals and comments blanked, for line-oriented scans

pub mod cursor;
pub mod keyword;
pub mod mask;

pub use cursor::{Cursor, Step};
pub use keyword::{BlockToken, block_token_at, keyword_at, line_delta, starts_with_keyword};
pub use mask::mask_literals;
