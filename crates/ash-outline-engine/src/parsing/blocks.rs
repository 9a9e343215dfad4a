use crate::lexis::{BlockToken, Cursor, block_token_at};

/// Finds the end of the block opened by the first `do` at or after `search_start`.
///
/// Returns the offset just past the matching `end`, or `None` when the buffer
/// runs out first. `None` is not an error: callers treat the block as
/// extending to the end of their search range.
pub fn find_block_end(source: &str, search_start: usize) -> Option<usize> {
    find_block_end_within(source, search_start, source.len())
}

/// Like [`find_block_end`], but gives up at byte offset `limit`.
///
/// Keywords inside strings, sigils and comments are ignored, `do:` never
/// opens a block, and `fn ... end` nests like `do ... end` so one-line
/// anonymous functions leave the depth unchanged.
pub fn find_block_end_within(source: &str, search_start: usize, limit: usize) -> Option<usize> {
    let limit = limit.min(source.len());
    let mut depth = 0u32;
    // `fn` blocks seen before the opening `do`; their `end`s are not ours.
    let mut pending = 0u32;

    for step in Cursor::new(source, search_start) {
        if step.start >= limit {
            break;
        }
        if !step.is_code() {
            continue;
        }
        let Some(token) = block_token_at(source, step.start) else {
            continue;
        };
        if step.start + token.len() > limit {
            break;
        }

        match token {
            BlockToken::Open | BlockToken::Fn if depth > 0 => depth += 1,
            BlockToken::Open if pending == 0 => depth = 1,
            BlockToken::Open | BlockToken::Fn => pending += 1,
            BlockToken::Close if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(step.start + token.len());
                }
            }
            BlockToken::Close => pending = pending.saturating_sub(1),
        }
    }
    None
}
