pub mod lines;
pub mod position;

pub use lines::{LineRef, numbered_lines};
pub use position::{LineIndex, SourcePosition};
