//! The four fatal, programmer-error kinds the core can raise. None of
//! these are recoverable inside `render` — they exist as a typed enum
//! (rather than bare `panic!` strings) so the one legitimate caller
//! outside the hot loop — the arena, before it aborts — can log a
//! structured diagnostic first.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("arena overflow: requested {requested} bytes, only {available} available")]
    ArenaOverflow { requested: usize, available: usize },

    #[error("arena underflow: popped {requested} bytes against {live} live bytes, or LIFO order violated")]
    ArenaUnderflow { requested: usize, live: usize },

    #[error("computed depth {depth} outside [0, 1] — matrix or encoding bug")]
    InvalidDepth { depth: f32 },

    #[error("unreachable: {0}")]
    Unreachable(&'static str),
}
