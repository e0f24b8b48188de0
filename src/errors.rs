//! Error type shared by move parsing, solution replay and level-file parsing.
//!
//! Failing to find a solution is not an error; solvers return `Option<Board>`.

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("malformed move token \"{token}\"")]
    MalformedMove { token: String },

    #[error("move {token} is outside the board")]
    MoveOutOfRange { token: String },

    #[error("invalid move: {token}")]
    InvalidMove { token: String },

    #[error("malformed level file near byte {offset}: {reason}")]
    LevelFormat { offset: usize, reason: String },

    #[error("level {index} has no \"{attribute}\" attribute")]
    MissingAttribute {
        index: usize,
        attribute: &'static str,
    },

    #[error("invalid level selection \"{input}\" (expected N or N+)")]
    InvalidSelection { input: String },
}
