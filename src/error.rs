//! Command rejection taxonomy.
//!
//! Every rejected command leaves the game state untouched. Nothing here is
//! fatal; callers are free to ignore the error and keep playing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandError>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// Pin number outside 1-12.
    #[error("no pin numbered {0} exists")]
    InvalidPinReference(u8),

    /// Re-knocking a fallen pin is a standing-only operation.
    #[error("pin {0} is already knocked")]
    AlreadyKnocked(u8),

    /// Command not accepted in the current phase (e.g. throwing while a
    /// throw is in flight, or anything but `new_game` after the game ends).
    #[error("command rejected: {0}")]
    IllegalCommandInState(&'static str),

    /// Throw target outside the pin area.
    #[error("throw target ({x:.0}, {y:.0}) is outside the pin area")]
    InvalidTarget { x: f32, y: f32 },
}
