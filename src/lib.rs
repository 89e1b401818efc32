//! Single-game PGN parsing: tag pairs, main-line moves and `%clk` time deltas.
//!
//! Set `PGN_LOG=warn` (or `debug`) to see parse diagnostics on stderr.

pub mod clock;
pub mod document;
pub mod error;
mod log;
pub mod movetext;
pub mod tags;
pub mod types;

pub use document::{GameDocument, Summary};
pub use error::{DurationError, ParseError};
pub use tags::TagTable;
pub use types::{ClockDelta, Move, MoveList, TimeControl};

/// Parses one game. See [`GameDocument::parse`].
pub fn parse(text: &str) -> Result<GameDocument, ParseError> {
    GameDocument::parse(text)
}
