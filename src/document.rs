use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::clock::parse_move_timings;
use crate::error::{ErrorAccumulator, ParseError};
use crate::log;
use crate::movetext::parse_moves;
use crate::tags::{TagTable, parse_tags_with};
use crate::types::{ClockDelta, Move, MoveList, TimeControl};

/// One parsed PGN game. Built once from the input text and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    headers: TagTable,
    moves: MoveList,
    move_timings: Option<Vec<ClockDelta>>,
    time_control: TimeControl,
    #[serde(rename = "pgn")]
    raw: String,
    #[serde(skip)]
    warnings: Option<String>,
}

impl GameDocument {
    /// Parses tags, moves and clock deltas from a single game's PGN text.
    ///
    /// Malformed tag lines only add to [`GameDocument::warnings`]. A clock
    /// annotation that is not a valid `h:mm:ss` fails the whole parse.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut warnings = ErrorAccumulator::default();

        let headers = parse_tags_with(text, &mut warnings);
        let moves = parse_moves(text);
        let move_timings = parse_move_timings(text)?;
        let time_control = TimeControl::from_deltas(move_timings.as_deref());

        log::debug(format!(
            "parsed {} tags, {} moves, {} clock deltas",
            headers.len(),
            moves.len(),
            move_timings
                .as_ref()
                .map_or_else(|| "no".to_string(), |t| t.len().to_string()),
        ));

        Ok(Self {
            headers,
            moves,
            move_timings,
            time_control,
            raw: text.to_string(),
            warnings: warnings.take(),
        })
    }

    pub fn headers(&self) -> &TagTable {
        &self.headers
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// `None` when the game carries no `%clk` annotations, which is distinct
    /// from `Some(&[])` (annotations present, fewer than three samples).
    pub fn move_timings(&self) -> Option<&[ClockDelta]> {
        self.move_timings.as_deref()
    }

    pub fn time_control(&self) -> TimeControl {
        self.time_control
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Non-fatal problems met while reading tag lines, `"; "`-joined.
    pub fn warnings(&self) -> Option<&str> {
        self.warnings.as_deref()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn result(&self) -> Option<&str> {
        self.headers.get("Result")
    }

    pub fn summary(&self) -> Summary {
        Summary {
            tag_count: self.headers.len(),
            move_count: self.moves.len(),
            timing_count: self.move_timings.as_ref().map(Vec::len),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl FromStr for GameDocument {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Counts describing a parsed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub tag_count: usize,
    pub move_count: usize,
    pub timing_count: Option<usize>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tags, {} moves, ", self.tag_count, self.move_count)?;
        match self.timing_count {
            Some(n) => write!(f, "{n} clock deltas"),
            None => write!(f, "no clock deltas"),
        }
    }
}
