use chrono::TimeDelta;
use serde::{Serialize, Serializer};
use shakmaty::san::San;
use smallvec::SmallVec;
use std::fmt;

pub type MoveList = SmallVec<[Move; 128]>;

/// One ply of movetext with check (`+`), mate (`#`) and `!`/`?` annotation marks removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Move(String);

impl Move {
    /// Strips decoration from a raw movetext token. Returns `None` if nothing is left.
    ///
    /// Everything from the first check or mate mark on is dropped, so suffix
    /// annotations (`Nf3+?!`) go with it. Bare annotations (`e4!?`) are trimmed too.
    pub fn from_token(token: &str) -> Option<Self> {
        let undecorated = match token.find(['+', '#']) {
            Some(idx) => &token[..idx],
            None => token,
        };
        let stripped = undecorated.trim_end_matches(['!', '?']);
        if stripped.is_empty() {
            None
        } else {
            Some(Self(stripped.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Syntactic SAN reading of the token. No board is involved, so legality is not checked.
    pub fn san(&self) -> Option<San> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Move {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Move {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Time one side spent between its own two consecutive clock readings.
///
/// Negative when an increment leaves the clock higher than before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockDelta(TimeDelta);

impl ClockDelta {
    pub fn new(delta: TimeDelta) -> Self {
        Self(delta)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(TimeDelta::milliseconds(millis))
    }

    pub fn as_millis(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Serialize for ClockDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

/// First two clock deltas of the game, White's then Black's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeControl {
    pub white: Option<ClockDelta>,
    pub black: Option<ClockDelta>,
}

impl TimeControl {
    pub fn from_deltas(deltas: Option<&[ClockDelta]>) -> Self {
        let deltas = deltas.unwrap_or_default();
        Self {
            white: deltas.first().copied(),
            black: deltas.get(1).copied(),
        }
    }
}
