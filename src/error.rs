use std::error::Error;
use std::fmt;

/// Collects non-fatal parse problems into one `"; "`-joined message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: &str) {
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Why a `%clk` token could not be read as `h:mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationError {
    FieldCount(usize),
    NotANumber,
    MinutesOutOfRange(u32),
    SecondsOutOfRange(u32),
    Overflow,
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount(n) => write!(f, "expected 3 fields separated by ':', found {n}"),
            Self::NotANumber => write!(f, "field is empty or not a number"),
            Self::MinutesOutOfRange(m) => write!(f, "minutes out of range: {m}"),
            Self::SecondsOutOfRange(s) => write!(f, "seconds out of range: {s}"),
            Self::Overflow => write!(f, "duration out of range"),
        }
    }
}

impl Error for DurationError {}

/// Failure of a whole parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A clock annotation claimed a time but its token is not a valid `h:mm:ss`.
    MalformedDuration {
        token: String,
        /// 0-based index of the clock sample in source order.
        position: usize,
        reason: DurationError,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedDuration {
                token,
                position,
                reason,
            } => write!(
                f,
                "Malformed duration: clock sample {position} '{token}' ({reason})"
            ),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedDuration { reason, .. } => Some(reason),
        }
    }
}
