use chrono::TimeDelta;

use crate::error::{DurationError, ParseError};
use crate::log;
use crate::types::ClockDelta;

const CLOCK_MARKER: &str = "%clk";

/// Raw `%clk` tokens in source order: the run of digits and colons after each marker.
///
/// A marker followed by no such characters still counts, as an empty token.
pub fn clock_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(idx) = rest.find(CLOCK_MARKER) {
        let after = &rest[idx + CLOCK_MARKER.len()..];
        let value = after.trim_start_matches([' ', '\t']);
        if value.len() == after.len() {
            rest = after;
            continue;
        }

        let len = value
            .bytes()
            .take_while(|b| b.is_ascii_digit() || *b == b':')
            .count();
        tokens.push(&value[..len]);
        rest = &value[len..];
    }

    tokens
}

fn parse_field(field: &str) -> Result<u32, DurationError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::NotANumber);
    }
    field.parse().map_err(|_| DurationError::Overflow)
}

/// Parses an `h:mm:ss` clock reading. Hours are unbounded; minutes and seconds must be below 60.
pub fn parse_clock(token: &str) -> Result<TimeDelta, DurationError> {
    let fields: Vec<&str> = token.split(':').collect();
    let [hours, minutes, seconds] = fields[..] else {
        return Err(DurationError::FieldCount(fields.len()));
    };

    let hours = parse_field(hours)?;
    let minutes = parse_field(minutes)?;
    let seconds = parse_field(seconds)?;

    if minutes >= 60 {
        return Err(DurationError::MinutesOutOfRange(minutes));
    }
    if seconds >= 60 {
        return Err(DurationError::SecondsOutOfRange(seconds));
    }

    let total = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
    TimeDelta::try_seconds(total).ok_or(DurationError::Overflow)
}

/// Per-side time spent, from clock samples two plies apart.
///
/// `Ok(None)` means the text carries no clock annotations at all. With `n`
/// samples the result holds `n - 2` deltas (none when `n < 3`), where entry `i`
/// is sample `i` minus sample `i + 2`.
pub fn parse_move_timings(text: &str) -> Result<Option<Vec<ClockDelta>>, ParseError> {
    let tokens = clock_tokens(text);
    if tokens.is_empty() {
        return Ok(None);
    }

    let samples = tokens
        .iter()
        .enumerate()
        .map(|(position, token)| {
            parse_clock(token).map_err(|reason| {
                let err = ParseError::MalformedDuration {
                    token: (*token).to_string(),
                    position,
                    reason,
                };
                log::error(err.to_string());
                err
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let deltas = samples
        .windows(3)
        .map(|w| ClockDelta::new(w[0] - w[2]))
        .collect();

    Ok(Some(deltas))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(deltas: &[ClockDelta]) -> Vec<i64> {
        deltas.iter().map(ClockDelta::as_millis).collect()
    }

    #[test]
    fn test_clock_tokens_in_source_order() {
        let text = "1. d4 { [%eval 0.25] [%clk 1:30:43] } Nf6 { [%eval 0.22] [%clk 1:30:42] }";
        assert_eq!(clock_tokens(text), vec!["1:30:43", "1:30:42"]);
    }

    #[test]
    fn test_clock_token_stops_at_fraction() {
        assert_eq!(clock_tokens("{[%clk 0:02:59.9]}"), vec!["0:02:59"]);
    }

    #[test]
    fn test_marker_without_space_is_not_a_sample() {
        assert!(clock_tokens("{[%clk]} {[%clkx 1:00:00]}").is_empty());
    }

    #[test]
    fn test_marker_accepts_tabs_and_repeated_spaces() {
        assert_eq!(
            clock_tokens("{[%clk   0:05:00]} {[%clk\t0:04:58]} {[%clk \t 0:04:50]}"),
            vec!["0:05:00", "0:04:58", "0:04:50"]
        );
    }

    #[test]
    fn test_marker_without_digits_is_an_empty_sample() {
        assert_eq!(clock_tokens("{[%clk ]}"), vec![""]);
    }

    #[test]
    fn test_parse_clock_values() {
        assert_eq!(parse_clock("0:10:00"), Ok(TimeDelta::seconds(600)));
        assert_eq!(parse_clock("1:30:43"), Ok(TimeDelta::seconds(5443)));
        assert_eq!(parse_clock("00:00:00"), Ok(TimeDelta::zero()));
        assert_eq!(parse_clock("27:00:01"), Ok(TimeDelta::seconds(97_201)));
    }

    #[test]
    fn test_parse_clock_rejects_out_of_range() {
        assert_eq!(
            parse_clock("0:60:00"),
            Err(DurationError::MinutesOutOfRange(60))
        );
        assert_eq!(
            parse_clock("0:10:75"),
            Err(DurationError::SecondsOutOfRange(75))
        );
    }

    #[test]
    fn test_parse_clock_rejects_bad_shape() {
        assert_eq!(parse_clock("10:00"), Err(DurationError::FieldCount(2)));
        assert_eq!(parse_clock("1:2:3:4"), Err(DurationError::FieldCount(4)));
        assert_eq!(parse_clock(""), Err(DurationError::FieldCount(1)));
        assert_eq!(parse_clock("1::00"), Err(DurationError::NotANumber));
        assert_eq!(
            parse_clock("99999999999:00:00"),
            Err(DurationError::Overflow)
        );
    }

    #[test]
    fn test_no_annotations_is_absent() {
        assert_eq!(parse_move_timings("1. e4 e5 2. Nf3 1-0"), Ok(None));
    }

    #[test]
    fn test_two_samples_yield_present_but_empty() {
        let timings = parse_move_timings("1. e4 {[%clk 0:05:00]} e5 {[%clk 0:05:00]}").unwrap();
        assert_eq!(timings, Some(Vec::new()));
    }

    #[test]
    fn test_skip_by_two_deltas() {
        let text = "1. e4 {[%clk 0:10:00]} e5 {[%clk 0:10:00]} 2. Nf3 {[%clk 0:09:50]} Nc6 {[%clk 0:09:45]} 1-0";
        let timings = parse_move_timings(text).unwrap().unwrap();
        assert_eq!(millis(&timings), vec![10_000, 15_000]);
    }

    #[test]
    fn test_increment_can_produce_negative_delta() {
        let text = "{[%clk 0:03:00]} {[%clk 0:03:00]} {[%clk 0:03:01]} {[%clk 0:02:58]} {[%clk 0:02:59]}";
        let timings = parse_move_timings(text).unwrap().unwrap();
        assert_eq!(millis(&timings), vec![-1_000, 2_000, 2_000]);
    }

    #[test]
    fn test_malformed_sample_fails_whole_extraction() {
        let text = "{[%clk 0:10:00]} {[%clk 0:10:00]} {[%clk 0:61:00]}";
        assert_eq!(
            parse_move_timings(text),
            Err(ParseError::MalformedDuration {
                token: "0:61:00".to_string(),
                position: 2,
                reason: DurationError::MinutesOutOfRange(61),
            })
        );
    }
}
