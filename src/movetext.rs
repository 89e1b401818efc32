use crate::types::{Move, MoveList};

/// Terminal result markers. They close the movetext and are never moves.
const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

pub fn is_result_marker(token: &str) -> bool {
    RESULT_MARKERS.contains(&token)
}

/// Splits movetext into whitespace-separated words.
///
/// Tag lines, `{ ... }` comments, `;` line comments and `( ... )` variations
/// are consumed without producing words. Comments do not nest; variations do.
struct Words<'a> {
    text: &'a str,
    pos: usize,
    at_line_start: bool,
}

impl<'a> Words<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            at_line_start: true,
        }
    }

    fn skip_past(&mut self, needle: u8) {
        let bytes = self.text.as_bytes();
        self.pos = match bytes[self.pos..].iter().position(|&b| b == needle) {
            Some(offset) => self.pos + offset + 1,
            None => bytes.len(),
        };
    }

    fn skip_to_line_end(&mut self) {
        let bytes = self.text.as_bytes();
        self.pos = match bytes[self.pos..].iter().position(|&b| b == b'\n') {
            Some(offset) => self.pos + offset,
            None => bytes.len(),
        };
    }

    fn skip_variation(&mut self) {
        let bytes = self.text.as_bytes();
        let mut depth = 0usize;
        while let Some(&b) = bytes.get(self.pos) {
            self.pos += 1;
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                b'{' => self.skip_past(b'}'),
                _ => {}
            }
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        loop {
            let b = *bytes.get(self.pos)?;

            if self.at_line_start && b == b'[' {
                self.skip_to_line_end();
                continue;
            }

            match b {
                b'\n' => {
                    self.pos += 1;
                    self.at_line_start = true;
                    continue;
                }
                b'{' => self.skip_past(b'}'),
                b';' => self.skip_to_line_end(),
                b'(' => self.skip_variation(),
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => {
                    let start = self.pos;
                    while let Some(&b) = bytes.get(self.pos) {
                        if b.is_ascii_whitespace() || matches!(b, b'{' | b';' | b'(') {
                            break;
                        }
                        self.pos += 1;
                    }
                    self.at_line_start = false;
                    return Some(&self.text[start..self.pos]);
                }
            }
            self.at_line_start = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Word<'a> {
    /// `12.` opens a move group; `rest` holds a move glued to the marker (`12.Nf3`).
    MoveNumber { rest: &'a str },
    /// `12...` repeats the number before Black's move.
    Continuation { rest: &'a str },
    Nag,
    Other(&'a str),
}

fn classify(word: &str) -> Word<'_> {
    if word.starts_with('$') {
        return Word::Nag;
    }

    let digits = word.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Word::Other(word);
    }

    let after = &word[digits..];
    let dots = after.bytes().take_while(|&b| b == b'.').count();
    let rest = &after[dots..];
    match dots {
        0 => Word::Other(word),
        1 => Word::MoveNumber { rest },
        _ => Word::Continuation { rest },
    }
}

/// Next move candidate inside the current group.
///
/// Stops without consuming when the next word opens a new group.
fn next_candidate<'a, I>(words: &mut std::iter::Peekable<I>) -> Option<&'a str>
where
    I: Iterator<Item = &'a str>,
{
    loop {
        let word = *words.peek()?;
        match classify(word) {
            Word::MoveNumber { .. } => return None,
            Word::Nag | Word::Continuation { rest: "" } => {
                words.next();
            }
            Word::Continuation { rest } | Word::Other(rest) => {
                words.next();
                return Some(rest);
            }
        }
    }
}

fn push_move(moves: &mut MoveList, token: &str) {
    if let Some(mv) = Move::from_token(token) {
        moves.push(mv);
    }
}

/// Ordered plies of the main line, one per half-move.
///
/// Each `N.` marker contributes the next two words as White's and Black's
/// moves. Result markers are dropped and check/mate marks stripped. Words
/// outside a numbered group are ignored.
pub fn parse_moves(text: &str) -> MoveList {
    let mut moves = MoveList::new();
    let mut words = Words::new(text).peekable();

    while let Some(word) = words.next() {
        let Word::MoveNumber { rest } = classify(word) else {
            continue;
        };

        let white = if rest.is_empty() {
            next_candidate(&mut words)
        } else {
            Some(rest)
        };

        let Some(white) = white else {
            continue;
        };
        if is_result_marker(white) {
            continue;
        }
        push_move(&mut moves, white);

        if let Some(black) = next_candidate(&mut words)
            && !is_result_marker(black)
        {
            push_move(&mut moves, black);
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sans(text: &str) -> Vec<String> {
        parse_moves(text).iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_full_groups() {
        assert_eq!(
            sans("1. e4 e5 2. Nf3 Nc6 1-0"),
            vec!["e4", "e5", "Nf3", "Nc6"]
        );
    }

    #[test]
    fn test_trailing_white_move() {
        assert_eq!(
            sans("1. e4 e5 2. Qh5 Nc6 3. Qxf7# 1-0"),
            vec!["e4", "e5", "Qh5", "Nc6", "Qxf7"]
        );
    }

    #[test]
    fn test_single_decorated_move() {
        assert_eq!(sans("1. Nxd4+ 1-0"), vec!["Nxd4"]);
    }

    #[test]
    fn test_all_result_markers_excluded() {
        assert_eq!(sans("1. e4 1-0"), vec!["e4"]);
        assert_eq!(sans("1. e4 e5 0-1"), vec!["e4", "e5"]);
        assert_eq!(sans("1. e4 e5 2. d4 1/2-1/2"), vec!["e4", "e5", "d4"]);
        assert_eq!(sans("1. e4 *"), vec!["e4"]);
    }

    #[test]
    fn test_dangling_result_contributes_nothing() {
        assert!(sans("1-0").is_empty());
        assert!(sans("1. 1/2-1/2").is_empty());
    }

    #[test]
    fn test_no_groups_is_empty() {
        assert!(sans("").is_empty());
        assert!(sans("e4 e5 Nf3").is_empty());
        assert!(sans("[Event \"x\"]\n").is_empty());
    }

    #[test]
    fn test_clock_comments_are_skipped() {
        let text = "1. e4 {[%clk 0:10:00]} e5 {[%clk 0:10:00]} 2. Nf3 {[%clk 0:09:50]} Nc6 {[%clk 0:09:45]} 1-0";
        assert_eq!(sans(text), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_lichess_continuation_markers() {
        let text = "1. e4 { [%clk 0:03:00] } 1... e5 { [%clk 0:03:00] } 2. Nf3+ { [%clk 0:02:58] } 2... Nc6 0-1";
        assert_eq!(sans(text), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_tag_values_do_not_leak_into_moves() {
        let text = "[Event \"Round 1. Final\"]\n[Site \"?\"]\n\n1. d4 d5 *";
        assert_eq!(sans(text), vec!["d4", "d5"]);
    }

    #[test]
    fn test_glued_move_numbers() {
        assert_eq!(sans("1.e4 e5 2.Nf3 1...Nc6"), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_variations_nags_and_line_comments() {
        let text = "1. e4 $1 (1. d4 (1. c4) d5) e5 ; main line\n2. Nf3 { best } Nc6";
        assert_eq!(sans(text), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_multiline_movetext_with_multiline_comment() {
        let text = "1. e4 e5 {a comment\nthat spans [lines]} 2. Nf3\nNc6\n3. Bb5 1-0";
        assert_eq!(sans(text), vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    }

    #[test]
    fn test_unterminated_comment_ends_movetext() {
        assert_eq!(sans("1. e4 e5 2. Nf3 {never closed Nc6"), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_decorations_never_survive() {
        let moves = sans("1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0 5. O-O-O+ Kd8#");
        assert!(moves.iter().all(|m| !m.contains('+') && !m.contains('#')));
        assert!(!moves.iter().any(|m| is_result_marker(m)));
    }

    #[test]
    fn test_annotated_check_and_mate() {
        assert_eq!(
            sans("1. e4 e5 2. Nf3+?! Nc6 3. Qxf7#! 1-0"),
            vec!["e4", "e5", "Nf3", "Nc6", "Qxf7"]
        );
    }

    #[test]
    fn test_classify_words() {
        assert_eq!(classify("12."), Word::MoveNumber { rest: "" });
        assert_eq!(classify("3.Bb5"), Word::MoveNumber { rest: "Bb5" });
        assert_eq!(classify("7..."), Word::Continuation { rest: "" });
        assert_eq!(classify("$14"), Word::Nag);
        assert_eq!(classify("1-0"), Word::Other("1-0"));
        assert_eq!(classify("Nf3"), Word::Other("Nf3"));
    }
}
