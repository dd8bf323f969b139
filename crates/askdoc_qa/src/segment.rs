use serde::{Deserialize, Serialize};

/// One candidate answer span cut from the document text.
///
/// `ordinal` is the position of the unit in the source document. It is used
/// only as a ranking tie-break, never as a relevance signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    pub ordinal: u32,
    pub text: String,
}

/// Bound on the fallback unit when the text has no usable boundaries.
pub const FALLBACK_PREFIX_CHARS: usize = 2000;

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits at sentence-terminal punctuation followed by whitespace, or at
/// runs of newlines, whichever occurs first at each scan position. A
/// punctuation boundary consumes the whole following whitespace run; a
/// newline boundary consumes only the newlines.
fn split_at_boundaries(text: &str) -> (Vec<&str>, bool) {
    let mut pieces = Vec::new();
    let mut boundary_seen = false;
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let followed_by_ws = chars.peek().map(|&(_, n)| n.is_whitespace()).unwrap_or(false);
            if followed_by_ws {
                pieces.push(&text[start..i + c.len_utf8()]);
                boundary_seen = true;
                start = text.len();
                while let Some(&(j, w)) = chars.peek() {
                    if w.is_whitespace() {
                        chars.next();
                    } else {
                        start = j;
                        break;
                    }
                }
            }
        } else if c == '\n' {
            pieces.push(&text[start..i]);
            boundary_seen = true;
            start = text.len();
            while let Some(&(j, w)) = chars.peek() {
                if w == '\n' {
                    chars.next();
                } else {
                    start = j;
                    break;
                }
            }
        }
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }
    (pieces, boundary_seen)
}

/// Cuts document text into ordered candidate units.
///
/// When the text contains no boundary at all, or no piece survives
/// trimming, the result is a single fallback unit holding the first
/// [`FALLBACK_PREFIX_CHARS`] characters of the newline-normalized text,
/// internal structure intact. A non-empty input therefore always yields at
/// least one unit.
pub fn segment(document_text: &str) -> Vec<Unit> {
    let normalized = normalize_newlines(document_text);
    let (pieces, boundary_seen) = split_at_boundaries(&normalized);

    let mut units: Vec<Unit> = Vec::new();
    if boundary_seen {
        for piece in pieces {
            let collapsed = collapse_whitespace(piece);
            if collapsed.is_empty() {
                continue;
            }
            units.push(Unit {
                ordinal: units.len() as u32,
                text: collapsed,
            });
        }
    }

    if units.is_empty() {
        let prefix: String = normalized.chars().take(FALLBACK_PREFIX_CHARS).collect();
        if !prefix.is_empty() {
            units.push(Unit {
                ordinal: 0,
                text: prefix,
            });
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(units: &[Unit]) -> Vec<&str> {
        units.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation_followed_by_whitespace() {
        let units = segment("One. Two! Three? Four");
        assert_eq!(texts(&units), vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn punctuation_without_following_whitespace_does_not_split() {
        let units = segment("Version 1.2 shipped today.\nNext line");
        assert_eq!(texts(&units), vec!["Version 1.2 shipped today.", "Next line"]);
    }

    #[test]
    fn newline_runs_split_without_punctuation() {
        let units = segment("alpha\n\n\nbeta\ngamma");
        assert_eq!(texts(&units), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn punctuation_boundary_consumes_newlines_too() {
        let units = segment("End of part one. \n\n Start of part two");
        assert_eq!(texts(&units), vec!["End of part one.", "Start of part two"]);
    }

    #[test]
    fn abbreviations_are_not_special_cased() {
        // Known limitation carried over deliberately.
        let units = segment("Dr. Smith arrived. He left.");
        assert_eq!(texts(&units), vec!["Dr.", "Smith arrived.", "He left."]);
    }
}
