use crate::rank::ScoredUnit;

/// Hard cap on the synthesized answer, counted in characters.
pub const MAX_ANSWER_CHARS: usize = 1200;

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.chars().take(max_chars).collect()
}

/// Concatenates the top matches into the answer string.
///
/// Candidates arrive score-descending and threshold-passed. A candidate is
/// skipped when its trimmed text is empty or exactly equals an already
/// accepted text (case-sensitive). Returns None when nothing survives,
/// which callers fold into the unified no-confident-answer outcome.
pub fn synthesize(candidates: &[ScoredUnit]) -> Option<String> {
    let mut accepted: Vec<&str> = Vec::new();
    for c in candidates {
        let text = c.unit.text.trim();
        if text.is_empty() {
            continue;
        }
        if accepted.iter().any(|a| *a == text) {
            continue;
        }
        accepted.push(text);
    }
    if accepted.is_empty() {
        return None;
    }
    // Hard cut, not word-boundary aware.
    Some(truncate_chars(&accepted.join(" "), MAX_ANSWER_CHARS))
}
