use askdoc_qa::segment::{segment, FALLBACK_PREFIX_CHARS};

#[test]
fn any_non_empty_text_yields_at_least_one_unit() {
    for text in [
        "plain sentence.",
        "no terminal punctuation",
        "\n\n\n",
        "   ",
        "a",
        "Mixed. Content\nacross lines",
    ] {
        let units = segment(text);
        assert!(!units.is_empty(), "no units for {text:?}");
    }
}

#[test]
fn units_keep_their_source_order() {
    let doc = "First point. Second point.\nThird point! Fourth";
    let units = segment(doc);
    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["First point.", "Second point.", "Third point!", "Fourth"]
    );
    for (i, u) in units.iter().enumerate() {
        assert_eq!(u.ordinal, i as u32);
    }
}

#[test]
fn internal_whitespace_is_collapsed_and_pieces_trimmed() {
    let doc = "  spaced   out\ttext.  next\u{a0}piece. ";
    let units = segment(doc);
    assert_eq!(units[0].text, "spaced out text.");
    assert!(units.iter().all(|u| u.text == u.text.trim()));
}

#[test]
fn windows_and_mac_line_endings_are_normalized() {
    let doc = "line one\r\nline two\rline three";
    let units = segment(doc);
    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["line one", "line two", "line three"]);
}

#[test]
fn boundary_free_run_on_falls_back_to_a_bounded_prefix() {
    let doc = "word ".repeat(500);
    assert!(doc.chars().count() > FALLBACK_PREFIX_CHARS);

    let units = segment(&doc);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].text.chars().count(), FALLBACK_PREFIX_CHARS);
}

#[test]
fn short_boundary_free_text_falls_back_to_the_whole_text() {
    let units = segment("hello   world");
    assert_eq!(units.len(), 1);
    // The fallback keeps internal structure; it is not collapsed.
    assert_eq!(units[0].text, "hello   world");
}

#[test]
fn whitespace_only_pieces_are_discarded() {
    let doc = "real content.   \n\n   \nmore content";
    let units = segment(doc);
    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["real content.", "more content"]);
}
