use std::borrow::Cow;
use std::sync::Arc;
use tagsoup::{Config, EntityDecoder, TokenKind, decode_entities, tokenize};
use tagsoup_test_support::chunker::{BoundaryPolicy, Lcg, internal_boundaries};

#[test]
fn reference_literals() {
    assert_eq!(decode_entities("&#60;"), "<");
    assert_eq!(decode_entities("&#x3c;"), "<");
    assert_eq!(decode_entities("&ltfoo"), "<foo");
    assert_eq!(decode_entities("&unknown;"), "&unknown;");
}

#[test]
fn scanned_spans_decode_on_demand() {
    let input = "<a title=\"&lt;&#x41;&copy2\">x &amp;&amp y &hellip; &nosuch; &#0;</a>";
    let config = Arc::new(Config::default());
    let tokens = tokenize(input, &config).expect("tokenize");
    let decoded: Vec<(TokenKind, String)> = tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::AttributeValue | TokenKind::Text))
        .map(|t| {
            let raw = t.text(input).expect("span inside input");
            (t.kind, decode_entities(raw).into_owned())
        })
        .collect();
    assert_eq!(
        decoded,
        vec![
            (TokenKind::AttributeValue, "<A\u{00A9}2".to_string()),
            (TokenKind::Text, "x && y \u{2026} &nosuch; \u{FFFD}".to_string()),
        ]
    );
}

#[test]
fn decoding_is_idempotent_without_ampersands() {
    for input in ["", "plain", "caf\u{00E9} <b> ; # x3c", "\u{1F600}"] {
        let once = decode_entities(input);
        assert!(matches!(once, Cow::Borrowed(_)));
        assert_eq!(decode_entities(&once), input);
    }
}

#[test]
fn random_chunking_matches_whole_decoding() {
    let inputs = [
        "&amp;&lt;&gt;&quot;&apos;",
        "a&notin;b&not c&notit;",
        "&#x1F600;&#128512;&#x110000;&#xD800;&#150;&#",
        "&AElig&aelig;&Eacute&#X41&#65x",
        "&&&;&#;&#x;&hellip;&hellip",
        "caf\u{00E9} &copy\u{00E9} &eacute;t\u{00E9}",
    ];
    let mut rng = Lcg::new(0xE117_1E5);
    for input in inputs {
        let whole = decode_entities(input).into_owned();
        let candidates = internal_boundaries(input, BoundaryPolicy::Utf8Aligned);
        for _ in 0..32 {
            let mut picks = candidates.clone();
            rng.shuffle(&mut picks);
            picks.truncate(rng.gen_range(picks.len() + 1));
            picks.sort_unstable();

            let mut decoder = EntityDecoder::html();
            let mut out = String::new();
            let mut last = 0;
            for cut in picks.iter().copied().chain(std::iter::once(input.len())) {
                decoder.push(&input[last..cut], &mut out);
                last = cut;
            }
            decoder.finish(&mut out);
            assert_eq!(out, whole, "input={input:?} cuts={picks:?}");
        }
    }
}

#[test]
fn xml_decoder_requires_semicolons() {
    let decoder = EntityDecoder::xml();
    assert_eq!(decoder.decode("&lt;&lt &copy; &#38;"), "<&lt &copy; &");
}
