//! Whatever the input and dialect, normalized output is well nested, ordered,
//! and every span points inside the input.

use std::collections::BTreeMap;
use std::sync::Arc;
use tagsoup::{Config, ParseOptions, TagId, Token, TokenKind, tokenize};
use tagsoup_test_support::chunker::Lcg;

const SOUP: [&str; 12] = [
    "<p>a<p>b<ul><li>1<li>2</ul></p>",
    "<a><b><c></a></b></c>",
    "</x></br><br>text</p>",
    "<DIV class=a><span>x</DIV></Span>",
    "<script><b></script><style></b></STYLE>",
    "<!DOCTYPE html><?pi data?><![CDATA[<x>]]><!-- <y> -->",
    "<img src='a'><img/><br/></img>",
    "<a b=\"unterminated><c>",
    "<<>><</><!><?>",
    "<t\u{00E9}st \u{00E9}=\"\u{1F600}\">\u{00E9}</t\u{00E9}st>",
    "<li><p>x<li>y",
    "",
];

const PIECES: [&str; 22] = [
    "<a>", "</a>", "<b>", "</b>", "<p>", "</p>", "<li>", "</li>", "<br>", "</br>", "<x/>",
    "<script>", "</script>", "text", " ", "<!--c-->", "<!x>", "<?y?>", "<![CDATA[z]]>", "<",
    "'", "k=v ",
];

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn dialect(mask: u32) -> ParseOptions {
    let mut closed = BTreeMap::new();
    closed.insert("p".to_string(), names(&["p"]));
    closed.insert("li".to_string(), names(&["li", "p"]));
    ParseOptions {
        void_tags: names(&["br", "img"]),
        raw_text_tags: names(&["script", "style"]),
        implicitly_closed_tags: closed,
        implicitly_opened_tags: names(&["br", "p"]),
        case_insensitive_tags: mask & 1 != 0,
        self_closing_recognized: mask & 2 != 0,
        unbalanced_start_tags_auto_close: mask & 4 != 0,
        unbalanced_end_tags_ignored: mask & 8 != 0,
        cdata_recognized: mask & 16 != 0,
        processing_instructions_recognized: mask & 32 != 0,
        strict: mask & 64 != 0,
    }
}

/// Replay `tokens` and check nesting; returns the elements left open.
fn check_nesting(input: &str, tokens: &[Token], context: &str) -> Vec<TagId> {
    let mut stack: Vec<TagId> = Vec::new();
    let mut last_start = 0usize;
    let mut last_real_end = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        let span = token.span;
        assert!(span.end <= input.len(), "{context}: token #{i} past input end");
        assert!(
            input.is_char_boundary(span.start) && input.is_char_boundary(span.end),
            "{context}: token #{i} splits a character"
        );
        assert!(span.start >= last_start, "{context}: token #{i} out of order");
        last_start = span.start;
        if !token.synthesized {
            assert!(
                span.start >= last_real_end,
                "{context}: token #{i} overlaps the previous scanned token"
            );
            last_real_end = span.end;
        }
        match token.kind {
            TokenKind::StartTagName => {
                stack.push(token.tag.expect("start tag carries an id"));
            }
            TokenKind::EndTagName => {
                let tag = token.tag.expect("end tag carries an id");
                assert_eq!(stack.pop(), Some(tag), "{context}: token #{i} closes the wrong tag");
                if token.synthesized {
                    assert!(span.is_empty(), "{context}: synthesized end #{i} must be zero-width");
                }
            }
            TokenKind::StartTagClosing | TokenKind::StartTagSelfClosing => {
                assert!(token.tag.is_some(), "{context}: closing token #{i} carries an id");
            }
            _ => assert!(!token.synthesized, "{context}: only tags are synthesized"),
        }
    }
    stack
}

fn sweep(input: &str) {
    for mask in 0..128u32 {
        let config = Arc::new(Config::new(&dialect(mask)));
        let context = format!("mask={mask:#09b} input={input:?}");
        match tokenize(input, &config) {
            Ok(tokens) => {
                let open = check_nesting(input, &tokens, &context);
                assert!(open.is_empty(), "{context}: elements left open");
            }
            Err(err) => {
                assert!(err.start <= err.end && err.end <= input.len(), "{context}: {err}");
                // The delivered prefix stays well nested; collect it with a sink.
                let mut prefix = Vec::new();
                let mut session = tagsoup::ParseSession::new(Arc::clone(&config));
                let again = session.finish(input, &mut prefix).expect_err("deterministic");
                assert_eq!(again, err);
                check_nesting(input, &prefix, &context);
            }
        }
    }
}

#[test]
fn handwritten_soup_is_well_nested_under_every_dialect() {
    for input in SOUP {
        sweep(input);
    }
}

#[test]
fn generated_soup_is_well_nested() {
    let mut rng = Lcg::new(0x5eed_50a9);
    for _ in 0..64 {
        let count = 1 + rng.gen_range(16);
        let input: String = (0..count)
            .map(|_| PIECES[rng.gen_range(PIECES.len())])
            .collect();
        sweep(&input);
    }
}

#[test]
fn lenient_defaults_never_fail() {
    let config = Arc::new(Config::default());
    for input in SOUP {
        let tokens = tokenize(input, &config).expect("default dialect is lenient");
        assert!(check_nesting(input, &tokens, input).is_empty());
    }
}
