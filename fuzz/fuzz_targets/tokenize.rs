#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use std::sync::Arc;
use tagsoup::{Config, ParseOptions, ParseSession, TagId, Token, TokenKind};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn dialect(mask: u8) -> ParseOptions {
    let mut closed = BTreeMap::new();
    closed.insert("p".to_string(), names(&["p"]));
    closed.insert("li".to_string(), names(&["li", "p"]));
    ParseOptions {
        void_tags: names(&["br", "img"]),
        raw_text_tags: names(&["script"]),
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

fn check_nesting(input: &str, tokens: &[Token]) -> usize {
    let mut stack: Vec<TagId> = Vec::new();
    for token in tokens {
        assert!(token.end() <= input.len());
        assert!(input.is_char_boundary(token.start()) && input.is_char_boundary(token.end()));
        match token.kind {
            TokenKind::StartTagName => stack.push(token.tag.expect("start tag id")),
            TokenKind::EndTagName => assert_eq!(stack.pop(), token.tag),
            _ => {}
        }
    }
    stack.len()
}

fuzz_target!(|data: &[u8]| {
    let Some((&mask, rest)) = data.split_first() else {
        return;
    };
    let input = String::from_utf8_lossy(rest);
    let config = Arc::new(Config::new(&dialect(mask)));
    let mut session = ParseSession::new(config);
    let mut tokens = Vec::new();
    let result = session.finish(&input, &mut tokens);
    let open = check_nesting(&input, &tokens);
    if result.is_ok() {
        assert_eq!(open, 0);
    }
});
