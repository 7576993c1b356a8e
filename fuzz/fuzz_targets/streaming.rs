#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;
use tagsoup::{Config, ParseOptions, ParseSession, SessionOptions};

fuzz_target!(|data: &[u8]| {
    let Some((&mask, rest)) = data.split_first() else {
        return;
    };
    let config = Arc::new(Config::new(&ParseOptions {
        void_tags: vec!["br".to_string()],
        raw_text_tags: vec!["script".to_string()],
        case_insensitive_tags: mask & 1 != 0,
        unbalanced_start_tags_auto_close: mask & 2 != 0,
        unbalanced_end_tags_ignored: mask & 4 != 0,
        cdata_recognized: mask & 8 != 0,
        processing_instructions_recognized: mask & 16 != 0,
        strict: mask & 32 != 0,
        ..ParseOptions::default()
    }));
    let options = SessionOptions {
        document: mask & 64 != 0,
        normalize: mask & 128 == 0,
    };

    let mut whole_session = ParseSession::with_options(Arc::clone(&config), options);
    let mut whole = Vec::new();
    let whole_result = whole_session.finish_bytes(rest, &mut whole);

    // Chunk lengths come from the input itself, so the fuzzer steers the cuts.
    let mut chunked_session = ParseSession::with_options(config, options);
    let mut chunked = Vec::new();
    let mut chunked_result = Ok(());
    let mut offset = 0usize;
    let mut step = 0usize;
    while offset < rest.len() && chunked_result.is_ok() {
        let size = 1 + (rest[step % rest.len()] as usize % 7);
        let end = (offset + size).min(rest.len());
        chunked_result = chunked_session.write_bytes(&rest[offset..end], &mut chunked);
        offset = end;
        step += 1;
    }
    let finished = chunked_session.finish_bytes(&[], &mut chunked);
    if chunked_result.is_ok() {
        chunked_result = finished;
    }

    assert_eq!(whole_result, chunked_result);
    assert_eq!(whole, chunked);
});
