//! Drive a [`ParseSession`] whole or through a chunk plan and capture the
//! outcome, including a terminating error.

use crate::chunker::{BoundaryPolicy, ChunkPlan};
use std::sync::Arc;
use tagsoup::{Config, ParseSession, SessionOptions, StructuralError, Token};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub tokens: Vec<Token>,
    pub error: Option<StructuralError>,
}

impl RunOutcome {
    /// Token lines followed by an `Error` line when the run failed.
    pub fn lines(&self, source: &str, case_id: &str, mode: &str) -> Result<Vec<String>, String> {
        let context = crate::token_snapshot::TokenFormatContext { case_id, mode };
        let mut lines = crate::token_snapshot::format_tokens(&self.tokens, source, &context)?;
        if let Some(err) = &self.error {
            lines.push(format!("Error {:?} {}..{}", err.kind, err.start, err.end));
        }
        Ok(lines)
    }
}

pub fn run_whole(input: &str, config: &Arc<Config>, options: SessionOptions) -> RunOutcome {
    let mut session = ParseSession::with_options(Arc::clone(config), options);
    let mut tokens = Vec::new();
    let error = session.finish(input, &mut tokens).err();
    RunOutcome { tokens, error }
}

/// Feed `input` chunk by chunk, then `finish` with an empty chunk.
///
/// The first error stops the run; the session is still finished so its
/// poisoning is exercised.
pub fn run_chunked(
    input: &str,
    config: &Arc<Config>,
    options: SessionOptions,
    plan: &ChunkPlan,
) -> RunOutcome {
    let mut session = ParseSession::with_options(Arc::clone(config), options);
    let mut tokens = Vec::new();
    let mut error = None;
    let bytes = matches!(plan.policy(), BoundaryPolicy::ByteStream);
    plan.for_each_chunk(input, |chunk| {
        if error.is_some() {
            return;
        }
        let result = if bytes {
            session.write_bytes(chunk, &mut tokens)
        } else {
            let text = std::str::from_utf8(chunk)
                .unwrap_or_else(|_| panic!("chunk plan produced invalid UTF-8 boundary"));
            session.write(text, &mut tokens)
        };
        error = result.err();
    });
    let finished = if bytes {
        session.finish_bytes(&[], &mut tokens)
    } else {
        session.finish("", &mut tokens)
    };
    if let Err(err) = finished {
        if let Some(first) = &error {
            assert_eq!(first, &err, "finish must report the poisoning error");
        }
        error.get_or_insert(err);
    }
    RunOutcome { tokens, error }
}
