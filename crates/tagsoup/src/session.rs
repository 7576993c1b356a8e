//! Streaming driver.
//!
//! A session turns chunked input into one token stream whose spans are
//! absolute offsets over the whole logical input. Between calls it keeps the
//! unconsumed suffix (`tail`) and the absolute offset of its first byte; each
//! call scans `tail + chunk` again from the tail start.
//!
//! Invariants:
//! - Chunk-equivalence: any partition of an input into `write` calls followed
//!   by `finish` produces exactly the tokens of one `finish` over the whole
//!   input.
//! - Once a call fails, the session is poisoned: `write` keeps returning the
//!   same error and `finish` returns it and resets for a new input. Tokens
//!   delivered before the error form a valid, well-nested prefix.

use crate::config::{Config, SessionOptions};
use crate::error::StructuralError;
use crate::normalizer::Normalizer;
use crate::scanner::{Downstream, Scanner};
use crate::token::{Token, TokenSink};
use std::sync::Arc;
use tools::utf8::Utf8Carry;

/// Session instrumentation. Counters accumulate across inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// `write`/`finish` calls that reached the scanner.
    pub chunks: u64,
    pub tokens_emitted: u64,
    pub synthesized_tokens: u64,
    /// Tail bytes scanned a second time because a construct was still open.
    pub rescanned_bytes: u64,
}

pub struct ParseSession {
    scanner: Scanner,
    normalizer: Option<Normalizer>,
    tail: String,
    offset: usize,
    decoder: Utf8Carry,
    failure: Option<StructuralError>,
    stats: SessionStats,
}

impl ParseSession {
    /// Whole-document, normalized session.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_options(config, SessionOptions::default())
    }

    pub fn with_options(config: Arc<Config>, options: SessionOptions) -> Self {
        let normalizer = options
            .normalize
            .then(|| Normalizer::new(Arc::clone(&config)));
        Self {
            scanner: Scanner::new(config, options.document),
            normalizer,
            tail: String::new(),
            offset: 0,
            decoder: Utf8Carry::new(),
            failure: None,
            stats: SessionStats::default(),
        }
    }

    /// Feed the next chunk. Tokens for every construct that can no longer
    /// change are delivered to `sink`; the rest waits in the tail.
    pub fn write(&mut self, chunk: &str, sink: &mut dyn TokenSink) -> Result<(), StructuralError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.tail.push_str(chunk);
        self.pump(false, sink)
    }

    /// Feed the last chunk (possibly empty) and resolve everything still open.
    ///
    /// Afterwards the session is reset and ready for a new input, whether or
    /// not this call succeeded.
    pub fn finish(&mut self, chunk: &str, sink: &mut dyn TokenSink) -> Result<(), StructuralError> {
        let result = self.finish_input(chunk, sink);
        log::debug!(
            target: "tagsoup.session",
            "finished input: len={} ok={} tokens={} synthesized={}",
            self.offset,
            result.is_ok(),
            self.stats.tokens_emitted,
            self.stats.synthesized_tokens
        );
        self.reset();
        result
    }

    /// Byte-level `write`: bytes are decoded as UTF-8, holding back a sequence
    /// split across chunks and replacing invalid sequences with U+FFFD.
    pub fn write_bytes(
        &mut self,
        bytes: &[u8],
        sink: &mut dyn TokenSink,
    ) -> Result<(), StructuralError> {
        let mut text = String::with_capacity(bytes.len());
        self.decoder.decode(bytes, &mut text);
        self.write(&text, sink)
    }

    pub fn finish_bytes(
        &mut self,
        bytes: &[u8],
        sink: &mut dyn TokenSink,
    ) -> Result<(), StructuralError> {
        let mut text = String::with_capacity(bytes.len());
        self.decoder.decode(bytes, &mut text);
        self.decoder.finish(&mut text);
        self.finish(&text, sink)
    }

    /// Discard all per-input state, including a recorded failure.
    pub fn reset(&mut self) {
        self.scanner.reset();
        if let Some(normalizer) = &mut self.normalizer {
            normalizer.reset();
        }
        self.tail.clear();
        self.offset = 0;
        self.decoder = Utf8Carry::new();
        self.failure = None;
    }

    /// Absolute offset of the first unconsumed byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Input received but not yet finalized.
    pub fn pending(&self) -> &str {
        &self.tail
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    fn finish_input(
        &mut self,
        chunk: &str,
        sink: &mut dyn TokenSink,
    ) -> Result<(), StructuralError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        self.tail.push_str(chunk);
        self.pump(true, sink)?;
        debug_assert!(self.tail.is_empty(), "final scan must consume the tail");
        if let Some(normalizer) = &mut self.normalizer {
            let mut out = Counting {
                sink,
                stats: &mut self.stats,
            };
            if let Err(err) = normalizer.finish(self.offset, &mut out) {
                return Err(self.poison(err));
            }
        }
        Ok(())
    }

    fn pump(&mut self, is_final: bool, sink: &mut dyn TokenSink) -> Result<(), StructuralError> {
        self.stats.chunks += 1;
        let mut buffer = std::mem::take(&mut self.tail);
        let mut stage = Stage {
            normalizer: self.normalizer.as_mut(),
            out: Counting {
                sink,
                stats: &mut self.stats,
            },
        };
        match self.scanner.scan_at(&buffer, self.offset, is_final, &mut stage) {
            Ok(consumed) => {
                buffer.drain(..consumed);
                self.offset += consumed;
                self.stats.rescanned_bytes += buffer.len() as u64;
                self.tail = buffer;
                Ok(())
            }
            Err(err) => Err(self.poison(err.with_source(&buffer, self.offset))),
        }
    }

    fn poison(&mut self, err: StructuralError) -> StructuralError {
        log::debug!(target: "tagsoup.session", "session poisoned: {err}");
        self.failure = Some(err.clone());
        err
    }
}

/// Counts tokens on their way to the caller's sink.
struct Counting<'s, 'k> {
    sink: &'k mut dyn TokenSink,
    stats: &'s mut SessionStats,
}

impl TokenSink for Counting<'_, '_> {
    fn push(&mut self, token: Token) {
        self.stats.tokens_emitted += 1;
        if token.synthesized {
            self.stats.synthesized_tokens += 1;
        }
        self.sink.push(token);
    }
}

/// Scanner output stage: through the normalizer, or straight to the sink.
struct Stage<'n, 's, 'k> {
    normalizer: Option<&'n mut Normalizer>,
    out: Counting<'s, 'k>,
}

impl Downstream for Stage<'_, '_, '_> {
    fn accept(&mut self, token: Token) -> Result<(), StructuralError> {
        match self.normalizer.as_deref_mut() {
            Some(normalizer) => normalizer.push(token, &mut self.out),
            None => {
                self.out.push(token);
                Ok(())
            }
        }
    }
}
