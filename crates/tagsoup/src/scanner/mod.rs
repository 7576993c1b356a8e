//! Character-level scanner.
//!
//! One left-to-right pass over a buffer that classifies raw constructs and
//! emits a flat, order-preserving token sequence.
//!
//! Invariants:
//! - Resumability: in non-final mode the scanner never emits a token whose
//!   extent more input could still change. It stops before such a construct
//!   (or before the pending text run in front of it) and reports how much of
//!   the buffer it finalized. The state it keeps at that boundary is only
//!   `{state, raw_text}`, so re-presenting the unconsumed suffix followed by
//!   new input reproduces exactly what a single final pass would emit.
//! - Text runs are flushed only in front of a recognized construct, or at the
//!   end of the buffer in final mode.
//! - Unterminated comments, CDATA sections, processing instructions, DOCTYPEs,
//!   end tags and quoted values consume to the end of the buffer in final mode.

mod chars;
mod input;
mod states;

use crate::config::Config;
use crate::error::{ErrorKind, StructuralError};
use crate::ident::TagId;
use crate::token::{Token, TokenKind, TokenSink};
use input::{MatchResult, find, match_ascii_prefix, match_ascii_prefix_ci, skip_space};
use memchr::memchr;
use states::ScanState;
use std::sync::Arc;

/// Receiver of scanner output that may reject a token.
pub(crate) trait Downstream {
    fn accept(&mut self, token: Token) -> Result<(), StructuralError>;
}

struct Direct<'s>(&'s mut dyn TokenSink);

impl Downstream for Direct<'_> {
    fn accept(&mut self, token: Token) -> Result<(), StructuralError> {
        self.0.push(token);
        Ok(())
    }
}

type ProbeFn = fn(&mut Scanner, &mut Pass<'_, '_>, usize) -> Result<Probe, StructuralError>;

/// Constructs tried on `<` outside raw text, in priority order.
const MARKUP_PROBES: [ProbeFn; 7] = [
    Scanner::processing_instruction,
    Scanner::doctype,
    Scanner::cdata,
    Scanner::comment,
    Scanner::end_tag,
    Scanner::start_tag,
    Scanner::permissive_comment,
];

/// Raw-construct scanner.
#[derive(Clone, Debug)]
pub struct Scanner {
    config: Arc<Config>,
    document: bool,
    state: ScanState,
    raw_text: Option<TagId>,
}

impl Scanner {
    /// `document` enables the prologue state, and with it DOCTYPE recognition.
    pub fn new(config: Arc<Config>, document: bool) -> Self {
        Self {
            state: initial_state(document),
            config,
            document,
            raw_text: None,
        }
    }

    /// Forget all per-input state.
    pub fn reset(&mut self) {
        self.state = initial_state(self.document);
        self.raw_text = None;
    }

    /// The raw-text element currently being skipped over, if any.
    pub fn raw_text(&self) -> Option<TagId> {
        self.raw_text
    }

    /// Scan `buf`, pushing raw tokens to `sink`, and return the number of
    /// bytes finalized.
    ///
    /// Spans are relative to `buf`. In non-final mode the caller re-presents
    /// `buf[consumed..]` in front of the next chunk.
    pub fn scan(
        &mut self,
        buf: &str,
        is_final: bool,
        sink: &mut dyn TokenSink,
    ) -> Result<usize, StructuralError> {
        self.scan_at(buf, 0, is_final, &mut Direct(sink))
    }

    /// Scan `buf`, whose first byte sits at absolute offset `base`.
    pub(crate) fn scan_at(
        &mut self,
        buf: &str,
        base: usize,
        is_final: bool,
        out: &mut dyn Downstream,
    ) -> Result<usize, StructuralError> {
        let mut pass = Pass {
            buf,
            base,
            is_final,
            out,
            text_start: None,
        };
        let mut pos = 0;
        loop {
            let step = match self.state {
                ScanState::StartTag { tag } => self.step_start_tag(&mut pass, pos, tag)?,
                ScanState::Prologue | ScanState::Text => self.step_text(&mut pass, pos)?,
            };
            match step {
                Step::Continue(next) => {
                    debug_assert!(next > pos, "scanner must make progress");
                    pos = next;
                }
                Step::Stop(consumed) => return Ok(consumed),
            }
        }
    }

    fn step_text(&mut self, pass: &mut Pass<'_, '_>, pos: usize) -> Result<Step, StructuralError> {
        let text_start = *pass.text_start.get_or_insert(pos);
        let len = pass.buf.len();
        let Some(lt) = memchr(b'<', &pass.buf.as_bytes()[pos..]).map(|rel| pos + rel) else {
            if !pass.is_final {
                return Ok(Step::Stop(text_start));
            }
            self.flush_text(pass, len)?;
            return Ok(Step::Stop(len));
        };
        let probe = if self.raw_text.is_some() {
            // Only the matching end tag ends raw text; any other `<` is content.
            self.end_tag(pass, lt)?
        } else {
            self.markup(pass, lt)?
        };
        Ok(match probe {
            Probe::Found(end) => Step::Continue(end),
            Probe::Incomplete => Step::Stop(text_start),
            Probe::NoMatch => Step::Continue(lt + 1),
        })
    }

    fn markup(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        for probe in MARKUP_PROBES {
            match probe(self, pass, lt)? {
                Probe::NoMatch => {}
                decided => return Ok(decided),
            }
        }
        if self.config.strict() {
            return Err(pass.error(
                "expected a tag, comment or declaration after '<'",
                lt,
                lt + 1,
            ));
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "tagsoup.scanner", "'<' folded into text @{}", pass.base + lt);
        Ok(Probe::NoMatch)
    }

    fn processing_instruction(
        &mut self,
        pass: &mut Pass<'_, '_>,
        lt: usize,
    ) -> Result<Probe, StructuralError> {
        if !self.config.processing_instructions_recognized() {
            return Ok(Probe::NoMatch);
        }
        if let Some(probe) = unmatched(pass.prefix(lt, b"<?")) {
            return Ok(probe);
        }
        let target = lt + 2;
        if let Some(probe) = unmatched(pass.name_start(target)) {
            return Ok(probe);
        }
        let target_end = self.name_end(pass.buf, target, &['?']);
        let Some((close, after)) = pass.close(target_end, b"?>") else {
            return Ok(Probe::Incomplete);
        };
        let data_start = skip_space(pass.buf.as_bytes(), target_end);
        self.flush_text(pass, lt)?;
        pass.emit(TokenKind::ProcessingInstructionTarget, target, target_end)?;
        pass.emit(TokenKind::ProcessingInstructionData, data_start, close)?;
        Ok(Probe::Found(after))
    }

    fn doctype(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        if self.state != ScanState::Prologue || !pass.pending_text(lt).trim_ascii().is_empty() {
            return Ok(Probe::NoMatch);
        }
        if let Some(probe) = unmatched(pass.prefix_ci(lt, b"<!DOCTYPE")) {
            return Ok(probe);
        }
        let body = lt + b"<!DOCTYPE".len();
        let Some((close, after)) = pass.close(body, b">") else {
            return Ok(Probe::Incomplete);
        };
        let (start, end) = trim_span(pass.buf, body, close);
        self.flush_text(pass, lt)?;
        self.state = ScanState::Text;
        pass.emit(TokenKind::DoctypeName, start, end)?;
        Ok(Probe::Found(after))
    }

    fn cdata(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        if !self.config.cdata_recognized() {
            return Ok(Probe::NoMatch);
        }
        if let Some(probe) = unmatched(pass.prefix(lt, b"<![CDATA[")) {
            return Ok(probe);
        }
        let body = lt + b"<![CDATA[".len();
        let Some((close, after)) = pass.close(body, b"]]>") else {
            return Ok(Probe::Incomplete);
        };
        self.flush_text(pass, lt)?;
        self.leave_prologue();
        pass.emit(TokenKind::CdataSection, body, close)?;
        Ok(Probe::Found(after))
    }

    fn comment(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        if let Some(probe) = unmatched(pass.prefix(lt, b"<!--")) {
            return Ok(probe);
        }
        let body = lt + b"<!--".len();
        let Some((close, after)) = pass.close(body, b"-->") else {
            return Ok(Probe::Incomplete);
        };
        self.flush_text(pass, lt)?;
        pass.emit(TokenKind::Comment, body, close)?;
        Ok(Probe::Found(after))
    }

    fn end_tag(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        if let Some(probe) = unmatched(pass.prefix(lt, b"</")) {
            return Ok(probe);
        }
        let name_start = lt + 2;
        if let Some(probe) = unmatched(pass.name_start(name_start)) {
            return Ok(probe);
        }
        let name_end = self.name_end(pass.buf, name_start, &[]);
        if pass.is_open_end(name_end) {
            return Ok(Probe::Incomplete);
        }
        let tag = self.config.identify(&pass.buf[name_start..name_end]);
        if self.raw_text.is_some_and(|raw| raw != tag) {
            return Ok(Probe::NoMatch);
        }
        let Some((close, after)) = pass.close(name_end, b">") else {
            return Ok(Probe::Incomplete);
        };
        if self.config.strict() && !pass.buf[name_end..close].trim_ascii().is_empty() {
            return Err(pass.error("expected '>' after end tag name", name_end, close));
        }
        self.flush_text(pass, lt)?;
        self.leave_prologue();
        self.raw_text = None;
        pass.emit_tag(TokenKind::EndTagName, name_start, name_end, tag)?;
        Ok(Probe::Found(after))
    }

    fn start_tag(&mut self, pass: &mut Pass<'_, '_>, lt: usize) -> Result<Probe, StructuralError> {
        let name_start = lt + 1;
        if let Some(probe) = unmatched(pass.name_start(name_start)) {
            return Ok(probe);
        }
        let name_end = self.name_end(pass.buf, name_start, &[]);
        if pass.is_open_end(name_end) {
            return Ok(Probe::Incomplete);
        }
        let tag = self.config.identify(&pass.buf[name_start..name_end]);
        self.flush_text(pass, lt)?;
        self.state = ScanState::StartTag { tag };
        pass.emit_tag(TokenKind::StartTagName, name_start, name_end, tag)?;
        Ok(Probe::Found(name_end))
    }

    /// Any other `<!` or `<?` up to the next `>`, as a comment.
    fn permissive_comment(
        &mut self,
        pass: &mut Pass<'_, '_>,
        lt: usize,
    ) -> Result<Probe, StructuralError> {
        if self.config.strict() {
            return Ok(Probe::NoMatch);
        }
        match pass.buf.as_bytes().get(lt + 1) {
            Some(b'!' | b'?') => {}
            Some(_) => return Ok(Probe::NoMatch),
            None if pass.is_final => return Ok(Probe::NoMatch),
            None => return Ok(Probe::Incomplete),
        }
        let body = lt + 2;
        let Some((close, after)) = pass.close(body, b">") else {
            return Ok(Probe::Incomplete);
        };
        self.flush_text(pass, lt)?;
        pass.emit(TokenKind::Comment, body, close)?;
        Ok(Probe::Found(after))
    }

    fn step_start_tag(
        &mut self,
        pass: &mut Pass<'_, '_>,
        pos: usize,
        tag: TagId,
    ) -> Result<Step, StructuralError> {
        let buf = pass.buf;
        let i = skip_space(buf.as_bytes(), pos);
        if i == buf.len() {
            return Ok(Step::Stop(i));
        }
        if self.config.self_closing_recognized() {
            match pass.prefix(i, b"/>") {
                MatchResult::Matched => {
                    self.state = ScanState::Text;
                    pass.emit_tag(TokenKind::StartTagSelfClosing, i, i + 2, tag)?;
                    return Ok(Step::Continue(i + 2));
                }
                MatchResult::NeedMoreInput => return Ok(Step::Stop(i)),
                MatchResult::NoMatch => {}
            }
        }
        if buf.as_bytes()[i] == b'>' {
            self.state = ScanState::Text;
            if self.config.is_raw_text(tag) {
                self.raw_text = Some(tag);
            }
            pass.emit_tag(TokenKind::StartTagClosing, i, i + 1, tag)?;
            return Ok(Step::Continue(i + 1));
        }
        match self.attribute(pass, i)? {
            Probe::Found(end) => Ok(Step::Continue(end)),
            Probe::Incomplete => Ok(Step::Stop(i)),
            Probe::NoMatch => {
                let skipped = buf[i..].chars().next().map_or(1, char::len_utf8);
                if self.config.strict() {
                    return Err(pass.error(
                        "expected attribute name, '>' or '/>'",
                        i,
                        i + skipped,
                    ));
                }
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(
                    target: "tagsoup.scanner",
                    "skipped malformed start tag byte(s) {:?} @{}",
                    &buf[i..i + skipped],
                    pass.base + i
                );
                Ok(Step::Continue(i + skipped))
            }
        }
    }

    fn attribute(&mut self, pass: &mut Pass<'_, '_>, at: usize) -> Result<Probe, StructuralError> {
        if pass.name_start(at) != MatchResult::Matched {
            return Ok(Probe::NoMatch);
        }
        let buf = pass.buf;
        let bytes = buf.as_bytes();
        let name_end = self.name_end(buf, at, &['=']);
        let eq = skip_space(bytes, name_end);
        if pass.is_open_end(eq) {
            return Ok(Probe::Incomplete);
        }
        if bytes.get(eq) != Some(&b'=') {
            if self.config.strict() {
                return Err(pass.error("expected '=' and a quoted value", at, name_end));
            }
            pass.emit(TokenKind::AttributeName, at, name_end)?;
            return Ok(Probe::Found(name_end));
        }
        let value_start = skip_space(bytes, eq + 1);
        if pass.is_open_end(value_start) {
            return Ok(Probe::Incomplete);
        }
        let (value, end) = match bytes.get(value_start) {
            Some(&quote @ (b'"' | b'\'')) => match memchr(quote, &bytes[value_start + 1..]) {
                Some(rel) => {
                    let close = value_start + 1 + rel;
                    ((value_start + 1, close), close + 1)
                }
                None if pass.is_final => ((value_start + 1, buf.len()), buf.len()),
                None => return Ok(Probe::Incomplete),
            },
            _ => {
                let value_end = bytes[value_start..]
                    .iter()
                    .position(|b| b.is_ascii_whitespace() || *b == b'>')
                    .map_or(buf.len(), |rel| value_start + rel);
                if pass.is_open_end(value_end) {
                    return Ok(Probe::Incomplete);
                }
                if self.config.strict() {
                    return Err(pass.error(
                        "expected quoted attribute value",
                        value_start,
                        value_end,
                    ));
                }
                ((value_start, value_end), value_end)
            }
        };
        pass.emit(TokenKind::AttributeName, at, name_end)?;
        pass.emit(TokenKind::AttributeValue, value.0, value.1)?;
        Ok(Probe::Found(end))
    }

    /// End of the name starting at `start`. `stops` adds lenient terminators.
    fn name_end(&self, buf: &str, start: usize, stops: &[char]) -> usize {
        let strict = self.config.strict();
        buf[start..]
            .char_indices()
            .find(|&(_, ch)| {
                if strict {
                    !chars::is_name_char(ch)
                } else {
                    !chars::is_lenient_name_char(ch) || stops.contains(&ch)
                }
            })
            .map_or(buf.len(), |(i, _)| start + i)
    }

    fn flush_text(&mut self, pass: &mut Pass<'_, '_>, end: usize) -> Result<(), StructuralError> {
        let Some(start) = pass.text_start.take() else {
            return Ok(());
        };
        if start == end {
            return Ok(());
        }
        if !pass.buf[start..end].trim_ascii().is_empty() {
            self.leave_prologue();
        }
        pass.emit(TokenKind::Text, start, end)
    }

    fn leave_prologue(&mut self) {
        if self.state == ScanState::Prologue {
            self.state = ScanState::Text;
        }
    }
}

fn initial_state(document: bool) -> ScanState {
    if document {
        ScanState::Prologue
    } else {
        ScanState::Text
    }
}

/// `None` when the prefix matched; otherwise the probe outcome it implies.
fn unmatched(result: MatchResult) -> Option<Probe> {
    match result {
        MatchResult::Matched => None,
        MatchResult::NeedMoreInput => Some(Probe::Incomplete),
        MatchResult::NoMatch => Some(Probe::NoMatch),
    }
}

fn trim_span(buf: &str, start: usize, end: usize) -> (usize, usize) {
    let body = &buf[start..end];
    let lead = body.len() - body.trim_ascii_start().len();
    let kept = body.trim_ascii().len();
    (start + lead, start + lead + kept)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    /// Recognized and emitted; scanning resumes at the offset.
    Found(usize),
    /// More input could change the outcome.
    Incomplete,
    NoMatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue(usize),
    Stop(usize),
}

/// One scan call over one buffer.
struct Pass<'a, 'o> {
    buf: &'a str,
    base: usize,
    is_final: bool,
    out: &'o mut dyn Downstream,
    text_start: Option<usize>,
}

impl Pass<'_, '_> {
    fn prefix(&self, at: usize, seq: &[u8]) -> MatchResult {
        match_ascii_prefix(self.buf.as_bytes(), at, seq, self.is_final)
    }

    fn prefix_ci(&self, at: usize, seq: &[u8]) -> MatchResult {
        match_ascii_prefix_ci(self.buf.as_bytes(), at, seq, self.is_final)
    }

    fn name_start(&self, at: usize) -> MatchResult {
        match self.buf[at..].chars().next() {
            Some(ch) if chars::is_name_start(ch) => MatchResult::Matched,
            Some(_) => MatchResult::NoMatch,
            None if self.is_final => MatchResult::NoMatch,
            None => MatchResult::NeedMoreInput,
        }
    }

    /// True when a run ending at `at` could still grow with more input.
    fn is_open_end(&self, at: usize) -> bool {
        !self.is_final && at == self.buf.len()
    }

    /// Locate `terminator` from `from`: `(body_end, resume_at)`. In final
    /// mode a missing terminator closes the construct at the buffer end.
    fn close(&self, from: usize, terminator: &[u8]) -> Option<(usize, usize)> {
        match find(self.buf.as_bytes(), from, terminator) {
            Some(at) => Some((at, at + terminator.len())),
            None if self.is_final => Some((self.buf.len(), self.buf.len())),
            None => None,
        }
    }

    fn pending_text(&self, lt: usize) -> &str {
        &self.buf[self.text_start.unwrap_or(lt)..lt]
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) -> Result<(), StructuralError> {
        self.out
            .accept(Token::scanned(kind, self.base + start, self.base + end))
    }

    fn emit_tag(
        &mut self,
        kind: TokenKind,
        start: usize,
        end: usize,
        tag: TagId,
    ) -> Result<(), StructuralError> {
        self.out
            .accept(Token::scanned_tag(kind, self.base + start, self.base + end, tag))
    }

    fn error(&self, message: &str, start: usize, end: usize) -> StructuralError {
        StructuralError::new(
            ErrorKind::MalformedConstruct,
            message,
            self.base + start,
            self.base + end,
        )
        .with_source(self.buf, self.base)
    }
}
