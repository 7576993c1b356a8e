//! Token model shared by the scanner, normalizer and session.

use crate::ident::TagId;

/// Half-open byte span into the whole logical input.
///
/// Invariant: `start <= end`, and both offsets sit on UTF-8 boundaries of the
/// concatenated input. Synthesized boundaries are zero-width (`start == end`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }
}

/// Closed set of token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    StartTagName,
    StartTagClosing,
    StartTagSelfClosing,
    AttributeName,
    AttributeValue,
    EndTagName,
    Comment,
    ProcessingInstructionTarget,
    ProcessingInstructionData,
    CdataSection,
    DoctypeName,
}

impl TokenKind {
    /// Stable label used by token formatting and golden fixtures.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Text => "Text",
            TokenKind::StartTagName => "StartTagName",
            TokenKind::StartTagClosing => "StartTagClosing",
            TokenKind::StartTagSelfClosing => "StartTagSelfClosing",
            TokenKind::AttributeName => "AttributeName",
            TokenKind::AttributeValue => "AttributeValue",
            TokenKind::EndTagName => "EndTagName",
            TokenKind::Comment => "Comment",
            TokenKind::ProcessingInstructionTarget => "PiTarget",
            TokenKind::ProcessingInstructionData => "PiData",
            TokenKind::CdataSection => "Cdata",
            TokenKind::DoctypeName => "DoctypeName",
        }
    }
}

/// One classified unit of the input.
///
/// Tokens are plain values: the core never keeps a reference to a token after
/// handing it to a [`TokenSink`].
///
/// `tag` is set for start/end tag names and for the closing tokens of a start
/// tag, so nesting can be replayed without re-hashing names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub synthesized: bool,
    pub tag: Option<TagId>,
}

impl Token {
    pub(crate) fn scanned(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            synthesized: false,
            tag: None,
        }
    }

    pub(crate) fn scanned_tag(kind: TokenKind, start: usize, end: usize, tag: TagId) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
            synthesized: false,
            tag: Some(tag),
        }
    }

    pub(crate) fn synthesized(kind: TokenKind, span: Span, tag: TagId) -> Self {
        Self {
            kind,
            span,
            synthesized: true,
            tag: Some(tag),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Slice of `source` covered by this token, if the span is valid for it.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.span.start..self.span.end)
    }
}

/// Receiver for tokens, called once per token in output order.
pub trait TokenSink {
    fn push(&mut self, token: Token);
}

impl TokenSink for Vec<Token> {
    fn push(&mut self, token: Token) {
        Vec::push(self, token);
    }
}

impl<S: TokenSink + ?Sized> TokenSink for &mut S {
    fn push(&mut self, token: Token) {
        (**self).push(token);
    }
}

/// Adapter turning a closure into a [`TokenSink`].
pub struct FnSink<F>(pub F);

impl<F: FnMut(Token)> TokenSink for FnSink<F> {
    fn push(&mut self, token: Token) {
        (self.0)(token);
    }
}
