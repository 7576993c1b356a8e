//! Tag-order normalizer.
//!
//! Rewrites the scanner's raw token sequence into a well-nested one: every
//! start tag gets exactly one later matching end tag, nesting is strict LIFO,
//! and no end tag appears without an open match.
//!
//! Invariant: the open-element stack always equals the set of tags whose
//! start token has been delivered downstream and whose end token has not.
//!
//! Synthesized end tags are zero-width. In front of a start tag they sit on its
//! `<`, in front of an end tag on the `<` of `</`, after a void or self-closed
//! tag at the end of its `>`/`/>`, and at end of input on the input length.

mod stack;

use crate::config::Config;
use crate::error::{ErrorKind, StructuralError};
use crate::ident::TagId;
use crate::token::{Span, Token, TokenKind, TokenSink};
use stack::OpenElementStack;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Normalizer {
    config: Arc<Config>,
    stack: OpenElementStack,
    /// Start tag whose `>`/`/>` has not been seen yet.
    open_tag: Option<TagId>,
}

impl Normalizer {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            stack: OpenElementStack::default(),
            open_tag: None,
        }
    }

    /// Process one raw token, delivering zero or more tokens to `out`.
    ///
    /// Tag tokens without an identifier (never produced by the scanner) pass
    /// through untouched.
    pub fn push(&mut self, token: Token, out: &mut dyn TokenSink) -> Result<(), StructuralError> {
        let Some(tag) = token.tag else {
            out.push(token);
            return Ok(());
        };
        match token.kind {
            TokenKind::StartTagName => {
                self.close_implicitly(tag, token.start().saturating_sub(1), out);
                self.stack.push(tag);
                self.open_tag = Some(tag);
                out.push(token);
            }
            TokenKind::StartTagClosing => {
                out.push(token);
                if self.open_tag.take().is_some() && self.config.is_void(tag) {
                    self.close_current(tag, token.end(), out);
                }
            }
            TokenKind::StartTagSelfClosing => {
                out.push(token);
                if self.open_tag.take().is_some() {
                    self.close_current(tag, token.end(), out);
                }
            }
            TokenKind::EndTagName => self.end_tag(token, tag, out)?,
            _ => out.push(token),
        }
        Ok(())
    }

    /// End of input at absolute offset `end`: drain the stack.
    pub fn finish(&mut self, end: usize, out: &mut dyn TokenSink) -> Result<(), StructuralError> {
        self.open_tag = None;
        if !self.stack.is_empty() && !self.config.auto_close() {
            return Err(StructuralError::new(
                ErrorKind::UnclosedElements,
                format!("{} element(s) still open at end of input", self.stack.len()),
                end,
                end,
            ));
        }
        self.close_down_to(0, end, out);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.open_tag = None;
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Deepest nesting seen since construction.
    pub fn max_depth(&self) -> u32 {
        self.stack.max_depth()
    }

    /// Open elements, outermost first.
    pub fn open_elements(&self) -> impl Iterator<Item = TagId> + '_ {
        self.stack.iter()
    }

    fn end_tag(
        &mut self,
        token: Token,
        tag: TagId,
        out: &mut dyn TokenSink,
    ) -> Result<(), StructuralError> {
        // Offset of the `<` in `</name`.
        let tag_open = token.start().saturating_sub(2);
        match self.stack.rposition(tag) {
            Some(k) if k + 1 == self.stack.len() => {
                out.push(token);
                self.stack.pop();
            }
            Some(k) => {
                if !self.config.auto_close() {
                    return Err(StructuralError::new(
                        ErrorKind::BlockedEndTag,
                        format!("end tag blocked by {} open element(s)", self.stack.len() - k - 1),
                        tag_open,
                        token.end(),
                    ));
                }
                self.close_down_to(k + 1, tag_open, out);
                out.push(token);
                self.stack.pop();
            }
            None if self.config.is_implicitly_opened(tag) => {
                self.close_implicitly(tag, tag_open, out);
                out.push(Token::synthesized(TokenKind::StartTagName, token.span, tag));
                self.stack.push(tag);
                out.push(Token::synthesized(TokenKind::StartTagClosing, token.span, tag));
                out.push(token);
                self.stack.pop();
            }
            None if self.config.ignore_unbalanced_end() => {
                #[cfg(any(test, feature = "debug-stats"))]
                log::trace!(
                    target: "tagsoup.normalizer",
                    "dropped unbalanced end tag {:?} @{}",
                    tag,
                    token.start()
                );
            }
            None => {
                return Err(StructuralError::new(
                    ErrorKind::UnbalancedEndTag,
                    "end tag without a matching open element",
                    tag_open,
                    token.end(),
                ));
            }
        }
        Ok(())
    }

    /// Close the outermost open element `tag` implicitly closes, and all
    /// elements nested in it.
    fn close_implicitly(&mut self, tag: TagId, at: usize, out: &mut dyn TokenSink) {
        let found = match self.config.implicitly_closes(tag) {
            Some(closes) => self.stack.position(|open| closes.contains(&open)),
            None => None,
        };
        if let Some(k) = found {
            self.close_down_to(k, at, out);
        }
    }

    fn close_current(&mut self, tag: TagId, at: usize, out: &mut dyn TokenSink) {
        debug_assert_eq!(self.stack.current(), Some(tag), "closed tag must be on top");
        self.stack.pop();
        out.push(Token::synthesized(TokenKind::EndTagName, Span::at(at), tag));
    }

    /// Pop until `depth` elements remain, synthesizing end tags innermost first.
    fn close_down_to(&mut self, depth: usize, at: usize, out: &mut dyn TokenSink) {
        while self.stack.len() > depth {
            let Some(open) = self.stack.pop() else {
                break;
            };
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(target: "tagsoup.normalizer", "synthesized end tag {:?} @{}", open, at);
            out.push(Token::synthesized(TokenKind::EndTagName, Span::at(at), open));
        }
    }
}
