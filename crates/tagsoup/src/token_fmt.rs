//! Deterministic token formatting for golden tests.
//!
//! One line per token: `Kind[*] start..end "text"`, where `*` marks a
//! synthesized token and `text` is the escaped source slice.

use crate::token::{Span, Token};
use std::fmt::Write;

#[derive(Debug)]
pub enum TokenFmtError {
    InvalidSpan { span: Span },
}

impl std::fmt::Display for TokenFmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFmtError::InvalidSpan { span } => {
                write!(f, "invalid span: {}..{}", span.start, span.end)
            }
        }
    }
}

impl std::error::Error for TokenFmtError {}

/// Formatter bound to the whole logical input the token spans point into.
pub struct TokenFmt<'a> {
    source: &'a str,
}

impl<'a> TokenFmt<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn format_token(&self, token: &Token) -> Result<String, TokenFmtError> {
        let text = token
            .text(self.source)
            .ok_or(TokenFmtError::InvalidSpan { span: token.span })?;
        Ok(format!(
            "{}{} {}..{} \"{}\"",
            token.kind.label(),
            if token.synthesized { "*" } else { "" },
            token.start(),
            token.end(),
            escape_text(text)
        ))
    }

    pub fn format_tokens(&self, tokens: &[Token]) -> Result<Vec<String>, TokenFmtError> {
        tokens.iter().map(|token| self.format_token(token)).collect()
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{TokenFmt, TokenFmtError, escape_text};
    use crate::ident::identify;
    use crate::token::{Span, Token, TokenKind};

    #[test]
    fn formats_scanned_and_synthesized_tokens() {
        let source = "<p>a\n\"b\"";
        let fmt = TokenFmt::new(source);
        let text = Token::scanned(TokenKind::Text, 3, 9);
        assert_eq!(
            fmt.format_token(&text).expect("valid span"),
            r#"Text 3..9 "a\n\"b\"""#
        );
        let end = Token::synthesized(TokenKind::EndTagName, Span::at(9), identify("p", false));
        assert_eq!(
            fmt.format_token(&end).expect("valid span"),
            r#"EndTagName* 9..9 """#
        );
    }

    #[test]
    fn out_of_range_span_is_an_error() {
        let fmt = TokenFmt::new("ab");
        let err = fmt
            .format_token(&Token::scanned(TokenKind::Text, 1, 5))
            .expect_err("span past end");
        assert!(matches!(err, TokenFmtError::InvalidSpan { span } if span == Span::new(1, 5)));
        assert_eq!(err.to_string(), "invalid span: 1..5");
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(escape_text("a\u{1}\u{7f}\\"), "a\\u{01}\\u{7F}\\\\");
    }
}
