//! Recovery-oriented markup tokenizer.
//!
//! Raw HTML/XML-like text goes in; a well-nested, span-annotated token stream
//! comes out, however malformed the input. Input may arrive in arbitrary
//! chunks through [`ParseSession`].

pub mod config;
pub mod entities;
pub mod error;
pub mod ident;
pub mod normalizer;
pub mod scanner;
pub mod session;
pub mod token;
pub mod token_fmt;

pub use crate::config::{Config, ParseOptions, SessionOptions};
pub use crate::entities::{EntityDecoder, EntityTable, decode_entities};
pub use crate::error::{ErrorKind, StructuralError};
pub use crate::ident::{TagId, identify};
pub use crate::normalizer::Normalizer;
pub use crate::scanner::Scanner;
pub use crate::session::{ParseSession, SessionStats};
pub use crate::token::{FnSink, Span, Token, TokenKind, TokenSink};
pub use crate::token_fmt::{TokenFmt, TokenFmtError};

use std::sync::Arc;

/// Tokenize a whole document in one call, normalized.
pub fn tokenize(input: &str, config: &Arc<Config>) -> Result<Vec<Token>, StructuralError> {
    tokenize_with(input, config, SessionOptions::default())
}

pub fn tokenize_with(
    input: &str,
    config: &Arc<Config>,
    options: SessionOptions,
) -> Result<Vec<Token>, StructuralError> {
    let mut session = ParseSession::with_options(Arc::clone(config), options);
    let mut tokens = Vec::new();
    session.finish(input, &mut tokens)?;
    Ok(tokens)
}
