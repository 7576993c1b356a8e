//! Buffer probing helpers for resumable scanning.

use memchr::memmem;

/// Outcome of matching a fixed prefix at a buffer position.
///
/// `NeedMoreInput` is only reported in non-final mode, when the buffer ends
/// inside a still-matching prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MatchResult {
    Matched,
    NeedMoreInput,
    NoMatch,
}

pub(super) fn match_ascii_prefix(
    bytes: &[u8],
    at: usize,
    seq: &[u8],
    is_final: bool,
) -> MatchResult {
    match_prefix_by(bytes, at, seq, is_final, |a, b| a == b)
}

pub(super) fn match_ascii_prefix_ci(
    bytes: &[u8],
    at: usize,
    seq: &[u8],
    is_final: bool,
) -> MatchResult {
    match_prefix_by(bytes, at, seq, is_final, |a, b| a.eq_ignore_ascii_case(&b))
}

fn match_prefix_by(
    bytes: &[u8],
    at: usize,
    seq: &[u8],
    is_final: bool,
    eq: impl Fn(u8, u8) -> bool,
) -> MatchResult {
    let available = bytes.get(at..).unwrap_or_default();
    let n = available.len().min(seq.len());
    if !available[..n].iter().zip(&seq[..n]).all(|(&a, &b)| eq(a, b)) {
        return MatchResult::NoMatch;
    }
    if n == seq.len() {
        MatchResult::Matched
    } else if is_final {
        MatchResult::NoMatch
    } else {
        MatchResult::NeedMoreInput
    }
}

pub(super) fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(&bytes[from..], needle).map(|rel| from + rel)
}

pub(super) fn skip_space(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(bytes.len(), |rel| from + rel)
}
