//! Integer identities for tag and attribute names.
//!
//! Every tag comparison downstream of the scanner (open-element stack, void /
//! raw-text membership, implicit close rules) is done on `TagId` values rather
//! than strings.
//!
//! Collision policy: two distinct names that hash to the same value are treated
//! as the same tag. This is never detected.

/// 32-bit name identifier produced by [`identify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub i32);

const SEED: i32 = 5381;

/// Hash `name` into a [`TagId`].
///
/// Rolling multiply-add (djb2 shape) over Unicode scalar values, wrapping in
/// signed 32 bits. With `case_insensitive`, only `A-Z` are folded; non-ASCII
/// letters keep their code point.
pub fn identify(name: &str, case_insensitive: bool) -> TagId {
    let mut hash = SEED;
    for ch in name.chars() {
        let ch = if case_insensitive {
            ch.to_ascii_lowercase()
        } else {
            ch
        };
        hash = hash.wrapping_mul(33).wrapping_add(ch as u32 as i32);
    }
    TagId(hash)
}
