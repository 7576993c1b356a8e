//! Character-reference decoding for raw text and attribute-value spans.
//!
//! Contract:
//! - Numeric references `&#NNN` / `&#xHHH` take the maximal digit run; a
//!   trailing `;` is consumed when present. `&#` with no digits is left as-is.
//! - NUL, surrogates and values above U+10FFFF decode to U+FFFD; 0x80..=0x9F
//!   are reinterpreted through the Windows-1252 table.
//! - Named references grow one ASCII alphanumeric at a time and stop at the
//!   first prefix found in the legacy (semicolon-optional) table. Only when no
//!   prefix matched and the run is followed by `;` is the whole run looked up
//!   in the terminated table. Legacy names are not prefix-free, so the first
//!   legacy hit wins: `&notin;` decodes as `¬in;`.
//! - Anything unrecognized is copied through unchanged.
//!
//! Tables are immutable and shared; decoders only borrow them.

mod table;

use memchr::{memchr, memrchr};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

const REPLACEMENT: char = '\u{FFFD}';
const OUT_OF_RANGE: u32 = 0x11_0000;

/// Named-reference lookup tables.
#[derive(Debug)]
pub struct EntityTable {
    legacy: HashMap<&'static str, &'static str>,
    terminated: HashMap<&'static str, &'static str>,
}

static HTML_TABLE: LazyLock<EntityTable> =
    LazyLock::new(|| EntityTable::from_entries(table::LEGACY, table::TERMINATED));

static XML_TABLE: LazyLock<EntityTable> =
    LazyLock::new(|| EntityTable::from_entries(&[], table::XML));

impl EntityTable {
    /// Build a table. Legacy entries also resolve in terminated form.
    pub fn from_entries(
        legacy: &'static [(&'static str, &'static str)],
        terminated: &'static [(&'static str, &'static str)],
    ) -> Self {
        let legacy: HashMap<_, _> = legacy.iter().copied().collect();
        let mut all = legacy.clone();
        all.extend(terminated.iter().copied());
        Self {
            legacy,
            terminated: all,
        }
    }

    /// HTML named references (legacy set plus common terminated names).
    pub fn html() -> &'static EntityTable {
        &HTML_TABLE
    }

    /// The five predefined XML entities; none resolve without `;`.
    pub fn xml() -> &'static EntityTable {
        &XML_TABLE
    }

    fn unterminated(&self, name: &str) -> Option<&'static str> {
        self.legacy.get(name).copied()
    }

    fn terminated(&self, name: &str) -> Option<&'static str> {
        self.terminated.get(name).copied()
    }
}

enum Resolved {
    Char(char),
    Text(&'static str),
}

impl Resolved {
    fn push_to(self, out: &mut String) {
        match self {
            Resolved::Char(ch) => out.push(ch),
            Resolved::Text(text) => out.push_str(text),
        }
    }
}

/// Reference decoder bound to a table.
///
/// `decode` works on complete strings. `push`/`finish` decode a string that
/// arrives in pieces: a trailing `&` followed only by `[#0-9A-Za-z]` is held
/// back until the next piece decides it, so the result never depends on where
/// the pieces were cut.
#[derive(Clone, Debug)]
pub struct EntityDecoder<'t> {
    table: &'t EntityTable,
    pending: String,
}

impl EntityDecoder<'static> {
    pub fn html() -> Self {
        Self::new(EntityTable::html())
    }

    pub fn xml() -> Self {
        Self::new(EntityTable::xml())
    }
}

impl<'t> EntityDecoder<'t> {
    pub fn new(table: &'t EntityTable) -> Self {
        Self {
            table,
            pending: String::new(),
        }
    }

    /// Decode every reference in `s`. Borrows when `s` contains no `&`.
    pub fn decode<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if memchr(b'&', s.as_bytes()).is_none() {
            return Cow::Borrowed(s);
        }
        let mut out = String::with_capacity(s.len());
        self.decode_into(s, &mut out);
        Cow::Owned(out)
    }

    /// Decode the next piece of a chunked string into `out`.
    pub fn push(&mut self, chunk: &str, out: &mut String) {
        self.pending.push_str(chunk);
        let held = self.pending.split_off(held_suffix_start(&self.pending));
        let ready = std::mem::replace(&mut self.pending, held);
        self.decode_into(&ready, out);
    }

    /// Flush whatever `push` held back.
    pub fn finish(&mut self, out: &mut String) {
        let rest = std::mem::take(&mut self.pending);
        self.decode_into(&rest, out);
    }

    fn decode_into(&self, s: &str, out: &mut String) {
        let bytes = s.as_bytes();
        let mut copy_start = 0;
        let mut i = 0;
        while let Some(rel) = memchr(b'&', &bytes[i..]) {
            let amp = i + rel;
            match self.reference_at(s, amp) {
                Some((resolved, end)) => {
                    // Flush bytes up to '&' unchanged (preserves UTF-8).
                    out.push_str(&s[copy_start..amp]);
                    resolved.push_to(out);
                    copy_start = end;
                    i = end;
                }
                None => i = amp + 1,
            }
        }
        out.push_str(&s[copy_start..]);
    }

    /// Resolve the reference whose `&` sits at `amp`, returning the
    /// replacement and the offset just past the consumed text.
    fn reference_at(&self, s: &str, amp: usize) -> Option<(Resolved, usize)> {
        let bytes = s.as_bytes();
        let mut i = amp + 1;
        match bytes.get(i) {
            Some(b'#') => {
                i += 1;
                let radix = if matches!(bytes.get(i), Some(b'x' | b'X')) {
                    i += 1;
                    16
                } else {
                    10
                };
                let digits_start = i;
                let mut code: u32 = 0;
                while let Some(digit) = bytes.get(i).and_then(|&b| (b as char).to_digit(radix)) {
                    code = code
                        .saturating_mul(radix)
                        .saturating_add(digit)
                        .min(OUT_OF_RANGE);
                    i += 1;
                }
                if i == digits_start {
                    return None;
                }
                if bytes.get(i) == Some(&b';') {
                    i += 1;
                }
                Some((Resolved::Char(numeric_char(code)), i))
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let name_start = i;
                while bytes.get(i).is_some_and(u8::is_ascii_alphanumeric) {
                    i += 1;
                    if let Some(text) = self.table.unterminated(&s[name_start..i]) {
                        let end = if bytes.get(i) == Some(&b';') { i + 1 } else { i };
                        return Some((Resolved::Text(text), end));
                    }
                }
                if bytes.get(i) != Some(&b';') {
                    return None;
                }
                let text = self.table.terminated(&s[name_start..i])?;
                Some((Resolved::Text(text), i + 1))
            }
            _ => None,
        }
    }
}

/// Decode with the HTML table.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    EntityDecoder::html().decode(s)
}

fn numeric_char(code: u32) -> char {
    match code {
        0 | 0xD800..=0xDFFF => REPLACEMENT,
        0x80..=0x9F => table::c1_override(code)
            .or_else(|| char::from_u32(code))
            .unwrap_or(REPLACEMENT),
        _ => char::from_u32(code).unwrap_or(REPLACEMENT),
    }
}

/// Start of a trailing `&[#0-9A-Za-z]*` run that more input could still
/// extend, or `s.len()` when nothing needs holding.
fn held_suffix_start(s: &str) -> usize {
    let bytes = s.as_bytes();
    match memrchr(b'&', bytes) {
        Some(amp)
            if bytes[amp + 1..]
                .iter()
                .all(|b| b.is_ascii_alphanumeric() || *b == b'#') =>
        {
            amp
        }
        _ => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_references_decode() {
        assert_eq!(decode_entities("&#60;"), "<");
        assert_eq!(decode_entities("&#x3c;"), "<");
        assert_eq!(decode_entities("&#X3C;"), "<");
        assert_eq!(decode_entities("&#215;"), "\u{00D7}");
        assert_eq!(decode_entities("&#xD7"), "\u{00D7}");
        assert_eq!(decode_entities("&#215 x"), "\u{00D7} x");
    }

    #[test]
    fn numeric_without_digits_is_left_alone() {
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#x;"), "&#x;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#-1;"), "&#-1;");
    }

    #[test]
    fn numeric_replacement_policy() {
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#55296;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x110000;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#99999999999999999999;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x10FFFF;"), "\u{10FFFF}");
        assert_eq!(decode_entities("&#1114111;"), "\u{10FFFF}");
    }

    #[test]
    fn c1_range_uses_windows_1252() {
        assert_eq!(decode_entities("&#x80;"), "\u{20AC}");
        assert_eq!(decode_entities("&#150;"), "\u{2013}");
        assert_eq!(decode_entities("&#x9F;"), "\u{0178}");
        assert_eq!(decode_entities("&#x81;"), "\u{0081}");
    }

    #[test]
    fn named_references_decode() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(decode_entities("&apos;x&apos;"), "'x'");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_entities("&hellip;&euro;"), "\u{2026}\u{20AC}");
    }

    #[test]
    fn legacy_names_match_without_semicolon() {
        assert_eq!(decode_entities("&ltfoo"), "<foo");
        assert_eq!(decode_entities("&amp"), "&");
        assert_eq!(decode_entities("loose &amp space"), "loose & space");
        assert_eq!(decode_entities("&copy2024"), "\u{00A9}2024");
    }

    #[test]
    fn first_legacy_prefix_wins() {
        assert_eq!(decode_entities("&notin;"), "\u{00AC}in;");
        assert_eq!(decode_entities("&ampersand;"), "&ersand;");
    }

    #[test]
    fn terminated_names_need_semicolon() {
        assert_eq!(decode_entities("&hellip"), "&hellip");
        assert_eq!(decode_entities("&sup;"), "\u{2283}");
        assert_eq!(decode_entities("&sup1"), "\u{00B9}");
        assert_eq!(decode_entities("&ge;"), "\u{2265}");
    }

    #[test]
    fn unknown_references_pass_through() {
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(
            decode_entities("before &notanentity after"),
            "before \u{00AC}anentity after"
        );
        assert_eq!(decode_entities("&;"), "&;");
        assert_eq!(decode_entities("& b"), "& b");
        assert_eq!(decode_entities("&&amp;"), "&&");
    }

    #[test]
    fn xml_table_has_no_legacy_forms() {
        let xml = EntityDecoder::xml();
        assert_eq!(xml.decode("&lt;&amp;&apos;"), "<&'");
        assert_eq!(xml.decode("&lt &nbsp;"), "&lt &nbsp;");
    }

    #[test]
    fn decode_preserves_utf8() {
        assert_eq!(decode_entities("120\u{00D7}32"), "120\u{00D7}32");
        assert_eq!(decode_entities("\u{03C0} &amp; \u{03C3}"), "\u{03C0} & \u{03C3}");
    }

    #[test]
    fn no_ampersand_borrows_and_is_idempotent() {
        for s in ["", "plain text", "\u{03C0}\u{03C3}", "<a href=x>"] {
            let once = decode_entities(s);
            assert!(matches!(once, Cow::Borrowed(_)));
            assert_eq!(decode_entities(&once), once);
        }
    }

    #[test]
    fn chunked_decoding_matches_whole_decoding() {
        let samples = [
            "a &amp; b &lt;c&gt; &#x3c;&#60 &ltfoo &unknown; &hellip; end",
            "&#1234567890123;&#x;&&&",
            "\u{00E9}&eacute\u{00E9}&sup;&sup2&",
        ];
        for s in samples {
            let whole = decode_entities(s).into_owned();
            for cut in 0..=s.len() {
                if !s.is_char_boundary(cut) {
                    continue;
                }
                let mut decoder = EntityDecoder::html();
                let mut out = String::new();
                decoder.push(&s[..cut], &mut out);
                decoder.push(&s[cut..], &mut out);
                decoder.finish(&mut out);
                assert_eq!(out, whole, "split at {cut} of {s:?}");
            }
            let mut decoder = EntityDecoder::html();
            let mut out = String::new();
            for ch in s.chars() {
                decoder.push(ch.encode_utf8(&mut [0; 4]), &mut out);
            }
            decoder.finish(&mut out);
            assert_eq!(out, whole, "char-by-char for {s:?}");
        }
    }

    #[test]
    fn held_suffix_only_covers_open_references() {
        assert_eq!(held_suffix_start("abc &lt"), 4);
        assert_eq!(held_suffix_start("abc &#x1"), 4);
        assert_eq!(held_suffix_start("abc &lt;"), 8);
        assert_eq!(held_suffix_start("abc"), 3);
        assert_eq!(held_suffix_start("a&"), 1);
    }
}
