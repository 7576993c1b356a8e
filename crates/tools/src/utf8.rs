//! Incremental UTF-8 decoding for streaming byte sources.
//!
//! Multi-byte sequences split across chunks are held back until the next
//! chunk completes them; invalid sequences become U+FFFD (one per maximal
//! invalid subpart, as `String::from_utf8_lossy` does) and decoding goes on.

const REPLACEMENT: char = '\u{FFFD}';

/// Carries an incomplete UTF-8 suffix (at most 3 bytes) between chunks.
#[derive(Clone, Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back from previous chunks.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Decode `bytes`, appending the text to `out`.
    pub fn decode(&mut self, bytes: &[u8], out: &mut String) {
        let mut rest = bytes;
        // Complete the carried sequence one byte at a time; it needs <= 3 more.
        while !self.pending.is_empty() {
            let Some((&byte, tail)) = rest.split_first() else {
                return;
            };
            rest = tail;
            self.pending.push(byte);
            match std::str::from_utf8(&self.pending) {
                Ok(ch) => {
                    out.push_str(ch);
                    self.pending.clear();
                }
                Err(err) if err.error_len().is_some() => {
                    let held = std::mem::take(&mut self.pending);
                    self.decode_complete(&held, out);
                }
                Err(_) => {}
            }
        }
        self.decode_complete(rest, out);
    }

    /// Flush a dangling incomplete sequence as U+FFFD, so the stream is never
    /// silently truncated.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            out.push(REPLACEMENT);
            self.pending.clear();
        }
    }

    fn decode_complete(&mut self, bytes: &[u8], out: &mut String) {
        let mut chunks = bytes.utf8_chunks().peekable();
        while let Some(chunk) = chunks.next() {
            out.push_str(chunk.valid());
            let invalid = chunk.invalid();
            if invalid.is_empty() {
                continue;
            }
            if chunks.peek().is_none() && is_truncated(invalid) {
                self.pending.extend_from_slice(invalid);
            } else {
                out.push(REPLACEMENT);
            }
        }
    }
}

fn is_truncated(seq: &[u8]) -> bool {
    matches!(std::str::from_utf8(seq), Err(err) if err.error_len().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> String {
        let mut carry = Utf8Carry::new();
        let mut text = String::new();
        for chunk in chunks {
            carry.decode(chunk, &mut text);
        }
        carry.finish(&mut text);
        text
    }

    #[test]
    fn split_multibyte_across_chunks() {
        let mut carry = Utf8Carry::new();
        let mut text = String::new();

        carry.decode(&[0xC3], &mut text);
        assert_eq!(text, "");
        assert_eq!(carry.pending(), &[0xC3]);

        carry.decode(&[0x97], &mut text);
        assert_eq!(text, "\u{00D7}");
        assert!(carry.is_empty());
    }

    #[test]
    fn resolves_carry_and_decodes_remaining_bytes() {
        let mut carry = Utf8Carry::new();
        let mut text = String::new();

        // First two bytes of U+1F600 (F0 9F 98 80).
        carry.decode(&[0xF0, 0x9F], &mut text);
        assert_eq!(carry.pending(), &[0xF0, 0x9F]);

        carry.decode(&[0x98, 0x80, b'!'], &mut text);
        assert_eq!(text, "\u{1F600}!");
        assert!(carry.is_empty());
    }

    #[test]
    fn carry_is_recreated_from_trailing_incomplete_sequence() {
        let mut carry = Utf8Carry::new();
        let mut text = String::new();

        carry.decode(&[0xE2], &mut text);
        carry.decode(&[0x82, 0xAC, 0xE2], &mut text);
        assert_eq!(text, "\u{20AC}");
        assert_eq!(carry.pending(), &[0xE2]);
    }

    #[test]
    fn invalid_bytes_make_progress() {
        assert_eq!(decode_all(&[&[0xFF, b'f']]), "\u{FFFD}f");
        // A carried lead byte followed by a non-continuation byte.
        assert_eq!(decode_all(&[&[b'a', 0xE2], &[b'b']]), "a\u{FFFD}b");
        assert_eq!(decode_all(&[&[0xE2], &[0xF0], &[0x9F, 0x98, 0x80]]), "\u{FFFD}\u{1F600}");
    }

    #[test]
    fn incomplete_suffix_is_flushed() {
        let mut carry = Utf8Carry::new();
        let mut text = String::new();

        carry.decode(&[0xE2, 0x82], &mut text);
        assert_eq!(text, "");
        carry.finish(&mut text);
        assert_eq!(text, "\u{FFFD}");
        assert!(carry.is_empty());
    }

    #[test]
    fn every_byte_partition_matches_lossy_decoding() {
        let bytes = "a\u{00E9}\u{20AC}\u{1F600}z".as_bytes();
        let mut with_invalid = bytes.to_vec();
        with_invalid.insert(3, 0xFF);
        for input in [bytes, with_invalid.as_slice()] {
            let expected = String::from_utf8_lossy(input).into_owned();
            for cut in 0..=input.len() {
                assert_eq!(
                    decode_all(&[&input[..cut], &input[cut..]]),
                    expected,
                    "split at {cut}"
                );
            }
        }
    }
}
