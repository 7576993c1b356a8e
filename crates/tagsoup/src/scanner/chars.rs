//! Name character classes.

/// XML `NameStartChar`: ASCII letters, `_`, `:` and the non-ASCII letter ranges.
pub(crate) fn is_name_start(ch: char) -> bool {
    matches!(
        ch,
        'A'..='Z'
            | 'a'..='z'
            | '_'
            | ':'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

/// XML `NameChar`, used for continuation characters in strict mode.
pub(crate) fn is_name_char(ch: char) -> bool {
    is_name_start(ch)
        || matches!(
            ch,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Lenient continuation: anything but whitespace, `/` and `>`.
pub(crate) fn is_lenient_name_char(ch: char) -> bool {
    !(ch.is_ascii_whitespace() || ch == '/' || ch == '>')
}
