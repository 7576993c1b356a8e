use tagsoup::{Token, TokenFmt};

pub struct TokenFormatContext<'a> {
    pub case_id: &'a str,
    pub mode: &'a str,
}

/// Format `tokens` against `source`, one line each.
///
/// Errors name the case, the run mode and the offending token index.
pub fn format_tokens(
    tokens: &[Token],
    source: &str,
    context: &TokenFormatContext<'_>,
) -> Result<Vec<String>, String> {
    let fmt = TokenFmt::new(source);
    let mut out = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let line = fmt.format_token(token).map_err(|err| {
            format!(
                "{err} for '{}' [{}] token #{}",
                context.case_id, context.mode, index
            )
        })?;
        out.push(line);
    }
    Ok(out)
}
