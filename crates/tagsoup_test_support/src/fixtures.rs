//! Golden fixture loading.
//!
//! A fixture is a directory `<root>/<case>/` holding `input.html`,
//! `tokens.txt` and an optional `options.toml`. `tokens.txt` carries `#` headers
//! (`format`, `status`, `reason`) followed by one formatted token per line; a
//! run that fails ends with `Error <Kind> start..end`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tagsoup::{ParseOptions, SessionOptions};

pub const TOKEN_FORMAT: &str = "tagsoup-token-v1";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FixtureStatus {
    Active,
    Xfail,
    Skip,
}

#[derive(Clone, Debug)]
pub struct ExpectedTokens {
    pub status: FixtureStatus,
    pub reason: Option<String>,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub name: String,
    pub dir: PathBuf,
    pub input: String,
    pub options: FixtureOptions,
    pub expected: ExpectedTokens,
}

/// `options.toml`: session switches at the top level, dialect under `[dialect]`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureOptions {
    pub document: Option<bool>,
    pub normalize: Option<bool>,
    pub dialect: ParseOptions,
}

impl FixtureOptions {
    pub fn session(&self) -> SessionOptions {
        let defaults = SessionOptions::default();
        SessionOptions {
            document: self.document.unwrap_or(defaults.document),
            normalize: self.normalize.unwrap_or(defaults.normalize),
        }
    }
}

pub fn load_fixtures(root: &Path) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut fixtures = Vec::new();
    for entry in entries {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let input_path = path.join("input.html");
        let input = fs::read_to_string(&input_path)
            .unwrap_or_else(|err| panic!("failed to read input {input_path:?}: {err}"));
        let options = load_options(&path.join("options.toml"));
        let expected = parse_tokens_file(&path.join("tokens.txt"));
        fixtures.push(Fixture {
            name,
            dir: path,
            input,
            options,
            expected,
        });
    }
    fixtures
}

fn load_options(path: &Path) -> FixtureOptions {
    if !path.exists() {
        return FixtureOptions::default();
    }
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read options {path:?}: {err}"));
    toml::from_str(&content).unwrap_or_else(|err| panic!("invalid options {path:?}: {err}"))
}

pub fn parse_tokens_file(path: &Path) -> ExpectedTokens {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read tokens file {path:?}: {err}"));
    parse_tokens(&content).unwrap_or_else(|err| panic!("{err} in {path:?}"))
}

pub fn parse_tokens(content: &str) -> Result<ExpectedTokens, String> {
    let mut lines = Vec::new();
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(stripped) = line.strip_prefix('#') {
            let header = stripped.trim();
            if header.is_empty() {
                continue;
            }
            let (key, value) = header
                .split_once(':')
                .ok_or_else(|| format!("invalid header '{line}'"))?;
            let key = key.trim().to_ascii_lowercase();
            if headers.insert(key.clone(), value.trim().to_string()).is_some() {
                return Err(format!("duplicate header '{key}'"));
            }
        } else {
            lines.push(line.to_string());
        }
    }

    match headers.get("format") {
        Some(format) if format == TOKEN_FORMAT => {}
        Some(other) => return Err(format!("unsupported format '{other}'")),
        None => return Err("missing format header".to_string()),
    }
    let status = match headers.get("status").map(String::as_str) {
        Some("active") | None => FixtureStatus::Active,
        Some("xfail") => FixtureStatus::Xfail,
        Some("skip") => FixtureStatus::Skip,
        Some(other) => return Err(format!("unsupported status '{other}'")),
    };
    let reason = headers.get("reason").cloned();
    if status != FixtureStatus::Active && reason.as_deref().unwrap_or("").is_empty() {
        return Err("non-active fixture missing reason".to_string());
    }
    Ok(ExpectedTokens {
        status,
        reason,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_and_lines_are_split() {
        let parsed = parse_tokens(
            "# format: tagsoup-token-v1\n# status: xfail\n# reason: pending\n\nText 0..1 \"a\"\n",
        )
        .expect("valid tokens file");
        assert_eq!(parsed.status, FixtureStatus::Xfail);
        assert_eq!(parsed.reason.as_deref(), Some("pending"));
        assert_eq!(parsed.lines, vec!["Text 0..1 \"a\"".to_string()]);
    }

    #[test]
    fn format_header_is_required() {
        assert!(parse_tokens("Text 0..1 \"a\"\n").is_err());
        assert!(parse_tokens("# format: other\n").is_err());
        assert!(parse_tokens("# format: tagsoup-token-v1\n# status: skip\n").is_err());
    }

    #[test]
    fn options_split_session_and_dialect() {
        let options: FixtureOptions = toml::from_str(
            "normalize = false\n[dialect]\nvoidTags = [\"br\"]\ncaseInsensitiveTags = true\n",
        )
        .expect("valid options");
        let session = options.session();
        assert!(session.document);
        assert!(!session.normalize);
        assert_eq!(options.dialect.void_tags, vec!["br".to_string()]);
        assert!(options.dialect.case_insensitive_tags);
        assert!(options.dialect.unbalanced_end_tags_ignored);
    }
}
