//! Dialect configuration.
//!
//! [`ParseOptions`] is the string-keyed option set a caller (or a dialect file)
//! fills in; [`Config`] is the compiled, immutable form the scanner and
//! normalizer consult. A `Config` is built once and shared across parser
//! instances behind an `Arc`.

use crate::ident::{TagId, identify};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Recognized options, named after the dialect option surface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase", deny_unknown_fields)
)]
pub struct ParseOptions {
    pub void_tags: Vec<String>,
    pub raw_text_tags: Vec<String>,
    /// Tag -> tags it closes when it opens while one of them is open.
    pub implicitly_closed_tags: BTreeMap<String, Vec<String>>,
    /// Tags whose orphan end tag synthesizes a matching start tag.
    pub implicitly_opened_tags: Vec<String>,
    pub case_insensitive_tags: bool,
    pub self_closing_recognized: bool,
    pub unbalanced_start_tags_auto_close: bool,
    pub unbalanced_end_tags_ignored: bool,
    pub cdata_recognized: bool,
    pub processing_instructions_recognized: bool,
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            void_tags: Vec::new(),
            raw_text_tags: Vec::new(),
            implicitly_closed_tags: BTreeMap::new(),
            implicitly_opened_tags: Vec::new(),
            case_insensitive_tags: false,
            self_closing_recognized: true,
            unbalanced_start_tags_auto_close: true,
            unbalanced_end_tags_ignored: true,
            cdata_recognized: false,
            processing_instructions_recognized: false,
            strict: false,
        }
    }
}

/// Compiled configuration.
#[derive(Clone, Debug)]
pub struct Config {
    void_tags: HashSet<TagId>,
    raw_text_tags: HashSet<TagId>,
    implicitly_closed: HashMap<TagId, HashSet<TagId>>,
    implicitly_opened: HashSet<TagId>,
    case_insensitive: bool,
    self_closing: bool,
    auto_close: bool,
    ignore_unbalanced_end: bool,
    cdata: bool,
    processing_instructions: bool,
    strict: bool,
}

impl Config {
    pub fn new(options: &ParseOptions) -> Self {
        let fold = options.case_insensitive_tags;
        let mut implicitly_closed: HashMap<TagId, HashSet<TagId>> = HashMap::new();
        for (opener, closed) in &options.implicitly_closed_tags {
            // Keys that fold together under case-insensitivity merge their sets.
            implicitly_closed
                .entry(identify(opener, fold))
                .or_default()
                .extend(ids(closed, fold));
        }
        Self {
            void_tags: ids(&options.void_tags, fold),
            raw_text_tags: ids(&options.raw_text_tags, fold),
            implicitly_closed,
            implicitly_opened: ids(&options.implicitly_opened_tags, fold),
            case_insensitive: fold,
            self_closing: options.self_closing_recognized,
            auto_close: options.unbalanced_start_tags_auto_close,
            ignore_unbalanced_end: options.unbalanced_end_tags_ignored,
            cdata: options.cdata_recognized,
            processing_instructions: options.processing_instructions_recognized,
            strict: options.strict,
        }
    }

    /// Identify `name` under this dialect's case-folding rule.
    pub fn identify(&self, name: &str) -> TagId {
        identify(name, self.case_insensitive())
    }

    pub fn is_void(&self, tag: TagId) -> bool {
        self.void_tags.contains(&tag)
    }

    pub fn is_raw_text(&self, tag: TagId) -> bool {
        self.raw_text_tags.contains(&tag)
    }

    pub fn implicitly_closes(&self, tag: TagId) -> Option<&HashSet<TagId>> {
        self.implicitly_closed.get(&tag)
    }

    pub fn is_implicitly_opened(&self, tag: TagId) -> bool {
        self.implicitly_opened.contains(&tag)
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn self_closing_recognized(&self) -> bool {
        self.self_closing
    }

    pub fn auto_close(&self) -> bool {
        self.auto_close
    }

    pub fn ignore_unbalanced_end(&self) -> bool {
        self.ignore_unbalanced_end
    }

    pub fn cdata_recognized(&self) -> bool {
        self.cdata
    }

    pub fn processing_instructions_recognized(&self) -> bool {
        self.processing_instructions
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}

fn ids(names: &[String], fold: bool) -> HashSet<TagId> {
    names.iter().map(|name| identify(name, fold)).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::new(&ParseOptions::default())
    }
}

impl From<ParseOptions> for Config {
    fn from(options: ParseOptions) -> Self {
        Self::new(&options)
    }
}

impl From<&ParseOptions> for Config {
    fn from(options: &ParseOptions) -> Self {
        Self::new(options)
    }
}

/// Per-session switches that are not part of the dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Whole-document parse: enables the prologue state and DOCTYPE recognition.
    pub document: bool,
    /// Run the tag-order normalizer. `false` delivers raw scanner tokens.
    pub normalize: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            document: true,
            normalize: true,
        }
    }
}

impl SessionOptions {
    pub fn fragment() -> Self {
        Self {
            document: false,
            ..Self::default()
        }
    }

    pub fn raw() -> Self {
        Self {
            normalize: false,
            ..Self::default()
        }
    }
}
