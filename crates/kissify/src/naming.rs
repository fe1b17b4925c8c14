//! Identifier helpers: sanitizing arbitrary text into JavaScript identifiers
//! and generating collision-free names for synthesized bindings.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use swc_core::ecma::atoms::Atom;

use crate::scope::ScopeTable;

static LEADING_INVALID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-0-9]+").expect("valid leading-invalid regex"));

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+(.)?").expect("valid separator regex"));

const RESERVED_WORDS: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

// Synthesized names stay ASCII so they print unescaped for every target
fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_ascii_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    c == '$' || c == '_' || c.is_ascii_alphanumeric()
}

/// Whether `name` can be used as a binding identifier
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first)
        && chars.all(is_identifier_part)
        && !RESERVED_WORDS.contains(&name)
}

/// Whether `path` is a dotted member path such as `KISSY.add`
pub fn is_valid_member_path(path: &str) -> bool {
    let mut segments = path.split('.');
    // The root must be a binding name, later segments are property names
    segments.next().is_some_and(is_valid_identifier)
        && segments.all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(is_identifier_start)
                && segment.chars().all(is_identifier_part)
        })
}

/// Turn arbitrary text into an identifier
///
/// Invalid characters become separators, leading digits and separators are
/// dropped, and the character following a separator run is upper-cased:
/// `foo-bar.baz` becomes `fooBarBaz`.
pub fn to_identifier(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_identifier_part(c) { c } else { '-' })
        .collect();
    let trimmed = LEADING_INVALID.replace(&replaced, "");
    let camel = SEPARATOR_RUN.replace_all(&trimmed, |caps: &regex::Captures<'_>| {
        caps.get(1)
            .map(|next| next.as_str().to_uppercase())
            .unwrap_or_default()
    });

    let name = if is_valid_identifier(&camel) {
        camel.into_owned()
    } else {
        format!("_{camel}")
    };
    if name.is_empty() { "_".to_owned() } else { name }
}

/// Final path segment with its extension removed
///
/// Follows the usual basename/extname rules: trailing slashes are ignored and
/// a leading dot does not start an extension (`.eslintrc` keeps its name).
pub fn file_stem(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

/// Produces fresh binding names that collide with nothing in the program
#[derive(Debug)]
pub struct UidGenerator<'a> {
    scopes: &'a ScopeTable,
    taken: FxHashSet<String>,
}

impl<'a> UidGenerator<'a> {
    pub fn new(scopes: &'a ScopeTable) -> Self {
        Self {
            scopes,
            taken: FxHashSet::default(),
        }
    }

    /// Treat `names` as occupied even if the program never mentions them
    #[must_use]
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_taken(&self, candidate: &str) -> bool {
        self.taken.contains(candidate) || self.scopes.is_name_in_use(candidate)
    }

    /// Generate `_hint`, `_hint2`, `_hint3`, ... until one is free
    pub fn generate(&mut self, hint: &str) -> Atom {
        let identifier = to_identifier(hint);
        let base = identifier
            .trim_start_matches('_')
            .trim_end_matches(|c: char| c.is_ascii_digit());

        let mut suffix = 1u32;
        let candidate = loop {
            let candidate = if suffix > 1 {
                format!("_{base}{suffix}")
            } else {
                format!("_{base}")
            };
            if !self.is_taken(&candidate) {
                break candidate;
            }
            suffix += 1;
        };

        trace!("Generated binding name {candidate} for hint {hint:?}");
        self.taken.insert(candidate.clone());
        Atom::from(candidate)
    }
}
