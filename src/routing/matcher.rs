//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile a path template with `{name}` placeholders into an anchored matcher
//! - Extract placeholder values from a concrete request path
//!
//! # Design Decisions
//! - A placeholder captures exactly one segment (`[^/]+`)
//! - Literal text is escaped, so `.`, `+`, `(` etc. match themselves
//! - Full-string match: no prefix or partial matches
//! - Captured values keep the order placeholders appear in the pattern

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// `{name}` where name is one or more word characters.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"));

const SEGMENT: &str = "([^/]+)";

/// Error compiling a path pattern.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("placeholder {{{0}}} declared more than once")]
    DuplicatePlaceholder(String),

    #[error("invalid path pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Names of every `{name}` token in `text`, in order of appearance.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER.find_iter(text).map(|m| {
        let token = m.as_str();
        &token[1..token.len() - 1]
    })
}

/// Placeholder values captured from a request path, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: String,
    regex: Regex,
    names: Vec<String>,
}

impl PathMatcher {
    /// Compile `pattern` into an anchored matcher.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(pattern.len() + 16);
        expr.push('^');

        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut last = 0;

        for token in PLACEHOLDER.find_iter(pattern) {
            expr.push_str(&regex::escape(&pattern[last..token.start()]));
            expr.push_str(SEGMENT);

            let name = &pattern[token.start() + 1..token.end() - 1];
            if !seen.insert(name) {
                return Err(PatternError::DuplicatePlaceholder(name.to_string()));
            }
            names.push(name.to_string());
            last = token.end();
        }
        expr.push_str(&regex::escape(&pattern[last..]));
        expr.push('$');

        Ok(Self {
            pattern: pattern.to_string(),
            regex: Regex::new(&expr)?,
            names,
        })
    }

    /// Match a concrete path, returning the captured placeholder values.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(caps.iter().skip(1))
                .map(|(name, value)| {
                    (name.clone(), value.map(|m| m.as_str()).unwrap_or_default().to_string())
                })
                .collect(),
        )
    }

    /// Placeholder names in declaration order.
    pub fn placeholders(&self) -> &[String] {
        &self.names
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
