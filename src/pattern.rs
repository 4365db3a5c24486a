//! Compiled URI patterns with priority ordering
//!
//! A [`UriPattern`] wraps the regex produced by [`parse_template`] and always
//! accepts an arbitrary trailing path after the template. The text left over
//! after the template is reported as the last value of every
//! [`MatchResult`], which is how a caller tells "this resource handles the
//! request" apart from "hand the rest of the path to a sub-resource".
//!
//! Patterns are ordered from most to least specific:
//! - more literal characters first
//! - then fewer template variables first
//! - then by regex string, so the order is total

use crate::error::{Result, RoutingError};
use crate::template::parse_template;
use crate::{debug_log, trace_log};
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Appended to every pattern so that deeper paths still match
pub const URI_PATTERN_TAIL: &str = "(/.*)?";

/// A compiled, immutable URI template
///
/// Equality and hashing consider only the generated regex, so `/a`, `a`
/// and `/a/` are the same pattern.
///
/// # Example
///
/// ```
/// use uri_dispatch::UriPattern;
///
/// let pattern = UriPattern::new("/users/{id}").unwrap();
///
/// let result = pattern.matches("/users/42").unwrap();
/// assert_eq!(result.get(0), Some("42"));
/// assert_eq!(result.remainder(), None);
///
/// let result = pattern.matches("/users/42/posts").unwrap();
/// assert_eq!(result.remainder(), Some("/posts"));
///
/// assert!(pattern.matches("/groups/42").is_none());
/// ```
#[derive(Clone)]
pub struct UriPattern {
    template: String,
    regex: String,
    pattern: Regex,
    parameter_names: Vec<String>,
    literal_char_count: usize,
    group_indexes: Option<Vec<usize>>,
}

impl UriPattern {
    /// Compile a URI template
    ///
    /// A missing leading `/` is added. A trailing `/` does not affect
    /// matching.
    pub fn new(template: &str) -> Result<Self> {
        let template: Cow<'_, str> = if !template.is_empty() && !template.starts_with('/') {
            Cow::Owned(format!("/{}", template))
        } else {
            Cow::Borrowed(template)
        };

        let parsed = parse_template(&template)?;

        let mut core = parsed.regex();
        let mut literal_char_count = parsed.literal_char_count();
        if let Some(stripped) = core.strip_suffix('/') {
            core = stripped;
            literal_char_count = literal_char_count.saturating_sub(1);
        }

        let regex = format!("{}{}", core, URI_PATTERN_TAIL);
        let pattern = Regex::new(&format!("^(?:{})$", regex)).map_err(|source| {
            RoutingError::InvalidPattern {
                regex: regex.clone(),
                source,
            }
        })?;

        debug_log!(
            "Compiled URI pattern '{}' -> '{}' ({} variables)",
            template,
            regex,
            parsed.variable_names().len()
        );

        Ok(Self {
            template: parsed.normalized_template().to_string(),
            regex,
            pattern,
            parameter_names: parsed.variable_names().to_vec(),
            literal_char_count,
            group_indexes: parsed.group_indexes().map(<[usize]>::to_vec),
        })
    }

    /// Normalized template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Generated regex including the trailing-path suffix
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Template variable names in declaration order
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Literal characters in the template, not counting a trailing `/`
    pub fn literal_char_count(&self) -> usize {
        self.literal_char_count
    }

    /// Check whether this is the pattern of an empty or `/` template
    pub fn is_root(&self) -> bool {
        self.regex == URI_PATTERN_TAIL
    }

    /// Match a path against this pattern
    ///
    /// On success the result holds one value per template variable
    /// followed by the unmatched tail of the path. The empty path only
    /// matches the root pattern.
    pub fn matches(&self, path: &str) -> Option<MatchResult> {
        if path.is_empty() {
            return self.is_root().then(|| MatchResult::new(vec![None]));
        }

        let Some(captures) = self.pattern.captures(path) else {
            trace_log!("Path '{}' does not match '{}'", path, self.regex);
            return None;
        };

        let group = |i: usize| captures.get(i).map(|m| m.as_str().to_string());
        let values = match &self.group_indexes {
            Some(indexes) => indexes.iter().map(|&i| group(i)).collect(),
            None => (1..captures.len()).map(group).collect(),
        };

        Some(MatchResult::new(values))
    }

    /// Match a path, writing the values into `values`
    ///
    /// `values` is cleared first and stays empty when the path does not
    /// match.
    pub fn match_into(&self, path: &str, values: &mut Vec<Option<String>>) -> bool {
        values.clear();
        match self.matches(path) {
            Some(result) => {
                values.extend(result.into_values());
                true
            }
            None => false,
        }
    }

    /// Check whether a path matches without extracting values
    pub fn is_match(&self, path: &str) -> bool {
        if path.is_empty() {
            return self.is_root();
        }
        self.pattern.is_match(path)
    }
}

impl fmt::Debug for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriPattern")
            .field("template", &self.template)
            .field("regex", &self.regex)
            .field("parameter_names", &self.parameter_names)
            .field("literal_char_count", &self.literal_char_count)
            .finish()
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.regex)
    }
}

impl PartialEq for UriPattern {
    fn eq(&self, other: &Self) -> bool {
        self.regex == other.regex
    }
}

impl Eq for UriPattern {}

impl Hash for UriPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.regex.hash(state);
    }
}

impl PartialOrd for UriPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UriPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_patterns(self, other)
    }
}

/// Order two patterns from most to least specific
///
/// # Example
///
/// ```
/// use uri_dispatch::{compare_patterns, UriPattern};
///
/// let literal = UriPattern::new("/a/b").unwrap();
/// let variable = UriPattern::new("/a/{b}").unwrap();
/// assert!(compare_patterns(&literal, &variable).is_lt());
/// ```
pub fn compare_patterns(a: &UriPattern, b: &UriPattern) -> Ordering {
    if a.regex == b.regex {
        return Ordering::Equal;
    }
    b.literal_char_count
        .cmp(&a.literal_char_count)
        .then_with(|| a.parameter_names.len().cmp(&b.parameter_names.len()))
        .then_with(|| a.regex.cmp(&b.regex))
}

// ============================================================================
// Match Result
// ============================================================================

/// Values captured by a successful match
///
/// Always holds one entry per template variable plus a final entry with
/// the rest of the path: `None` when nothing was left, otherwise a string
/// starting with `/` (or empty when a variable's own regex consumed the
/// final separator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    values: Vec<Option<String>>,
}

impl MatchResult {
    fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// All values, including the trailing remainder
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Values of the template variables only
    pub fn variable_values(&self) -> &[Option<String>] {
        self.values.split_last().map_or(&[], |(_, rest)| rest)
    }

    /// Value at `index`, `None` if absent or out of range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }

    /// Unmatched tail of the path
    pub fn remainder(&self) -> Option<&str> {
        self.values.last().and_then(|v| v.as_deref())
    }

    /// Check whether the pattern consumed the whole path
    ///
    /// A remainder of exactly `/` counts as consumed.
    pub fn is_full_match(&self) -> bool {
        matches!(self.remainder(), None | Some("/"))
    }

    /// Number of values, always variables + 1
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take ownership of the values
    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}
