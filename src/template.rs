//! URI template parsing
//!
//! Turns a template such as `/users/{id:\d+}/posts/{slug}` into the
//! regular expression used for matching, plus the metadata needed to rank
//! patterns and to pull variable values out of a match.
//!
//! Template syntax:
//! - Literal text is percent-encoded for the path component, then every
//!   regex metacharacter in it is escaped.
//! - `{name}` captures one path segment (`[^/]+?`).
//! - `{name:regex}` captures whatever `regex` matches. The fragment may
//!   contain its own groups; it may not contain `{` or `}`.
//! - Whitespace around the name and the fragment is ignored.

use crate::encoding::recognize_encode_path;
use crate::error::{Result, RoutingError};
use regex::Regex;

const BRACES: &[char] = &['{', '}'];

/// Regex used for a variable declared without one
pub const DEFAULT_VARIABLE_REGEX: &str = "[^/]+?";

/// Result of parsing a URI template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    regex: String,
    normalized_template: String,
    variable_names: Vec<String>,
    literal_char_count: usize,
    group_indexes: Option<Vec<usize>>,
}

impl ParsedTemplate {
    /// Regular expression built from the template, without anchors and
    /// without the open trailing-path suffix
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Template with encoded literals and whitespace removed from variables
    ///
    /// Variables appear as `{name}` or `{name:regex}`, so parsing the
    /// normalized template again yields the same regex.
    pub fn normalized_template(&self) -> &str {
        &self.normalized_template
    }

    /// Variable names in declaration order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Number of characters outside variables, counted after
    /// percent-encoding
    pub fn literal_char_count(&self) -> usize {
        self.literal_char_count
    }

    /// Capture group index of each variable, followed by the index of the
    /// first group after the last variable.
    ///
    /// `None` when the indexes are simply `1..=N+1`, i.e. no variable
    /// regex contains groups of its own.
    pub fn group_indexes(&self) -> Option<&[usize]> {
        self.group_indexes.as_deref()
    }
}

/// Parse a URI template
///
/// # Example
///
/// ```
/// use uri_dispatch::parse_template;
///
/// let parsed = parse_template("/a/{x}/b/{y:\\d+}").unwrap();
/// assert_eq!(parsed.regex(), "/a/([^/]+?)/b/(\\d+)");
/// assert_eq!(parsed.variable_names(), ["x", "y"]);
/// assert_eq!(parsed.literal_char_count(), 6);
///
/// assert!(parse_template("/a/{x}/{x}").is_err());
/// ```
pub fn parse_template(template: &str) -> Result<ParsedTemplate> {
    let mut state = ParseState::new(template);
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find(BRACES) {
        let open = cursor + offset;
        if template.as_bytes()[open] == b'}' {
            return Err(state.malformed("unmatched '}'"));
        }
        state.push_literal(&template[cursor..open]);

        let body_start = open + 1;
        let close = match template[body_start..].find(BRACES) {
            Some(o) if template.as_bytes()[body_start + o] == b'}' => body_start + o,
            Some(_) => return Err(state.malformed("'{' inside a template variable")),
            None => return Err(state.malformed("unclosed '{'")),
        };
        state.push_variable(&template[body_start..close])?;
        cursor = close + 1;
    }
    state.push_literal(&template[cursor..]);

    Ok(state.finish())
}

/// Accumulator for a single left-to-right scan of a template
struct ParseState<'a> {
    template: &'a str,
    regex: String,
    normalized: String,
    names: Vec<String>,
    literal_char_count: usize,
    /// Capture groups inside each variable's own regex
    group_counts: Vec<usize>,
}

impl<'a> ParseState<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            template,
            regex: String::with_capacity(template.len() * 2),
            normalized: String::with_capacity(template.len()),
            names: Vec::new(),
            literal_char_count: 0,
            group_counts: Vec::new(),
        }
    }

    fn malformed(&self, reason: &str) -> RoutingError {
        RoutingError::MalformedTemplate {
            template: self.template.to_string(),
            reason: reason.to_string(),
        }
    }

    fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Counted after encoding so that equal regexes have equal counts
        let encoded = recognize_encode_path(text);
        self.literal_char_count += encoded.chars().count();

        self.regex.push_str(&regex::escape(&encoded));
        self.normalized.push_str(&encoded);
    }

    fn push_variable(&mut self, body: &str) -> Result<()> {
        let (name_part, regex_part) = match body.split_once(':') {
            Some((name, regex)) => (name, Some(regex)),
            None => (body, None),
        };

        let name = name_part.trim();
        if name.is_empty() {
            return Err(self.malformed("empty variable name"));
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(RoutingError::InvalidVariableName {
                template: self.template.to_string(),
                name: name.to_string(),
            });
        }
        // TODO: allow a repeated name when both occurrences declare the same regex
        if self.names.iter().any(|n| n == name) {
            return Err(RoutingError::DuplicateVariable {
                template: self.template.to_string(),
                name: name.to_string(),
            });
        }

        let custom = regex_part.map(str::trim).filter(|r| !r.is_empty());
        let fragment = custom.unwrap_or(DEFAULT_VARIABLE_REGEX);

        let compiled = Regex::new(fragment).map_err(|source| RoutingError::InvalidRegex {
            name: name.to_string(),
            source,
        })?;
        // captures_len() includes the implicit whole-match group
        self.group_counts.push(compiled.captures_len() - 1);

        self.normalized.push('{');
        self.normalized.push_str(name);
        if let Some(regex) = custom {
            self.normalized.push(':');
            self.normalized.push_str(regex);
        }
        self.normalized.push('}');

        self.regex.push('(');
        self.regex.push_str(fragment);
        self.regex.push(')');

        self.names.push(name.to_string());
        Ok(())
    }

    fn finish(self) -> ParsedTemplate {
        let group_indexes = compute_group_indexes(&self.group_counts);
        ParsedTemplate {
            regex: self.regex,
            normalized_template: self.normalized,
            variable_names: self.names,
            literal_char_count: self.literal_char_count,
            group_indexes,
        }
    }
}

/// Map variable positions to capture group positions.
///
/// Each variable occupies its wrapping group plus the groups of its own
/// regex. The extra trailing entry is where the next group would start.
fn compute_group_indexes(group_counts: &[usize]) -> Option<Vec<usize>> {
    if group_counts.is_empty() {
        return None;
    }

    let mut indexes = Vec::with_capacity(group_counts.len() + 1);
    let mut next = 1;
    indexes.push(next);
    for count in group_counts {
        next += count + 1;
        indexes.push(next);
    }

    let sequential = indexes.iter().enumerate().all(|(i, &g)| g == i + 1);
    if sequential {
        None
    } else {
        Some(indexes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        let cases: &[(&str, &str, usize, &[&str])] = &[
            ("/a", "/a", 2, &[]),
            ("a", "a", 1, &[]),
            ("/a/", "/a/", 3, &[]),
            ("/a/{x}", "/a/([^/]+?)", 3, &["x"]),
            ("/a/{x}/b", "/a/([^/]+?)/b", 5, &["x"]),
            ("/{x}", "/([^/]+?)", 1, &["x"]),
            ("/a/{x}/b/{y}/c", "/a/([^/]+?)/b/([^/]+?)/c", 8, &["x", "y"]),
            ("/a/{x}/{y}/b/", "/a/([^/]+?)/([^/]+?)/b/", 7, &["x", "y"]),
            ("/a/{x}/{y}/", "/a/([^/]+?)/([^/]+?)/", 5, &["x", "y"]),
            ("/{x}/a/{y}/", "/([^/]+?)/a/([^/]+?)/", 5, &["x", "y"]),
            ("/a/{x:}", "/a/([^/]+?)", 3, &["x"]),
            ("/a/{x : }", "/a/([^/]+?)", 3, &["x"]),
            ("/a/{  x  :  }", "/a/([^/]+?)", 3, &["x"]),
            ("/a/{x:.+}", "/a/(.+)", 3, &["x"]),
            ("/a/{x:(/)?}", "/a/((/)?)", 3, &["x"]),
            ("/{x}/{y:.+}/{z:.*}", "/([^/]+?)/(.+)/(.*)", 3, &["x", "y", "z"]),
            (
                "/a /{x}/{y:.+}/{z:.*}",
                "/a%20/([^/]+?)/(.+)/(.*)",
                8,
                &["x", "y", "z"],
            ),
        ];

        for (template, regex, literals, names) in cases {
            let parsed = parse_template(template).unwrap();
            assert_eq!(parsed.regex(), *regex, "regex of {}", template);
            assert_eq!(
                parsed.literal_char_count(),
                *literals,
                "literal count of {}",
                template
            );
            assert_eq!(parsed.variable_names(), *names, "names of {}", template);
        }
    }

    #[test]
    fn test_empty_template() {
        let parsed = parse_template("").unwrap();
        assert_eq!(parsed.regex(), "");
        assert_eq!(parsed.normalized_template(), "");
        assert_eq!(parsed.literal_char_count(), 0);
        assert!(parsed.variable_names().is_empty());
        assert_eq!(parsed.group_indexes(), None);
    }

    #[test]
    fn test_regex_characters_escaped() {
        let parsed = parse_template("/a.b(c)").unwrap();
        assert_eq!(parsed.regex(), "/a\\.b\\(c\\)");
        assert_eq!(parsed.normalized_template(), "/a.b(c)");
    }

    #[test]
    fn test_all_metacharacters_escaped() {
        let parsed = parse_template("/a+b/price$/v1*/x|y").unwrap();
        // '|' is not a path character and gets encoded instead
        assert_eq!(parsed.regex(), "/a\\+b/price\\$/v1\\*/x%7Cy");
    }

    #[test]
    fn test_literal_count_after_encoding() {
        let raw = parse_template("/a b").unwrap();
        let encoded = parse_template("/a%20b").unwrap();
        assert_eq!(raw.regex(), encoded.regex());
        assert_eq!(raw.literal_char_count(), 6);
        assert_eq!(encoded.literal_char_count(), 6);
    }

    #[test]
    fn test_question_mark_is_encoded() {
        let parsed = parse_template("/a?b").unwrap();
        assert_eq!(parsed.regex(), "/a%3Fb");
    }

    #[test]
    fn test_normalized_template() {
        let parsed = parse_template("/a b/{ x }/{y : \\d+ }").unwrap();
        assert_eq!(parsed.normalized_template(), "/a%20b/{x}/{y:\\d+}");
    }

    #[test]
    fn test_normalized_template_reparses_to_same_regex() {
        for template in ["/a b/{x:\\d+}/{y}", "/a.b/{x:(/)?}", "/{ x : [a-z]+ }/c/"] {
            let parsed = parse_template(template).unwrap();
            let reparsed = parse_template(parsed.normalized_template()).unwrap();
            assert_eq!(reparsed.regex(), parsed.regex(), "template {}", template);
        }
    }

    #[test]
    fn test_group_indexes_sequential() {
        let parsed = parse_template("/{a}/{b:\\d+}/{c}").unwrap();
        assert_eq!(parsed.group_indexes(), None);
    }

    #[test]
    fn test_group_indexes_with_nested_groups() {
        let parsed = parse_template("/{a}/{b:(x)(y)}/{c}").unwrap();
        assert_eq!(parsed.group_indexes(), Some(&[1, 2, 5, 6][..]));
    }

    #[test]
    fn test_non_capturing_group_not_counted() {
        let parsed = parse_template("/{a:(?:x|y)}/{b}").unwrap();
        assert_eq!(parsed.group_indexes(), None);
    }

    #[test]
    fn test_duplicate_variable() {
        let err = parse_template("/a/{x}/{y}/{x}").unwrap_err();
        match err {
            RoutingError::DuplicateVariable { name, .. } => assert_eq!(name, "x"),
            other => panic!("Expected DuplicateVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_variable_with_different_regex() {
        assert!(matches!(
            parse_template("/{x}/{x:\\d+}"),
            Err(RoutingError::DuplicateVariable { .. })
        ));
    }

    #[test]
    fn test_malformed_braces() {
        for template in ["/a/{x", "/a/x}", "/a/{x{y}}", "/a/{}", "/a/{ }", "/a/{:.*}"] {
            assert!(
                matches!(
                    parse_template(template),
                    Err(RoutingError::MalformedTemplate { .. })
                ),
                "template {}",
                template
            );
        }
    }

    #[test]
    fn test_invalid_variable_name() {
        for template in ["/{a b}", "/{a*}", "/{a/b}"] {
            assert!(
                matches!(
                    parse_template(template),
                    Err(RoutingError::InvalidVariableName { .. })
                ),
                "template {}",
                template
            );
        }
    }

    #[test]
    fn test_variable_name_characters() {
        let parsed = parse_template("/{a-b_c.d9}").unwrap();
        assert_eq!(parsed.variable_names(), ["a-b_c.d9"]);
    }

    #[test]
    fn test_invalid_variable_regex() {
        let err = parse_template("/{x:(ab}").unwrap_err();
        match err {
            RoutingError::InvalidRegex { name, .. } => assert_eq!(name, "x"),
            other => panic!("Expected InvalidRegex, got {:?}", other),
        }
    }
}
