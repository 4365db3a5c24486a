//! URI template expansion
//!
//! The reverse of matching: substitute values for the variables of a
//! template to build a concrete path.

use crate::encoding::{encode_path, recognize_encode_path};
use crate::error::{Result, RoutingError};
use std::borrow::Cow;
use std::collections::HashMap;

const BRACES: &[char] = &['{', '}'];

/// Piece of a template, borrowed from the template text
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

fn malformed(template: &str, reason: &str) -> RoutingError {
    RoutingError::MalformedTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a template into literals and variable names
///
/// Variable regexes are dropped; only the name matters for expansion.
fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find(BRACES) {
        if rest[open..].starts_with('}') {
            return Err(malformed(template, "unmatched '}'"));
        }
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }

        let body = &rest[open + 1..];
        let close = body
            .find('}')
            .ok_or_else(|| malformed(template, "unclosed '{'"))?;
        let inner = &body[..close];
        if inner.contains('{') {
            return Err(malformed(template, "'{' inside a template variable"));
        }

        let name = inner.split_once(':').map_or(inner, |(name, _)| name).trim();
        if name.is_empty() {
            return Err(malformed(template, "empty variable name"));
        }
        segments.push(Segment::Variable(name));
        rest = &body[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }

    Ok(segments)
}

fn encode_value(value: &str, encode: bool) -> Cow<'_, str> {
    if encode {
        encode_path(value)
    } else {
        recognize_encode_path(value)
    }
}

/// Expand a template with values looked up by variable name
///
/// With `encode` set every character that is not legal in a path is
/// percent-encoded, `%` included. Otherwise existing `%XX` escapes in the
/// values are kept as they are. Literal template text is copied unchanged.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use uri_dispatch::expand;
///
/// let mut values = HashMap::new();
/// values.insert("id".to_string(), "a b".to_string());
///
/// assert_eq!(expand("/items/{id:.+}/", &values, true).unwrap(), "/items/a%20b/");
/// assert!(expand("/items/{other}", &values, true).is_err());
/// ```
pub fn expand(template: &str, values: &HashMap<String, String>, encode: bool) -> Result<String> {
    let mut expanded = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => expanded.push_str(text),
            Segment::Variable(name) => {
                let value = values.get(name).ok_or_else(|| RoutingError::MissingValue {
                    name: name.to_string(),
                })?;
                expanded.push_str(&encode_value(value, encode));
            }
        }
    }
    Ok(expanded)
}

/// Expand a template with values given in order of first appearance
///
/// A name that appears again reuses the value it got the first time.
/// Extra values are ignored.
///
/// ```
/// use uri_dispatch::expand_positional;
///
/// let path = expand_positional("/{a}/{b}/{a}", &["x", "y", "z"], false).unwrap();
/// assert_eq!(path, "/x/y/x");
/// ```
pub fn expand_positional(template: &str, values: &[&str], encode: bool) -> Result<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut assigned: HashMap<&str, &str> = HashMap::new();
    let mut next = values.iter();

    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => expanded.push_str(text),
            Segment::Variable(name) => {
                let value = match assigned.get(name) {
                    Some(value) => *value,
                    None => {
                        let value = *next.next().ok_or_else(|| RoutingError::MissingValue {
                            name: name.to_string(),
                        })?;
                        assigned.insert(name, value);
                        value
                    }
                };
                expanded.push_str(&encode_value(value, encode));
            }
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("/a/{ x : \\d+ }/b{y}").unwrap(),
            vec![
                Segment::Literal("/a/"),
                Segment::Variable("x"),
                Segment::Literal("/b"),
                Segment::Variable("y"),
            ]
        );
        assert!(segments("").unwrap().is_empty());
    }

    #[test]
    fn test_segments_malformed() {
        for template in ["/a}", "/{a", "/{a{b}}", "/{}", "/{ :x}"] {
            assert!(
                matches!(
                    segments(template),
                    Err(RoutingError::MalformedTemplate { .. })
                ),
                "template {}",
                template
            );
        }
    }

    #[test]
    fn test_expand_by_name() {
        let values = values(&[("user", "alice"), ("id", "7")]);
        assert_eq!(
            expand("/users/{user}/items/{id:\\d+}", &values, true).unwrap(),
            "/users/alice/items/7"
        );
    }

    #[test]
    fn test_expand_repeated_name() {
        let values = values(&[("a", "x")]);
        assert_eq!(expand("/{a}/{a}", &values, true).unwrap(), "/x/x");
    }

    #[test]
    fn test_expand_missing_value() {
        let values = values(&[("a", "x")]);
        assert!(matches!(
            expand("/{a}/{b}", &values, true),
            Err(RoutingError::MissingValue { ref name }) if name == "b"
        ));
    }

    #[test]
    fn test_expand_encoding_modes() {
        let values = values(&[("v", "a b%20c/d")]);
        assert_eq!(expand("/{v}", &values, true).unwrap(), "/a%20b%2520c/d");
        assert_eq!(expand("/{v}", &values, false).unwrap(), "/a%20b%20c/d");
    }

    #[test]
    fn test_expand_positional_reuses_first_value() {
        assert_eq!(
            expand_positional("/{a}/{b}/{a}", &["x", "y", "z"], true).unwrap(),
            "/x/y/x"
        );
    }

    #[test]
    fn test_expand_positional_missing_value() {
        assert!(matches!(
            expand_positional("/{a}/{b}", &["x"], true),
            Err(RoutingError::MissingValue { ref name }) if name == "b"
        ));
    }

    #[test]
    fn test_expand_literal_only() {
        assert_eq!(expand_positional("/a b", &[], true).unwrap(), "/a b");
    }
}
