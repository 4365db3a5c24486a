//! Path parameter extraction
//!
//! [`PathParameters`] turns the positional values of a [`MatchResult`] into
//! a lookup by variable name.

use crate::encoding::decode;
use crate::error::Result;
use crate::pattern::{MatchResult, UriPattern};
use std::collections::HashMap;

/// Template variables captured from a request path
///
/// Values are kept as they appeared in the path, i.e. still
/// percent-encoded. Use [`get_decoded`](Self::get_decoded) for the decoded
/// form.
///
/// # Example
///
/// ```
/// use uri_dispatch::{PathParameters, UriPattern};
///
/// let pattern = UriPattern::new("/users/{id}/{name}").unwrap();
/// let result = pattern.matches("/users/123/John%20Doe").unwrap();
/// let params = PathParameters::from_match(&pattern, &result);
///
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// assert_eq!(params.get_decoded("name").unwrap().as_deref(), Some("John Doe"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParameters {
    params: HashMap<String, String>,
}

impl PathParameters {
    /// Create new empty path parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair the pattern's variable names with the captured values
    ///
    /// Variables without a captured value are left out.
    pub fn from_match(pattern: &UriPattern, result: &MatchResult) -> Self {
        let params = pattern
            .parameter_names()
            .iter()
            .zip(result.variable_values())
            .filter_map(|(name, value)| Some((name.clone(), value.clone()?)))
            .collect();
        Self { params }
    }

    /// Get a parameter value as captured
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter value with `%XX` escapes decoded
    ///
    /// Returns `Ok(None)` if the parameter doesn't exist and an error if
    /// the escapes do not decode to UTF-8.
    pub fn get_decoded(&self, key: &str) -> Result<Option<String>> {
        self.params.get(key).map(|value| decode(value)).transpose()
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert a parameter, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    /// Check if parameter exists
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all parameters
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RoutingError;

    fn params(template: &str, path: &str) -> PathParameters {
        let pattern = UriPattern::new(template).unwrap();
        let result = pattern.matches(path).unwrap();
        PathParameters::from_match(&pattern, &result)
    }

    #[test]
    fn test_from_match() {
        let params = params("/a/{x}/{y:\\d+}", "/a/b/12/rest");

        assert_eq!(params.get("x"), Some("b"));
        assert_eq!(params.get("y"), Some("12"));
        assert_eq!(params.len(), 2);
        assert!(!params.contains("rest"));
    }

    #[test]
    fn test_from_match_empty_capture() {
        let params = params("/{x:a|(b)}{y:(c)?}", "/a");

        assert_eq!(params.get("x"), Some("a"));
        assert_eq!(params.get("y"), Some(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_path_params_get_as() {
        let mut params = PathParameters::new();
        params.insert("id", "123");
        params.insert("active", "true");

        assert_eq!(params.get_as::<i32>("id"), Some(123));
        assert_eq!(params.get_as::<u32>("id"), Some(123));
        assert_eq!(params.get_as::<bool>("active"), Some(true));
        assert_eq!(params.get_as::<i32>("active"), None);
        assert_eq!(params.get_as::<i32>("missing"), None);
    }

    #[test]
    fn test_path_params_get_decoded() {
        let params = params("/files/{name}", "/files/caf%C3%A9%20menu.txt");

        assert_eq!(params.get("name"), Some("caf%C3%A9%20menu.txt"));
        assert_eq!(
            params.get_decoded("name").unwrap().as_deref(),
            Some("caf\u{e9} menu.txt")
        );
        assert_eq!(params.get_decoded("missing").unwrap(), None);
    }

    #[test]
    fn test_path_params_invalid_encoding() {
        let mut params = PathParameters::new();
        params.insert("bad", "%FF");

        assert!(matches!(
            params.get_decoded("bad"),
            Err(RoutingError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_path_params_insert_replaces() {
        let mut params = PathParameters::new();
        assert_eq!(params.insert("key", "a"), None);
        assert_eq!(params.insert("key", "b"), Some("a".to_string()));
        assert_eq!(params.get("key"), Some("b"));
    }

    #[test]
    fn test_path_params_iter() {
        let mut params = PathParameters::new();
        params.insert("x", "1");
        params.insert("y", "2");

        let mut pairs: Vec<(&str, &str)> = params.iter().collect();
        pairs.sort();
        assert_eq!(pairs, vec![("x", "1"), ("y", "2")]);
    }

    #[test]
    fn test_path_params_empty() {
        let params = PathParameters::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }
}
