//! Root resource table
//!
//! Holds one value per URI pattern, kept in specificity order so that
//! [`RouteTable::resolve`] always returns the most specific match no matter
//! in which order routes were registered.

use crate::error::{Result, RoutingError};
use crate::params::PathParameters;
use crate::pattern::{MatchResult, UriPattern};
use crate::{debug_log, trace_log, warn_log};

/// A successful lookup: the pattern that matched, its value and the
/// captured values
#[derive(Debug, Clone)]
pub struct RouteMatch<'a, T> {
    pub pattern: &'a UriPattern,
    pub value: &'a T,
    pub result: MatchResult,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Captured variables by name
    pub fn params(&self) -> PathParameters {
        PathParameters::from_match(self.pattern, &self.result)
    }

    /// Part of the path left for a sub-resource
    pub fn remainder(&self) -> Option<&str> {
        self.result.remainder()
    }

    /// Check whether the pattern consumed the whole path
    pub fn is_full_match(&self) -> bool {
        self.result.is_full_match()
    }
}

/// Patterns with associated values, most specific first
///
/// # Example
///
/// ```
/// use uri_dispatch::RouteTable;
///
/// let mut table = RouteTable::new();
/// table.add("/users/{id}", "user").unwrap();
/// table.add("/users/me", "me").unwrap();
///
/// let found = table.resolve("/users/me").unwrap();
/// assert_eq!(*found.value, "me");
///
/// let found = table.resolve("/users/7/posts").unwrap();
/// assert_eq!(*found.value, "user");
/// assert_eq!(found.params().get("id"), Some("7"));
/// assert_eq!(found.remainder(), Some("/posts"));
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    routes: Vec<(UriPattern, T)>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `template` and register `value` under it
    ///
    /// Fails with [`RoutingError::ConflictingPattern`] when a pattern with
    /// the same regex is already registered.
    pub fn add(&mut self, template: &str, value: T) -> Result<()> {
        let pattern = UriPattern::new(template)?;
        self.add_pattern(pattern, value)
    }

    /// Register `value` under an already compiled pattern
    pub fn add_pattern(&mut self, pattern: UriPattern, value: T) -> Result<()> {
        match self.routes.binary_search_by(|(p, _)| p.cmp(&pattern)) {
            Ok(_) => {
                warn_log!(
                    "Rejecting '{}': pattern '{}' is already registered",
                    pattern.template(),
                    pattern.regex()
                );
                Err(RoutingError::ConflictingPattern {
                    template: pattern.template().to_string(),
                })
            }
            Err(index) => {
                debug_log!("Registering route '{}'", pattern.template());
                self.routes.insert(index, (pattern, value));
                Ok(())
            }
        }
    }

    /// Remove the route registered under a template equivalent to `template`
    pub fn remove(&mut self, template: &str) -> Option<T> {
        let pattern = UriPattern::new(template).ok()?;
        let index = self
            .routes
            .binary_search_by(|(p, _)| p.cmp(&pattern))
            .ok()?;
        debug_log!("Removing route '{}'", pattern.template());
        Some(self.routes.remove(index).1)
    }

    /// Value registered under a template equivalent to `template`
    pub fn get(&self, template: &str) -> Option<&T> {
        let pattern = UriPattern::new(template).ok()?;
        self.routes
            .binary_search_by(|(p, _)| p.cmp(&pattern))
            .ok()
            .map(|index| &self.routes[index].1)
    }

    /// Find the most specific pattern matching `path`
    ///
    /// The match may leave a remainder, which a caller hands on to a
    /// sub-resource.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_, T>> {
        let found = self.routes.iter().find_map(|(pattern, value)| {
            pattern.matches(path).map(|result| RouteMatch {
                pattern,
                value,
                result,
            })
        });

        match &found {
            Some(m) => {
                trace_log!("Resolved '{}' to '{}'", path, m.pattern.template());
            }
            None => {
                trace_log!("No route for '{}'", path);
            }
        }
        found
    }

    /// Routes in priority order
    pub fn iter(&self) -> impl Iterator<Item = (&UriPattern, &T)> {
        self.routes.iter().map(|(pattern, value)| (pattern, value))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
