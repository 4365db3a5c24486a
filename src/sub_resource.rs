//! Sub-resource methods of a resource
//!
//! A resource may declare methods on relative paths such as `{id}/items`.
//! Each relative pattern owns a [`ResourceMethodMap`]; patterns are kept in
//! specificity order and requests are dispatched to the first pattern that
//! consumes the whole remaining path.

use crate::error::Result;
use crate::method::{MethodDescriptor, ResourceMethodMap};
use crate::pattern::UriPattern;
use crate::table::RouteMatch;
use crate::{debug_log, trace_log};

/// Relative patterns of one resource with their methods
///
/// # Example
///
/// ```
/// use uri_dispatch::{ResourceMethod, SubResourceMethodMap};
///
/// let mut map = SubResourceMethodMap::new();
/// map.add("{id}", "GET", ResourceMethod::new("get_item")).unwrap();
/// map.add("{id}/owner", "GET", ResourceMethod::new("get_owner")).unwrap();
///
/// let found = map.find("/7/owner").unwrap();
/// assert_eq!(found.value.get_first("GET").unwrap().name(), "get_owner");
///
/// // "{id}" leaves "/owner/x" unconsumed, so nothing dispatches here
/// assert!(map.find("/7/owner/x").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SubResourceMethodMap<T> {
    entries: Vec<(UriPattern, ResourceMethodMap<T>)>,
}

impl<T> Default for SubResourceMethodMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: MethodDescriptor> SubResourceMethodMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method under a relative template
    ///
    /// Templates that compile to the same pattern share one method map.
    pub fn add(&mut self, template: &str, verb: impl Into<String>, method: T) -> Result<()> {
        let pattern = UriPattern::new(template)?;
        self.add_pattern(pattern, verb, method);
        Ok(())
    }

    /// Register a method under an already compiled pattern
    pub fn add_pattern(&mut self, pattern: UriPattern, verb: impl Into<String>, method: T) {
        let index = match self.entries.binary_search_by(|(p, _)| p.cmp(&pattern)) {
            Ok(index) => index,
            Err(index) => {
                debug_log!("Registering sub-resource pattern '{}'", pattern.template());
                self.entries
                    .insert(index, (pattern, ResourceMethodMap::new()));
                index
            }
        };
        self.entries[index].1.add(verb, method);
    }

    /// Methods registered under a pattern equal to `pattern`
    pub fn get(&self, pattern: &UriPattern) -> Option<&ResourceMethodMap<T>> {
        self.entries
            .binary_search_by(|(p, _)| p.cmp(pattern))
            .ok()
            .map(|index| &self.entries[index].1)
    }

    /// First pattern, in priority order, that consumes the whole path
    ///
    /// A trailing `/` left over counts as consumed.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_, ResourceMethodMap<T>>> {
        for (pattern, methods) in &self.entries {
            if let Some(result) = pattern.matches(path) {
                if result.is_full_match() {
                    trace_log!("Sub-resource '{}' matches '{}'", pattern.template(), path);
                    return Some(RouteMatch {
                        pattern,
                        value: methods,
                        result,
                    });
                }
            }
        }
        trace_log!("No sub-resource method for '{}'", path);
        None
    }

    /// Re-sort the methods of every pattern
    pub fn sort(&mut self) {
        for (_, methods) in &mut self.entries {
            methods.sort();
        }
    }

    /// Patterns and their methods in priority order
    pub fn iter(&self) -> impl Iterator<Item = (&UriPattern, &ResourceMethodMap<T>)> {
        self.entries.iter().map(|(pattern, methods)| (pattern, methods))
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
