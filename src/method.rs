//! Resource methods and their media-type ordering
//!
//! Several methods may answer the same path and HTTP verb while consuming
//! or producing different media types. [`sort_methods`] puts them in the
//! order content negotiation should try them: most precise first.

use crate::debug_log;
use crate::media_type::{compare_media_types, sort_media_types, MediaType};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Media types a method accepts and returns
///
/// Both lists are expected to be sorted from most to least precise (see
/// [`sort_media_types`]). An empty list stands for `*/*`.
pub trait MethodDescriptor {
    /// Media types of the request body this method accepts
    fn consumes(&self) -> &[MediaType];

    /// Media types of the response this method can return
    fn produces(&self) -> &[MediaType];
}

impl<T: MethodDescriptor + ?Sized> MethodDescriptor for &T {
    fn consumes(&self) -> &[MediaType] {
        (**self).consumes()
    }

    fn produces(&self) -> &[MediaType] {
        (**self).produces()
    }
}

impl<T: MethodDescriptor + ?Sized> MethodDescriptor for std::sync::Arc<T> {
    fn consumes(&self) -> &[MediaType] {
        (**self).consumes()
    }

    fn produces(&self) -> &[MediaType] {
        (**self).produces()
    }
}

fn any_media_type() -> &'static MediaType {
    static ANY: OnceLock<MediaType> = OnceLock::new();
    ANY.get_or_init(MediaType::wildcard)
}

/// Least precise entry of a sorted list
fn least_precise(types: &[MediaType]) -> &MediaType {
    match types.last() {
        Some(media_type) => media_type,
        None => any_media_type(),
    }
}

fn effective_len(types: &[MediaType]) -> usize {
    types.len().max(1)
}

/// Order two methods from most to least specific
///
/// Compares the least precise consumed type, then the least precise
/// produced type, then prefers fewer consumed and fewer produced types.
///
/// ```
/// use uri_dispatch::{compare_methods, ResourceMethod};
///
/// let plain = ResourceMethod::new("plain").consumes("text/plain".parse().unwrap());
/// let text = ResourceMethod::new("text").consumes("text/*".parse().unwrap());
/// assert!(compare_methods(&plain, &text).is_lt());
/// ```
pub fn compare_methods<A, B>(a: &A, b: &B) -> Ordering
where
    A: MethodDescriptor + ?Sized,
    B: MethodDescriptor + ?Sized,
{
    compare_media_types(least_precise(a.consumes()), least_precise(b.consumes()))
        .then_with(|| {
            compare_media_types(least_precise(a.produces()), least_precise(b.produces()))
        })
        .then_with(|| effective_len(a.consumes()).cmp(&effective_len(b.consumes())))
        .then_with(|| effective_len(a.produces()).cmp(&effective_len(b.produces())))
}

/// Sort methods from most to least specific, keeping registration order
/// among equals
pub fn sort_methods<T: MethodDescriptor>(methods: &mut [T]) {
    methods.sort_by(compare_methods);
}

// ============================================================================
// Resource Method
// ============================================================================

/// A named method descriptor built in code
///
/// # Example
///
/// ```
/// use uri_dispatch::{MethodDescriptor, ResourceMethod};
///
/// let method = ResourceMethod::new("list_users")
///     .produces("application/json".parse().unwrap())
///     .produces("application/*".parse().unwrap());
///
/// assert_eq!(MethodDescriptor::produces(&method)[0].subtype(), "json");
/// assert!(MethodDescriptor::consumes(&method).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMethod {
    name: String,
    consumes: Vec<MediaType>,
    produces: Vec<MediaType>,
}

impl ResourceMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consumes: Vec::new(),
            produces: Vec::new(),
        }
    }

    /// Add an accepted media type
    pub fn consumes(mut self, media_type: MediaType) -> Self {
        self.consumes.push(media_type);
        sort_media_types(&mut self.consumes);
        self
    }

    /// Add a produced media type
    pub fn produces(mut self, media_type: MediaType) -> Self {
        self.produces.push(media_type);
        sort_media_types(&mut self.produces);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MethodDescriptor for ResourceMethod {
    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }

    fn produces(&self) -> &[MediaType] {
        &self.produces
    }
}

// ============================================================================
// Resource Method Map
// ============================================================================

/// Methods of one resource grouped by HTTP verb
///
/// Each group stays sorted by [`compare_methods`] after [`add`](Self::add).
/// Verbs are kept as given; `"GET"` and `"get"` are different groups.
#[derive(Debug, Clone)]
pub struct ResourceMethodMap<T> {
    methods: BTreeMap<String, Vec<T>>,
}

impl<T> Default for ResourceMethodMap<T> {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }
}

impl<T: MethodDescriptor> ResourceMethodMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method under `verb` and re-sort that group
    pub fn add(&mut self, verb: impl Into<String>, method: T) {
        let verb = verb.into();
        debug_log!("Adding resource method for {}", verb);
        let group = self.methods.entry(verb).or_default();
        group.push(method);
        sort_methods(group);
    }

    /// Methods registered under `verb`, most specific first
    pub fn get(&self, verb: &str) -> Option<&[T]> {
        self.methods.get(verb).map(Vec::as_slice)
    }

    /// Most specific method registered under `verb`
    pub fn get_first(&self, verb: &str) -> Option<&T> {
        self.methods.get(verb)?.first()
    }

    /// Replace every method under `verb` with a single one
    pub fn put_single(&mut self, verb: impl Into<String>, method: T) {
        self.methods.insert(verb.into(), vec![method]);
    }

    /// Group for `verb`, created empty if absent
    ///
    /// Methods pushed here directly are not sorted until [`sort`](Self::sort).
    pub fn get_list(&mut self, verb: impl Into<String>) -> &mut Vec<T> {
        self.methods.entry(verb.into()).or_default()
    }

    /// Re-sort every group
    pub fn sort(&mut self) {
        for group in self.methods.values_mut() {
            sort_methods(group);
        }
    }

    /// Verbs that have at least one method, sorted, for an `Allow` header
    pub fn allow(&self) -> Vec<&str> {
        self.methods
            .iter()
            .filter(|(_, group)| !group.is_empty())
            .map(|(verb, _)| verb.as_str())
            .collect()
    }

    pub fn contains_verb(&self, verb: &str) -> bool {
        self.methods.get(verb).is_some_and(|group| !group.is_empty())
    }

    /// Number of verbs
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Iterate over verbs and their groups in verb order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.methods
            .iter()
            .map(|(verb, group)| (verb.as_str(), group.as_slice()))
    }
}
