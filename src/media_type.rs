//! Media types and their precision ordering
//!
//! Only what method ranking needs: parsing `type/subtype;param=value`,
//! wildcard checks, and a comparator that puts the most precise type first.

use crate::error::{Result, RoutingError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Wildcard used for type and subtype
pub const WILDCARD: &str = "*";

/// A parsed media type such as `application/atom+xml;charset=utf-8`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// Create a media type without parameters
    pub fn new(main_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            subtype: subtype.into(),
            parameters: Vec::new(),
        }
    }

    /// `*/*`
    pub fn wildcard() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// Add a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Top-level type, e.g. `text`
    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    /// Subtype, e.g. `plain`
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Get a parameter value by case-insensitive name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.main_type == WILDCARD
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::wildcard()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{}={}", name, value)?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = RoutingError;

    /// Parse `type/subtype` with optional `;name=value` parameters.
    ///
    /// A lone `*` is read as `*/*`.
    fn from_str(value: &str) -> Result<Self> {
        let malformed = |reason: &str| RoutingError::MalformedMediaType {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.split(';');
        let essence = parts.next().unwrap_or_default().trim();

        let (main_type, subtype) = match essence.split_once('/') {
            Some((t, s)) => (t.trim(), s.trim()),
            None if essence == WILDCARD => (WILDCARD, WILDCARD),
            None => return Err(malformed("missing '/'")),
        };
        if main_type.is_empty() || subtype.is_empty() {
            return Err(malformed("empty type or subtype"));
        }
        if subtype.contains('/') {
            return Err(malformed("more than one '/'"));
        }

        let mut media_type = MediaType::new(main_type, subtype);
        for parameter in parts {
            let parameter = parameter.trim();
            if parameter.is_empty() {
                continue;
            }
            let (name, val) = parameter
                .split_once('=')
                .ok_or_else(|| malformed("parameter without '='"))?;
            let val = val.trim().trim_matches('"');
            media_type = media_type.with_parameter(name.trim(), val);
        }

        Ok(media_type)
    }
}

/// Precision of a subtype, lower is more precise
///
/// `atom+xml` < `xml` < `atom+*` < `*+xml` < `*`
fn subtype_rank(subtype: &str) -> u8 {
    if subtype == WILDCARD {
        return 4;
    }
    match subtype.split_once('+') {
        Some((prefix, _)) if prefix == WILDCARD => 3,
        Some((_, suffix)) if suffix == WILDCARD => 2,
        Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => 0,
        _ => 1,
    }
}

/// Order two media types from most to least precise
///
/// A concrete type sorts before `*`. After that subtypes are ranked
/// `atom+xml`, `xml`, `atom+*`, `*+xml`, `*`. Types of equal precision
/// compare equal.
///
/// ```
/// use uri_dispatch::{compare_media_types, MediaType};
///
/// let plain: MediaType = "text/plain".parse().unwrap();
/// let text: MediaType = "text/*".parse().unwrap();
/// assert!(compare_media_types(&plain, &text).is_lt());
/// ```
pub fn compare_media_types(a: &MediaType, b: &MediaType) -> Ordering {
    a.is_wildcard_type()
        .cmp(&b.is_wildcard_type())
        .then_with(|| subtype_rank(&a.subtype).cmp(&subtype_rank(&b.subtype)))
}

/// Sort media types from most to least precise, keeping the relative
/// order of equally precise types
pub fn sort_media_types(types: &mut [MediaType]) {
    types.sort_by(compare_media_types);
}

/// Parse and sort a list of media types
///
/// An empty list becomes `[*/*]`, the implicit default of a method that
/// declares nothing.
pub fn media_type_list<I, S>(values: I) -> Result<Vec<MediaType>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut types = values
        .into_iter()
        .map(|v| v.as_ref().parse())
        .collect::<Result<Vec<MediaType>>>()?;
    if types.is_empty() {
        types.push(MediaType::wildcard());
    }
    sort_media_types(&mut types);
    Ok(types)
}
