//! Error handling for URI templates and dispatch tables
//!
//! Every failure in this crate happens at construction time (parsing a
//! template, compiling a pattern, registering a route, parsing a media
//! type). Matching never fails: a path that does not match is simply `None`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur while building patterns and dispatch tables
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Unbalanced or nested braces, or an empty variable span
    #[error("Malformed URI template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },

    /// Variable name contains a character outside `[A-Za-z0-9._-]`
    #[error("Invalid character in URI template variable '{name}' of '{template}'")]
    InvalidVariableName { template: String, name: String },

    /// The same variable name appears twice in one template
    #[error("URI template variable name '{name}' already registered in '{template}'")]
    DuplicateVariable { template: String, name: String },

    /// Custom regular expression of a single variable does not compile
    #[error("Invalid regular expression for URI template variable '{name}': {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The assembled pattern does not compile
    #[error("Invalid URI pattern '{regex}': {source}")]
    InvalidPattern {
        regex: String,
        #[source]
        source: regex::Error,
    },

    /// Template expansion found no value for a variable
    #[error("No value supplied for URI template variable '{name}'")]
    MissingValue { name: String },

    /// Media type string could not be parsed
    #[error("Malformed media type '{value}': {reason}")]
    MalformedMediaType { value: String, reason: String },

    /// A pattern with the same regular expression is already registered
    #[error("URI pattern '{template}' is already registered")]
    ConflictingPattern { template: String },

    /// Percent-encoded value does not decode to UTF-8
    #[error("Invalid percent-encoding in '{value}'")]
    InvalidEncoding { value: String },
}

impl RoutingError {
    /// Check if this error was raised while parsing a template
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            RoutingError::MalformedTemplate { .. }
                | RoutingError::InvalidVariableName { .. }
                | RoutingError::DuplicateVariable { .. }
                | RoutingError::InvalidRegex { .. }
                | RoutingError::InvalidPattern { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_variable_display() {
        let error = RoutingError::DuplicateVariable {
            template: "/a/{x}/{x}".to_string(),
            name: "x".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "URI template variable name 'x' already registered in '/a/{x}/{x}'"
        );
        assert!(error.is_template_error());
    }

    #[test]
    fn test_invalid_regex_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let error = RoutingError::InvalidRegex {
            name: "id".to_string(),
            source,
        };
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("'id'"));
    }

    #[test]
    fn test_non_template_errors() {
        let error = RoutingError::MissingValue {
            name: "id".to_string(),
        };
        assert!(!error.is_template_error());
        assert_eq!(
            error.to_string(),
            "No value supplied for URI template variable 'id'"
        );
    }
}
