// crates/kafka-env-config/src/issues.rs
// ============================================================================
// Module: Config Issues
// Description: Structured configuration issues and the aggregated report.
// Purpose: Collect every validation problem and surface them together.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ConfigIssue`] is one problem found while validating settings, tagged by
//! kind and carrying the setting (attribute) it belongs to. [`ConfigIssues`]
//! accumulates them in discovery order; its [`Display`](fmt::Display) output
//! is the multi-line report handed back to callers.
//! Invariants:
//! - Issues are appended, never removed or deduplicated.
//! - Rendering preserves recording order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header line of the rendered report.
pub const REPORT_HEADER: &str = "Kafka config has the following errors:";

/// Message recorded for certificate settings missing under TLS.
pub const REQUIRED_FOR_TLS: &str = "is required for tls";

// ============================================================================
// SECTION: Config Issue
// ============================================================================

/// A single configuration problem, keyed by the attribute it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    /// A broker locator token could not be parsed as a URI.
    #[error("{attribute}: {message}")]
    MalformedLocator {
        /// Setting the locator came from.
        attribute: String,
        /// Parser error text.
        message: String,
    },
    /// A parsed locator used a scheme outside the accepted set.
    #[error("{attribute}: {}", invalid_scheme_message(.scheme))]
    UnsupportedScheme {
        /// Setting the locator came from.
        attribute: String,
        /// Rejected scheme, as written.
        scheme: String,
    },
    /// A certificate setting is absent while TLS is required.
    #[error("{attribute}: is required for tls")]
    MissingCertificateSetting {
        /// Missing setting name.
        attribute: String,
    },
    /// The trusted CA PEM could not be turned into a trust pool.
    #[error("{attribute}: {message}")]
    InvalidTrustedCertificate {
        /// Attribute the failure is recorded under.
        attribute: String,
        /// Failure description.
        message: String,
    },
    /// The client certificate/key pair is malformed or mismatched.
    #[error("{attribute}: {message}")]
    InvalidClientKeyPair {
        /// Attribute the failure is recorded under.
        attribute: String,
        /// Failure description.
        message: String,
    },
    /// The TLS library refused to build a client context.
    #[error("{attribute}: {message}")]
    TlsContext {
        /// Attribute the failure is recorded under.
        attribute: String,
        /// Failure description.
        message: String,
    },
}

impl ConfigIssue {
    /// Returns the attribute (setting name) this issue is recorded under.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::MalformedLocator {
                attribute, ..
            }
            | Self::UnsupportedScheme {
                attribute, ..
            }
            | Self::MissingCertificateSetting {
                attribute,
            }
            | Self::InvalidTrustedCertificate {
                attribute, ..
            }
            | Self::InvalidClientKeyPair {
                attribute, ..
            }
            | Self::TlsContext {
                attribute, ..
            } => attribute,
        }
    }

    /// Returns the human-readable message without the attribute.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MalformedLocator {
                message, ..
            }
            | Self::InvalidTrustedCertificate {
                message, ..
            }
            | Self::InvalidClientKeyPair {
                message, ..
            }
            | Self::TlsContext {
                message, ..
            } => message.clone(),
            Self::UnsupportedScheme {
                scheme, ..
            } => invalid_scheme_message(scheme),
            Self::MissingCertificateSetting {
                ..
            } => REQUIRED_FOR_TLS.to_string(),
        }
    }
}

/// Formats the unsupported-scheme message with the scheme quoted and escaped.
fn invalid_scheme_message(scheme: &str) -> String {
    format!("\"{}\" is an invalid scheme", scheme.escape_default())
}

// ============================================================================
// SECTION: Issue Collector
// ============================================================================

/// Ordered collection of [`ConfigIssue`] values.
///
/// # Invariants
/// - An empty collector means validation succeeded.
/// - Iteration and rendering follow insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigIssues {
    /// Recorded issues in discovery order.
    issues: Vec<ConfigIssue>,
}

impl ConfigIssues {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issues: Vec::new(),
        }
    }

    /// Appends an issue.
    pub fn add(&mut self, issue: ConfigIssue) {
        self.issues.push(issue);
    }

    /// Returns true when at least one issue has been recorded.
    #[must_use]
    pub const fn any(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns the number of recorded issues.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true when no issue has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterates issues in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigIssue> {
        self.issues.iter()
    }

    /// Returns distinct attributes in the order they were first recorded.
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for issue in &self.issues {
            let attribute = issue.attribute();
            if !seen.contains(&attribute) {
                seen.push(attribute);
            }
        }
        seen
    }

    /// Returns the messages recorded under `attribute`, in order.
    #[must_use]
    pub fn messages_for(&self, attribute: &str) -> Vec<String> {
        self.issues
            .iter()
            .filter(|issue| issue.attribute() == attribute)
            .map(ConfigIssue::message)
            .collect()
    }

    /// Renders the report: a header line, then `  - <attribute>: <message>`
    /// per issue.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(REPORT_HEADER.len() + 1 + self.issues.len() * 48);
        out.push_str(REPORT_HEADER);
        out.push('\n');
        for issue in &self.issues {
            out.push_str("  - ");
            out.push_str(&issue.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for ConfigIssues {}

impl Extend<ConfigIssue> for ConfigIssues {
    fn extend<T: IntoIterator<Item = ConfigIssue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

impl IntoIterator for ConfigIssues {
    type Item = ConfigIssue;
    type IntoIter = std::vec::IntoIter<ConfigIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigIssues {
    type Item = &'a ConfigIssue;
    type IntoIter = std::slice::Iter<'a, ConfigIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
