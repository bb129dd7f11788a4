// crates/kafka-env-config/src/locator.rs
// ============================================================================
// Module: Broker Locators
// Description: Parsing and validation of comma-separated broker locators.
// Purpose: Extract host:port authorities and detect TLS requirements.
// Dependencies: tracing, url
// ============================================================================

//! ## Overview
//! A broker locator is a `kafka://host:port` or `kafka+ssl://host:port` URI.
//! [`parse_broker_list`] splits a comma-separated setting, validates each
//! token independently, and keeps going after a bad token so every problem
//! lands in the same report.
//! Invariants:
//! - Tokens are not trimmed; surrounding whitespace is an error.
//! - Accepted authorities keep input order and are not deduplicated.
//! - TLS is required when any accepted token uses `kafka+ssl`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use url::Position;
use url::Url;

use crate::issues::ConfigIssue;
use crate::issues::ConfigIssues;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scheme for plaintext broker connections.
pub const PLAINTEXT_SCHEME: &str = "kafka";

/// Scheme for TLS broker connections.
pub const SECURE_SCHEME: &str = "kafka+ssl";

/// Separator between locators in a broker list.
pub const LOCATOR_SEPARATOR: char = ',';

// ============================================================================
// SECTION: Scheme
// ============================================================================

/// Accepted locator schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `kafka://` plaintext transport.
    Plaintext,
    /// `kafka+ssl://` encrypted, certificate-authenticated transport.
    Secure,
}

impl Scheme {
    /// Maps a parsed URI scheme onto an accepted scheme.
    #[must_use]
    pub fn from_uri_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            PLAINTEXT_SCHEME => Some(Self::Plaintext),
            SECURE_SCHEME => Some(Self::Secure),
            _ => None,
        }
    }

    /// Returns the scheme as written in a locator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => PLAINTEXT_SCHEME,
            Self::Secure => SECURE_SCHEME,
        }
    }

    /// Returns true when the scheme designates an encrypted transport.
    #[must_use]
    pub const fn requires_tls(self) -> bool {
        matches!(self, Self::Secure)
    }
}

// ============================================================================
// SECTION: Locator
// ============================================================================

/// A validated broker locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Accepted scheme.
    pub scheme: Scheme,
    /// `host[:port]` portion of the locator, as written.
    pub authority: String,
}

/// Reasons a single locator token is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorRejection {
    /// The token is not a parseable URI.
    Malformed(String),
    /// The token parsed but its scheme is not accepted.
    UnsupportedScheme(String),
}

impl LocatorRejection {
    /// Converts the rejection into an issue recorded under `attribute`.
    #[must_use]
    pub fn into_issue(self, attribute: &str) -> ConfigIssue {
        match self {
            Self::Malformed(message) => ConfigIssue::MalformedLocator {
                attribute: attribute.to_string(),
                message,
            },
            Self::UnsupportedScheme(scheme) => ConfigIssue::UnsupportedScheme {
                attribute: attribute.to_string(),
                scheme,
            },
        }
    }
}

/// Parses and validates one locator token.
///
/// # Errors
///
/// Returns [`LocatorRejection`] when the token is not a URI, uses an
/// unsupported scheme, or names no host.
pub fn parse_locator(raw: &str) -> Result<Locator, LocatorRejection> {
    if raw.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err(LocatorRejection::Malformed(
            "locator contains whitespace or control characters".to_string(),
        ));
    }
    let uri = Url::parse(raw).map_err(|err| LocatorRejection::Malformed(err.to_string()))?;
    let scheme = Scheme::from_uri_scheme(uri.scheme())
        .ok_or_else(|| LocatorRejection::UnsupportedScheme(uri.scheme().to_string()))?;
    if uri.host_str().is_none_or(str::is_empty) {
        return Err(LocatorRejection::Malformed("missing host".to_string()));
    }
    let authority = uri[Position::BeforeHost..Position::AfterPort].to_string();
    Ok(Locator {
        scheme,
        authority,
    })
}

// ============================================================================
// SECTION: Broker List
// ============================================================================

/// Result of parsing a broker list setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerList {
    /// Accepted `host[:port]` authorities in input order.
    pub brokers: Vec<String>,
    /// Whether any accepted locator requested TLS.
    pub requires_tls: bool,
    /// Issues recorded for rejected tokens, in list order.
    pub issues: ConfigIssues,
}

/// Splits `raw` on commas and validates every token.
///
/// An empty `raw` yields a single empty token, which is rejected; an unset
/// broker list is therefore always reported.
#[must_use]
pub fn parse_broker_list(attribute: &str, raw: &str) -> BrokerList {
    let mut list = BrokerList::default();
    for token in raw.split(LOCATOR_SEPARATOR) {
        match parse_locator(token) {
            Ok(locator) => {
                list.requires_tls |= locator.scheme.requires_tls();
                list.brokers.push(locator.authority);
            }
            Err(rejection) => list.issues.add(rejection.into_issue(attribute)),
        }
    }
    tracing::debug!(
        attribute,
        brokers = list.brokers.len(),
        rejected = list.issues.len(),
        requires_tls = list.requires_tls,
        "parsed broker list"
    );
    list
}
