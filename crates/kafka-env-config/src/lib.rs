// crates/kafka-env-config/src/lib.rs
// ============================================================================
// Module: Kafka Env Config Library
// Description: Validated broker configuration derived from named settings.
// Purpose: Produce broker addresses, topic prefixing, and a client TLS context.
// Dependencies: rustls, rustls-pki-types, serde, thiserror, toml, tracing, url
// ============================================================================

//! ## Overview
//! `kafka-env-config` turns a handful of settings (broker locators, an
//! optional namespace prefix, and certificate material) into a validated
//! [`KafkaConfig`]. Every problem found while validating is collected into a
//! single [`ConfigIssues`] report instead of failing on the first one.
//!
//! When any locator uses the `kafka+ssl` scheme the config carries a
//! [`TlsContext`] whose peer verifier ignores hostnames and instead requires
//! every presented certificate to chain to the operator-supplied CA.
//! Invariants:
//! - A config exists only when the issue report is empty.
//! - A TLS context is present if and only if a locator requested TLS.
//!
//! Security posture: settings and peer certificates are untrusted; the peer
//! verifier is the only authentication of the broker's identity.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod issues;
pub mod locator;
pub mod prefix;
pub mod settings;
pub mod tls;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::KafkaConfig;
pub use config::TLS_CERTIFICATES_ATTRIBUTE;
pub use issues::ConfigIssue;
pub use issues::ConfigIssues;
pub use locator::BrokerList;
pub use locator::Scheme;
pub use locator::parse_broker_list;
pub use prefix::NamespacePrefix;
pub use settings::EnvSettings;
pub use settings::FileSettings;
pub use settings::MapSettings;
pub use settings::SettingsError;
pub use settings::SettingsSource;
pub use settings::setting_name;
pub use tls::ClientIdentity;
pub use tls::TlsContext;
pub use tls::TlsError;
pub use tls::TrustPool;
pub use verifier::ChainOnlyVerifier;
pub use verifier::PeerVerificationError;
pub use verifier::PeerVerifier;

#[cfg(test)]
pub(crate) mod testdata;
