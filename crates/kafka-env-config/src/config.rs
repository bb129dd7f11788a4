// crates/kafka-env-config/src/config.rs
// ============================================================================
// Module: Kafka Config Assembler
// Description: Single-pass validation of broker settings into a config.
// Purpose: Return a complete config or every problem found, never both.
// Dependencies: rustls, tracing
// ============================================================================

//! ## Overview
//! [`KafkaConfig::from_settings`] reads the broker list and prefix, parses the
//! brokers, and, when any broker uses `kafka+ssl`, requires and validates the
//! certificate settings. Problems accumulate in a [`ConfigIssues`] report in
//! a fixed order: broker list issues first (in list order), then missing
//! client certificate, client key, trusted certificate, then certificate
//! material.
//! Invariants:
//! - `Ok` carries no issues; `Err` carries at least one.
//! - `tls_context` is present iff a broker requested TLS.
//! - The config is immutable after construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use rustls::ClientConfig;

use crate::issues::ConfigIssue;
use crate::issues::ConfigIssues;
use crate::locator::parse_broker_list;
use crate::prefix::NamespacePrefix;
use crate::settings::CLIENT_CERT_ATTRIBUTE;
use crate::settings::CLIENT_CERT_KEY_ATTRIBUTE;
use crate::settings::EnvSettings;
use crate::settings::PREFIX_ATTRIBUTE;
use crate::settings::SettingsSource;
use crate::settings::TRUSTED_CERT_ATTRIBUTE;
use crate::settings::URL_ATTRIBUTE;
use crate::settings::setting_name;
use crate::tls::TlsContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Attribute under which certificate material failures are recorded.
pub const TLS_CERTIFICATES_ATTRIBUTE: &str = "TLS certificates";

// ============================================================================
// SECTION: Kafka Config
// ============================================================================

/// Validated broker connection configuration.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Namespace prefix for topics and consumer groups.
    prefix: NamespacePrefix,
    /// Broker `host[:port]` authorities in input order.
    brokers: Vec<String>,
    /// TLS context, present when any broker requested TLS.
    tls: Option<TlsContext>,
}

impl KafkaConfig {
    /// Loads the default instance from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIssues`] describing every invalid or missing setting.
    pub fn from_env() -> Result<Self, ConfigIssues> {
        Self::from_settings(&EnvSettings, None)
    }

    /// Loads the named instance (`HEROKU_KAFKA_<NAME>_*`) from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIssues`] describing every invalid or missing setting.
    pub fn from_env_named(name: &str) -> Result<Self, ConfigIssues> {
        Self::from_settings(&EnvSettings, Some(name))
    }

    /// Validates settings for `instance` read from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIssues`] describing every invalid or missing setting.
    pub fn from_settings(
        settings: &dyn SettingsSource,
        instance: Option<&str>,
    ) -> Result<Self, ConfigIssues> {
        let mut issues = ConfigIssues::new();

        let prefix = NamespacePrefix::new(
            settings.get(&setting_name(instance, PREFIX_ATTRIBUTE)).unwrap_or_default(),
        );
        let url_name = setting_name(instance, URL_ATTRIBUTE);
        let raw_brokers = settings.get(&url_name).unwrap_or_default();
        let broker_list = parse_broker_list(&url_name, &raw_brokers);
        issues.extend(broker_list.issues);

        let tls = if broker_list.requires_tls {
            certificate_context(settings, instance, &mut issues)
        } else {
            None
        };

        if issues.any() {
            tracing::warn!(
                instance = instance.unwrap_or_default(),
                issues = issues.len(),
                "kafka config rejected"
            );
            return Err(issues);
        }
        tracing::debug!(
            instance = instance.unwrap_or_default(),
            brokers = broker_list.brokers.len(),
            tls = tls.is_some(),
            "kafka config loaded"
        );
        Ok(Self {
            prefix,
            brokers: broker_list.brokers,
            tls,
        })
    }

    /// Returns broker `host[:port]` authorities in configured order.
    #[must_use]
    pub fn brokers(&self) -> &[String] {
        &self.brokers
    }

    /// Returns true when connections must use TLS.
    #[must_use]
    pub const fn requires_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Returns the TLS context, if TLS is required.
    #[must_use]
    pub const fn tls_context(&self) -> Option<&TlsContext> {
        self.tls.as_ref()
    }

    /// Returns the rustls client configuration, if TLS is required.
    #[must_use]
    pub fn tls_client_config(&self) -> Option<Arc<ClientConfig>> {
        self.tls.as_ref().map(TlsContext::client_config)
    }

    /// Qualifies a topic or consumer group name with the namespace prefix.
    #[must_use]
    pub fn prefix(&self, name: &str) -> String {
        self.prefix.apply(name)
    }

    /// Returns the configured namespace prefix, possibly empty.
    #[must_use]
    pub fn raw_prefix(&self) -> &str {
        self.prefix.as_str()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Checks certificate settings and builds the TLS context.
///
/// Each missing setting is recorded; construction is then attempted with
/// whatever material is present so malformed material is reported in the
/// same pass.
fn certificate_context(
    settings: &dyn SettingsSource,
    instance: Option<&str>,
    issues: &mut ConfigIssues,
) -> Option<TlsContext> {
    let mut required = |attribute: &str| {
        let name = setting_name(instance, attribute);
        let value = settings.non_empty(&name);
        if value.is_none() {
            issues.add(ConfigIssue::MissingCertificateSetting {
                attribute: name,
            });
        }
        value.unwrap_or_default()
    };
    let client_cert = required(CLIENT_CERT_ATTRIBUTE);
    let client_key = required(CLIENT_CERT_KEY_ATTRIBUTE);
    let trusted_cert = required(TRUSTED_CERT_ATTRIBUTE);

    match TlsContext::new(&trusted_cert, &client_cert, &client_key) {
        Ok(context) => Some(context),
        Err(err) => {
            issues.add(err.into_issue(TLS_CERTIFICATES_ATTRIBUTE));
            None
        }
    }
}
