// crates/kafka-env-config/src/tls.rs
// ============================================================================
// Module: Broker TLS Context
// Description: Trust pool, client identity, and client TLS configuration.
// Purpose: Build the transport-security context handed to broker clients.
// Dependencies: rustls, rustls-pki-types, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`TlsContext`] is built from three PEM blobs: the operator CA, the client
//! certificate, and the client private key. The resulting
//! [`rustls::ClientConfig`] presents the client certificate and installs a
//! [`ChainOnlyVerifier`] in place of standard hostname verification.
//! Invariants:
//! - The trust pool holds at least one certificate.
//! - The client key loads under the crypto provider and matches the
//!   certificate.
//! - The context is immutable once built and safe to share across
//!   connections.
//!
//! Security posture: PEM inputs are untrusted and carry secrets; parse
//! errors are reported without echoing key material.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use rustls::ClientConfig;
use rustls::InconsistentKeys;
use rustls::RootCertStore;
use rustls::crypto::CryptoProvider;
use rustls::sign::CertifiedKey;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::PrivateKeyDer;
use rustls_pki_types::pem::PemObject;
use thiserror::Error;

use crate::issues::ConfigIssue;
use crate::verifier::ChainOnlyVerifier;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while building a [`TlsContext`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TlsError {
    /// The trusted CA PEM could not be parsed into a trust pool.
    #[error("invalid trusted cert: {0}")]
    InvalidTrustedCertificate(String),
    /// The client certificate/key pair is malformed or mismatched.
    #[error("invalid client key pair: {0}")]
    InvalidClientKeyPair(String),
    /// The TLS library rejected the client configuration.
    #[error("tls context error: {0}")]
    Context(String),
}

impl TlsError {
    /// Converts the failure into an issue recorded under `attribute`.
    #[must_use]
    pub fn into_issue(self, attribute: &str) -> ConfigIssue {
        let message = self.to_string();
        let attribute = attribute.to_string();
        match self {
            Self::InvalidTrustedCertificate(_) => ConfigIssue::InvalidTrustedCertificate {
                attribute,
                message,
            },
            Self::InvalidClientKeyPair(_) => ConfigIssue::InvalidClientKeyPair {
                attribute,
                message,
            },
            Self::Context(_) => ConfigIssue::TlsContext {
                attribute,
                message,
            },
        }
    }
}

// ============================================================================
// SECTION: Trust Pool
// ============================================================================

/// Append-only set of CA certificates built from one PEM blob.
#[derive(Debug, Clone)]
pub struct TrustPool {
    /// Parsed trust anchors.
    roots: Arc<RootCertStore>,
    /// DER of every certificate accepted into `roots`, in PEM order.
    anchors: Arc<[CertificateDer<'static>]>,
}

impl TrustPool {
    /// Builds a trust pool from every certificate in `pem`.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::InvalidTrustedCertificate`] when the PEM is
    /// malformed or yields no usable certificate.
    pub fn from_pem(pem: &str) -> Result<Self, TlsError> {
        let certificates = parse_certificates(pem)
            .map_err(|err| TlsError::InvalidTrustedCertificate(err.to_string()))?;
        let mut roots = RootCertStore::empty();
        let mut anchors = Vec::with_capacity(certificates.len());
        let mut ignored = 0_usize;
        for certificate in certificates {
            match roots.add(certificate.clone()) {
                Ok(()) => anchors.push(certificate),
                Err(_) => ignored += 1,
            }
        }
        if anchors.is_empty() {
            return Err(TlsError::InvalidTrustedCertificate(format!(
                "no usable certificates found ({ignored} ignored)"
            )));
        }
        Ok(Self {
            roots: Arc::new(roots),
            anchors: anchors.into(),
        })
    }

    /// Returns the number of trust anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns true when the pool holds no trust anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the underlying root store.
    #[must_use]
    pub const fn roots(&self) -> &Arc<RootCertStore> {
        &self.roots
    }

    /// Returns the DER encoding of each trust anchor.
    #[must_use]
    pub fn anchors(&self) -> &[CertificateDer<'static>] {
        &self.anchors
    }

    /// Returns true when `certificate` is byte-identical to a trust anchor.
    #[must_use]
    pub fn contains(&self, certificate: &CertificateDer<'_>) -> bool {
        self.anchors.iter().any(|anchor| anchor.as_ref() == certificate.as_ref())
    }
}

// ============================================================================
// SECTION: Client Identity
// ============================================================================

/// Client certificate chain and matching private key.
pub struct ClientIdentity {
    /// Client certificate chain, leaf first.
    chain: Vec<CertificateDer<'static>>,
    /// Client private key.
    key: PrivateKeyDer<'static>,
}

impl ClientIdentity {
    /// Parses and cross-checks a client certificate and key.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::InvalidClientKeyPair`] when either PEM is
    /// malformed, the key is unsupported, or the key does not match the
    /// certificate.
    pub fn from_pem(
        cert_pem: &str,
        key_pem: &str,
        provider: &CryptoProvider,
    ) -> Result<Self, TlsError> {
        let chain = parse_certificates(cert_pem)
            .map_err(|err| TlsError::InvalidClientKeyPair(format!("client cert: {err}")))?;
        if chain.is_empty() {
            return Err(TlsError::InvalidClientKeyPair(
                "client cert: no certificates found".to_string(),
            ));
        }
        let key = PrivateKeyDer::from_pem_slice(key_pem.as_bytes())
            .map_err(|err| TlsError::InvalidClientKeyPair(format!("client key: {err}")))?;
        let signing_key = provider
            .key_provider
            .load_private_key(key.clone_key())
            .map_err(|err| TlsError::InvalidClientKeyPair(format!("client key: {err}")))?;
        match CertifiedKey::new(chain.clone(), signing_key).keys_match() {
            Ok(()) | Err(rustls::Error::InconsistentKeys(InconsistentKeys::Unknown)) => {}
            Err(err) => return Err(TlsError::InvalidClientKeyPair(err.to_string())),
        }
        Ok(Self {
            chain,
            key,
        })
    }

    /// Returns the certificate chain.
    #[must_use]
    pub fn chain(&self) -> &[CertificateDer<'static>] {
        &self.chain
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: TLS Context
// ============================================================================

/// Immutable client TLS context for broker connections.
#[derive(Debug, Clone)]
pub struct TlsContext {
    /// Client configuration handed to broker clients.
    client_config: Arc<ClientConfig>,
    /// Verifier installed in the client configuration.
    verifier: Arc<ChainOnlyVerifier>,
    /// Trust pool the verifier checks against.
    trust_pool: TrustPool,
}

impl TlsContext {
    /// Builds a context with the process-default crypto provider, falling
    /// back to aws-lc-rs when none is installed.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError`] when any PEM input is invalid.
    pub fn new(trusted_cert: &str, client_cert: &str, client_key: &str) -> Result<Self, TlsError> {
        Self::with_provider(trusted_cert, client_cert, client_key, default_provider())
    }

    /// Builds a context using `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError`] when any PEM input is invalid or the provider
    /// cannot produce a client configuration.
    pub fn with_provider(
        trusted_cert: &str,
        client_cert: &str,
        client_key: &str,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, TlsError> {
        let trust_pool = TrustPool::from_pem(trusted_cert)?;
        let identity = ClientIdentity::from_pem(client_cert, client_key, &provider)?;
        let verifier = Arc::new(ChainOnlyVerifier::new(&trust_pool, Arc::clone(&provider)));
        let client_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|err| TlsError::Context(err.to_string()))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::clone(&verifier) as _)
            .with_client_auth_cert(identity.chain, identity.key)
            .map_err(|err| TlsError::InvalidClientKeyPair(err.to_string()))?;
        tracing::debug!(trust_anchors = trust_pool.len(), "built broker tls context");
        Ok(Self {
            client_config: Arc::new(client_config),
            verifier,
            trust_pool,
        })
    }

    /// Returns the shared client configuration.
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.client_config)
    }

    /// Returns the installed peer verifier.
    #[must_use]
    pub fn peer_verifier(&self) -> &ChainOnlyVerifier {
        &self.verifier
    }

    /// Returns the trust pool.
    #[must_use]
    pub const fn trust_pool(&self) -> &TrustPool {
        &self.trust_pool
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the installed process-default provider, or aws-lc-rs.
fn default_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Parses every CERTIFICATE block in `pem`.
fn parse_certificates(
    pem: &str,
) -> Result<Vec<CertificateDer<'static>>, rustls_pki_types::pem::Error> {
    CertificateDer::pem_slice_iter(pem.as_bytes()).collect()
}
