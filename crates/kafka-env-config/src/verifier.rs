// crates/kafka-env-config/src/verifier.rs
// ============================================================================
// Module: Peer Certificate Verifier
// Description: Chain-only verification of broker certificates.
// Purpose: Authenticate brokers whose certificates do not match their hostnames.
// Dependencies: rustls, thiserror, tracing
// ============================================================================

//! ## Overview
//! Managed broker certificates are issued by an operator CA but are not bound
//! to the broker hostnames, so standard hostname verification cannot be used.
//! [`ChainOnlyVerifier`] replaces it: every certificate the peer presents is
//! parsed and verified, independently, against the trust pool alone. A
//! presented certificate that is itself one of the trust anchors is accepted
//! as-is, so brokers may send the operator CA after their leaf.
//! Invariants:
//! - The first failing certificate fails the whole handshake; later
//!   certificates are not inspected.
//! - The server name is never consulted.
//! - An empty presentation is rejected.
//!
//! Security posture: this verifier is the only authentication of the broker's
//! identity; it must fail closed on anything it cannot verify.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use rustls::DigitallySignedStruct;
use rustls::SignatureScheme;
use rustls::client::danger::HandshakeSignatureValid;
use rustls::client::danger::ServerCertVerified;
use rustls::client::danger::ServerCertVerifier;
use rustls::client::verify_server_cert_signed_by_trust_anchor;
use rustls::crypto::CryptoProvider;
use rustls::crypto::verify_tls12_signature;
use rustls::crypto::verify_tls13_signature;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::ServerName;
use rustls::pki_types::UnixTime;
use rustls::server::ParsedCertificate;
use thiserror::Error;

use crate::tls::TrustPool;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a peer-presented certificate list is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeerVerificationError {
    /// The peer presented no certificates.
    #[error("peer presented no certificates")]
    NoCertificates,
    /// A presented certificate is not valid DER X.509.
    #[error("peer certificate {index} could not be parsed: {source}")]
    Parse {
        /// Position of the certificate in the presented list.
        index: usize,
        /// Underlying parse failure.
        source: rustls::Error,
    },
    /// A presented certificate does not chain to the trust pool.
    #[error("peer certificate {index} failed verification: {source}")]
    Untrusted {
        /// Position of the certificate in the presented list.
        index: usize,
        /// Underlying verification failure.
        source: rustls::Error,
    },
}

impl PeerVerificationError {
    /// Converts the failure into the TLS library error that aborts the handshake.
    #[must_use]
    pub fn into_tls_error(self) -> rustls::Error {
        match self {
            Self::NoCertificates => rustls::Error::NoCertificatesPresented,
            Self::Parse {
                source, ..
            }
            | Self::Untrusted {
                source, ..
            } => source,
        }
    }
}

// ============================================================================
// SECTION: Peer Verifier
// ============================================================================

/// Capability that decides whether a peer's certificates are acceptable.
pub trait PeerVerifier: fmt::Debug + Send + Sync {
    /// Verifies every certificate in `presented` at time `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PeerVerificationError`] for the first certificate that
    /// cannot be parsed or verified.
    fn verify_presented(
        &self,
        presented: &[CertificateDer<'_>],
        now: UnixTime,
    ) -> Result<(), PeerVerificationError>;
}

/// Verifies that each presented certificate chains to the trust pool,
/// ignoring hostnames.
pub struct ChainOnlyVerifier {
    /// Trust pool; its anchors are the only root set.
    pool: TrustPool,
    /// Provider supplying signature verification algorithms.
    provider: Arc<CryptoProvider>,
}

impl ChainOnlyVerifier {
    /// Creates a verifier over `pool` using `provider`'s algorithms.
    #[must_use]
    pub fn new(pool: &TrustPool, provider: Arc<CryptoProvider>) -> Self {
        Self {
            pool: pool.clone(),
            provider,
        }
    }

    /// Verifies one certificate against the roots with no intermediates.
    ///
    /// A certificate identical to a trust anchor is trusted without a chain
    /// walk; webpki would otherwise refuse it as a CA used as an end entity.
    fn verify_one(
        &self,
        index: usize,
        certificate: &CertificateDer<'_>,
        now: UnixTime,
    ) -> Result<(), PeerVerificationError> {
        let parsed = ParsedCertificate::try_from(certificate).map_err(|source| {
            PeerVerificationError::Parse {
                index,
                source,
            }
        })?;
        if self.pool.contains(certificate) {
            return Ok(());
        }
        verify_server_cert_signed_by_trust_anchor(
            &parsed,
            self.pool.roots(),
            &[],
            now,
            self.provider.signature_verification_algorithms.all,
        )
        .map_err(|source| PeerVerificationError::Untrusted {
            index,
            source,
        })
    }
}

impl fmt::Debug for ChainOnlyVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainOnlyVerifier")
            .field("roots", &self.pool.len())
            .finish_non_exhaustive()
    }
}

impl PeerVerifier for ChainOnlyVerifier {
    fn verify_presented(
        &self,
        presented: &[CertificateDer<'_>],
        now: UnixTime,
    ) -> Result<(), PeerVerificationError> {
        if presented.is_empty() {
            return Err(PeerVerificationError::NoCertificates);
        }
        for (index, certificate) in presented.iter().enumerate() {
            if let Err(err) = self.verify_one(index, certificate, now) {
                tracing::warn!(index, error = %err, "peer certificate rejected");
                return Err(err);
            }
            tracing::debug!(index, "peer certificate verified");
        }
        Ok(())
    }
}

impl ServerCertVerifier for ChainOnlyVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let mut presented = Vec::with_capacity(intermediates.len() + 1);
        presented.push(end_entity.clone());
        presented.extend(intermediates.iter().cloned());
        self.verify_presented(&presented, now).map_err(PeerVerificationError::into_tls_error)?;
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider.signature_verification_algorithms.supported_schemes()
    }
}
