// crates/kafka-env-config/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared certificate fixtures for kafka-env-config tests.
// Purpose: Generate CA, broker, and client material at test time.
// Dependencies: rcgen, rustls
// ============================================================================

//! ## Overview
//! Provides runtime-generated certificate material for integration tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some suites.")]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use kafka_env_config::MapSettings;
use rcgen::BasicConstraints;
use rcgen::CertificateParams;
use rcgen::DnType;
use rcgen::IsCa;
use rcgen::Issuer;
use rcgen::KeyPair;
use rcgen::KeyUsagePurpose;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::PrivateKeyDer;
use rustls::pki_types::PrivatePkcs8KeyDer;

// ============================================================================
// SECTION: Certificate Fixtures
// ============================================================================

/// Hostname embedded in broker certificates.
pub const BROKER_HOSTNAME: &str = "broker-1.kafka.internal";

/// Test certificate authority.
pub struct Authority {
    /// CA certificate PEM.
    pub cert_pem: String,
    /// CA certificate DER.
    pub cert_der: CertificateDer<'static>,
    /// Issuer used to sign leaves.
    issuer: Issuer<'static, KeyPair>,
}

/// Leaf certificate with its key in PEM and DER forms.
pub struct Leaf {
    /// Certificate PEM.
    pub cert_pem: String,
    /// PKCS#8 key PEM.
    pub key_pem: String,
    /// Certificate DER.
    pub cert_der: CertificateDer<'static>,
    /// PKCS#8 key DER.
    pub key_der: Vec<u8>,
}

impl Leaf {
    /// Returns the private key as a rustls key.
    pub fn private_key(&self) -> PrivateKeyDer<'static> {
        PrivateKeyDer::from(PrivatePkcs8KeyDer::from(self.key_der.clone()))
    }
}

impl Authority {
    /// Creates a new self-signed CA.
    pub fn new(common_name: &str) -> Self {
        let key = KeyPair::generate().expect("ca key");
        let mut params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.distinguished_name.push(DnType::CommonName, common_name);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let cert = params.self_signed(&key).expect("ca cert");
        Self {
            cert_pem: cert.pem(),
            cert_der: cert.der().clone(),
            issuer: Issuer::new(params, key),
        }
    }

    /// Issues a leaf certificate for `BROKER_HOSTNAME`.
    pub fn issue(&self, common_name: &str) -> Leaf {
        let key = KeyPair::generate().expect("leaf key");
        let mut params =
            CertificateParams::new(vec![BROKER_HOSTNAME.to_string()]).expect("leaf params");
        params.distinguished_name.push(DnType::CommonName, common_name);
        let cert = params.signed_by(&key, &self.issuer).expect("leaf cert");
        Leaf {
            cert_pem: cert.pem(),
            key_pem: key.serialize_pem(),
            cert_der: cert.der().clone(),
            key_der: key.serialize_der(),
        }
    }
}

/// Generates a self-signed leaf that chains to nothing.
pub fn self_signed() -> Leaf {
    let rcgen::CertifiedKey {
        cert,
        signing_key,
    } = rcgen::generate_simple_self_signed(vec![BROKER_HOSTNAME.to_string()])
        .expect("self-signed cert");
    Leaf {
        cert_pem: cert.pem(),
        key_pem: signing_key.serialize_pem(),
        cert_der: cert.der().clone(),
        key_der: signing_key.serialize_der(),
    }
}

// ============================================================================
// SECTION: Settings Fixtures
// ============================================================================

/// Returns default-instance settings with full TLS material.
pub fn tls_settings(authority: &Authority, client: &Leaf, url: &str) -> MapSettings {
    MapSettings::new()
        .with("KAFKA_URL", url)
        .with("KAFKA_PREFIX", "tenant-7.")
        .with("KAFKA_CLIENT_CERT", client.cert_pem.clone())
        .with("KAFKA_CLIENT_CERT_KEY", client.key_pem.clone())
        .with("KAFKA_TRUSTED_CERT", authority.cert_pem.clone())
}
