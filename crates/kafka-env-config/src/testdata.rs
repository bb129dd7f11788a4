// crates/kafka-env-config/src/testdata.rs
// ============================================================================
// Module: Test Certificate Material
// Description: Runtime-generated CA, leaf, and self-signed certificates.
// Purpose: Give unit tests real PEM/DER inputs without checked-in keys.
// Dependencies: rcgen, rustls
// ============================================================================

//! ## Overview
//! Generates certificate material with `rcgen` for the TLS unit tests.

#![allow(
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only fixtures panic on generation failure."
)]

use rcgen::BasicConstraints;
use rcgen::CertificateParams;
use rcgen::DnType;
use rcgen::IsCa;
use rcgen::Issuer;
use rcgen::KeyPair;
use rcgen::KeyUsagePurpose;
use rcgen::date_time_ymd;
use rustls::pki_types::CertificateDer;

/// Hostname placed in leaf certificates; never matches the dialed name.
pub(crate) const LEAF_HOSTNAME: &str = "broker-1.kafka.internal";

/// Test certificate authority able to issue leaf certificates.
pub(crate) struct TestCa {
    pub(crate) cert_pem: String,
    pub(crate) cert_der: CertificateDer<'static>,
    issuer: Issuer<'static, KeyPair>,
}

/// A certificate plus its private key.
pub(crate) struct TestLeaf {
    pub(crate) cert_pem: String,
    pub(crate) key_pem: String,
    pub(crate) cert_der: CertificateDer<'static>,
}

impl TestCa {
    pub(crate) fn new(common_name: &str) -> Self {
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

    pub(crate) fn issue(&self, common_name: &str) -> TestLeaf {
        let params = leaf_params(common_name);
        self.sign(&params)
    }

    pub(crate) fn issue_expired(&self, common_name: &str) -> TestLeaf {
        let mut params = leaf_params(common_name);
        params.not_before = date_time_ymd(2000, 1, 1);
        params.not_after = date_time_ymd(2001, 1, 1);
        self.sign(&params)
    }

    fn sign(&self, params: &CertificateParams) -> TestLeaf {
        let key = KeyPair::generate().expect("leaf key");
        let cert = params.signed_by(&key, &self.issuer).expect("leaf cert");
        TestLeaf {
            cert_pem: cert.pem(),
            key_pem: key.serialize_pem(),
            cert_der: cert.der().clone(),
        }
    }
}

fn leaf_params(common_name: &str) -> CertificateParams {
    let mut params =
        CertificateParams::new(vec![LEAF_HOSTNAME.to_string()]).expect("leaf params");
    params.distinguished_name.push(DnType::CommonName, common_name);
    params
}

/// Self-signed certificate that chains to nothing.
pub(crate) fn self_signed() -> TestLeaf {
    let rcgen::CertifiedKey {
        cert,
        signing_key,
    } = rcgen::generate_simple_self_signed(vec![LEAF_HOSTNAME.to_string()])
        .expect("self-signed cert");
    TestLeaf {
        cert_pem: cert.pem(),
        key_pem: signing_key.serialize_pem(),
        cert_der: cert.der().clone(),
    }
}
