//! Platform trust store loading.
//!
//! Loads the same CA certificates OpenSSL would use, discovered via
//! `openssl-probe` and environment variables, and indexes them by raw
//! subject name for issuer lookups during chain anchoring.

use crate::source::parse_pem_certificates;
use crate::ChainCheckError;
use std::collections::HashMap;
use std::path::PathBuf;
use x509_parser::prelude::*;

/// Well-known CA bundle file paths, in order of preference.
const KNOWN_CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt", // Debian/Ubuntu
    "/etc/pki/tls/certs/ca-bundle.crt",   // RHEL/CentOS/Fedora
    "/etc/ssl/ca-bundle.pem",             // openSUSE
    "/etc/ssl/cert.pem",                  // macOS, Alpine
];

/// A set of trusted root certificates, indexed by subject.
pub struct TrustStore {
    /// Map from raw DER-encoded subject name to DER-encoded certificates.
    roots_by_subject: HashMap<Vec<u8>, Vec<Vec<u8>>>,
    count: usize,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("count", &self.count)
            .finish()
    }
}

impl TrustStore {
    /// Create an empty trust store.
    pub fn new() -> Self {
        TrustStore {
            roots_by_subject: HashMap::new(),
            count: 0,
        }
    }

    /// Load the platform trust store.
    ///
    /// Searches the same locations OpenSSL does:
    /// 1. `SSL_CERT_FILE` environment variable
    /// 2. Path discovered by `openssl-probe`
    /// 3. Well-known bundle file paths
    pub fn system() -> Result<Self, ChainCheckError> {
        let Some(bundle_path) = find_system_ca_bundle() else {
            return Err(ChainCheckError::TrustStore(
                "no system CA bundle found".into(),
            ));
        };
        let data = std::fs::read(&bundle_path).map_err(|e| {
            ChainCheckError::TrustStore(format!("{}: {}", bundle_path.display(), e))
        })?;
        let store = Self::from_pem(&data)?;
        tracing::debug!(
            path = %bundle_path.display(),
            roots = store.len(),
            "loaded system trust store"
        );
        Ok(store)
    }

    /// Build a trust store from a PEM bundle.
    pub fn from_pem(pem_data: &[u8]) -> Result<Self, ChainCheckError> {
        let mut store = TrustStore::new();
        for der in parse_pem_certificates(pem_data)? {
            // Some bundles carry entries that do not parse as
            // certificates; skip them.
            if store.add_der(&der).is_err() {
                tracing::warn!("skipping unparsable certificate in CA bundle");
            }
        }
        if store.is_empty() {
            return Err(ChainCheckError::TrustStore(
                "no usable certificates in CA bundle".into(),
            ));
        }
        Ok(store)
    }

    /// Add a DER-encoded root certificate.
    pub fn add_der(&mut self, der: &[u8]) -> Result<(), ChainCheckError> {
        let (_, x509) = X509Certificate::from_der(der)
            .map_err(|e| ChainCheckError::Der(format!("{}", e)))?;
        let subject_raw = x509.subject().as_raw().to_vec();
        self.roots_by_subject
            .entry(subject_raw)
            .or_default()
            .push(der.to_vec());
        self.count += 1;
        Ok(())
    }

    /// Roots whose subject equals the given raw issuer name.
    pub(crate) fn find_by_subject(&self, subject_raw: &[u8]) -> Option<&Vec<Vec<u8>>> {
        self.roots_by_subject.get(subject_raw)
    }

    /// Whether this exact certificate is a trust anchor.
    pub fn contains(&self, der: &[u8]) -> bool {
        if let Ok((_, x509)) = X509Certificate::from_der(der) {
            if let Some(roots) = self.find_by_subject(x509.subject().as_raw()) {
                return roots.iter().any(|r| r == der);
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for TrustStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the platform CA bundle path (same location OpenSSL uses).
pub fn find_system_ca_bundle() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SSL_CERT_FILE") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    let probe = openssl_probe::probe();
    if let Some(file) = probe.cert_file {
        let path = PathBuf::from(&file);
        if path.exists() {
            return Some(path);
        }
    }

    for candidate in KNOWN_CA_BUNDLE_PATHS {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}
