//! chaincheck-lib: TLS certificate chain acquisition and validation.
//!
//! Retrieves a peer's certificate chain from a live TLS endpoint or a
//! local PEM bundle, runs it through an ordered set of trust checks
//! (hostname, chain anchoring, validity dates, issuer linkage, basic
//! constraints, CRL and OCSP revocation), and aggregates the results
//! into a single pass/fail report.

pub mod encode;
mod oid;
pub mod result;
pub mod revocation;
pub mod source;
pub mod validate;

#[cfg(test)]
pub(crate) mod testdata;

pub use encode::{chain_to_pem, der_to_pem, encode_chain, Encoding};
pub use result::{ChainCertInfo, CheckKind, CheckResult, CheckStatus, ValidationReport};
pub use revocation::{HttpTransport, RevocationTransport};
pub use source::{
    parse_pem_certificates, source_for_target, CertificateSource, FileSource, PeerChain, TlsSource,
};
pub use validate::{
    find_system_ca_bundle, validate_chain, validate_chain_http, TrustStore, ValidateOptions,
};

/// Errors returned by chaincheck-lib.
///
/// These cover acquisition and setup failures only. A check that does
/// not hold (expired certificate, revoked serial, hostname mismatch) is
/// never an error; it is a `Fail` entry in the [`ValidationReport`].
#[derive(Debug, thiserror::Error)]
pub enum ChainCheckError {
    #[error("Failed to acquire certificate chain: {0}")]
    Acquire(String),

    #[error("Invalid PEM format: {0}")]
    Pem(String),

    #[error("Invalid DER format: {0}")]
    Der(String),

    #[error("Trust store error: {0}")]
    TrustStore(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Revocation lookup error: {0}")]
    Revocation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
