//! Chain validation: runs the check registry over an acquired chain
//! and aggregates the outcomes into a [`ValidationReport`].

mod checks;
pub(crate) mod helpers;
mod trust_store;

pub use trust_store::{find_system_ca_bundle, TrustStore};

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;
use x509_parser::prelude::*;

use crate::result::{ChainCertInfo, ValidationReport};
use crate::revocation::{HttpTransport, RevocationTransport};
use crate::ChainCheckError;
use helpers::{dn_oneline, serial_hex};

/// Certification paths longer than this are treated as broken.
const MAX_CHAIN_DEPTH: usize = 32;

/// Knobs for a validation run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Consult CRL distribution points. On by default.
    pub check_crl: bool,
    /// Query OCSP responders. Off by default.
    pub check_ocsp: bool,
    /// Timeout applied to each revocation fetch made through
    /// [`validate_chain_http`]. Callers of [`validate_chain`] supply
    /// their own transport and configure its timeout there.
    pub fetch_timeout: Duration,
    /// Evaluate validity as of this Unix timestamp instead of now.
    pub at_time: Option<i64>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            check_crl: true,
            check_ocsp: false,
            fetch_timeout: Duration::from_secs(10),
            at_time: None,
        }
    }
}

fn now_unix() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(_) => 0,
    }
}

/// [`validate_chain`] with a blocking HTTP transport for revocation
/// fetches, bounded by `options.fetch_timeout`.
pub fn validate_chain_http(
    chain_der: &[Vec<u8>],
    hostname: &str,
    trust_store: &TrustStore,
    options: &ValidateOptions,
) -> Result<ValidationReport, ChainCheckError> {
    let transport = HttpTransport::new(options.fetch_timeout);
    validate_chain(chain_der, hostname, trust_store, &transport, options)
}

/// Run every registered check against `chain_der`, ordered leaf first.
///
/// Chain-wide checks (hostname, chain trust) run once; per-certificate
/// checks run at each depth. The report is valid iff no check failed.
/// Returns an error only when the input cannot be examined at all, not
/// when checks fail.
pub fn validate_chain(
    chain_der: &[Vec<u8>],
    hostname: &str,
    trust_store: &TrustStore,
    transport: &dyn RevocationTransport,
    options: &ValidateOptions,
) -> Result<ValidationReport, ChainCheckError> {
    if chain_der.is_empty() {
        return Err(ChainCheckError::Validation(
            "no certificates to validate".to_string(),
        ));
    }

    let mut parsed = Vec::with_capacity(chain_der.len());
    for (depth, der) in chain_der.iter().enumerate() {
        let (_, cert) = X509Certificate::from_der(der).map_err(|e| {
            ChainCheckError::Der(format!("certificate {} in chain: {}", depth, e))
        })?;
        parsed.push((der.as_slice(), cert));
    }

    let subjects: Vec<String> = parsed
        .iter()
        .map(|(_, cert)| dn_oneline(cert.subject()))
        .collect();
    let now_ts = options.at_time.unwrap_or_else(now_unix);
    debug!(
        certs = parsed.len(),
        hostname, at = now_ts, "validating chain"
    );

    let chain_info: Vec<ChainCertInfo> = parsed
        .iter()
        .enumerate()
        .map(|(depth, (_, cert))| ChainCertInfo {
            depth,
            subject: subjects[depth].clone(),
            serial: serial_hex(cert),
        })
        .collect();

    let mut results = Vec::new();
    results.push(checks::check_hostname(&parsed[0].1, hostname));
    results.push(checks::check_chain_trust(
        &parsed,
        &subjects,
        trust_store,
        now_ts,
    ));

    for (depth, (_, cert)) in parsed.iter().enumerate() {
        let subject = subjects[depth].as_str();
        let issuer = parsed.get(depth + 1).map(|(_, c)| c);

        results.push(checks::check_subject(subject, depth));
        results.push(checks::check_not_before(cert, now_ts, depth));
        results.push(checks::check_not_after(cert, now_ts, depth));
        results.push(checks::check_issuer(cert, issuer, subject, depth));
        results.push(checks::check_basic_constraints(cert, depth));

        if options.check_crl {
            results.push(checks::check_crl_revocation(cert, subject, transport, depth));
        } else {
            results.push(crate::result::CheckResult::skip(
                crate::result::CheckKind::CrlRevocation,
                Some(depth),
                "crlRevocation: checking disabled",
            ));
        }

        if options.check_ocsp {
            results.push(checks::check_ocsp_revocation(
                cert, issuer, subject, transport, depth,
            ));
        } else {
            results.push(crate::result::CheckResult::skip(
                crate::result::CheckKind::OcspRevocation,
                Some(depth),
                "ocspRevocation: checking disabled",
            ));
        }

        results.push(checks::check_ca_flag(cert, depth));
    }

    Ok(ValidationReport {
        hostname: hostname.to_string(),
        chain: chain_info,
        results,
    })
}
