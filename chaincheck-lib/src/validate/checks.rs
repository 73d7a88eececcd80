//! The fixed registry of trust checks.
//!
//! Each function examines one property and returns a fresh
//! [`CheckResult`]. Chain-wide checks run once; per-certificate checks
//! run for every chain position, leaf to root. A check receives only
//! the collaborators its contract needs: the issuer slot, the
//! hostname, the trust store, or the revocation transport.

use super::helpers::{
    crl_distribution_urls, dn_oneline, hostname_matches, is_ca, ocsp_responder_urls,
    presented_dns_names,
};
use super::{TrustStore, MAX_CHAIN_DEPTH};
use crate::result::{CheckKind, CheckResult};
use crate::revocation::ocsp::{self, CertStatus};
use crate::revocation::{crl, RevocationTransport};
use x509_parser::prelude::*;

/// RFC 6125 hostname match against the leaf certificate.
pub(crate) fn check_hostname(leaf: &X509Certificate, hostname: &str) -> CheckResult {
    if hostname.is_empty() {
        return CheckResult::skip(CheckKind::Hostname, None, "hostname: no hostname to verify");
    }
    if hostname_matches(leaf, hostname) {
        CheckResult::pass(
            CheckKind::Hostname,
            None,
            format!("hostname: '{}' matches certificate", hostname),
        )
    } else {
        CheckResult::fail(
            CheckKind::Hostname,
            None,
            format!(
                "hostname: '{}' does not match certificate names: [{}]",
                hostname,
                presented_dns_names(leaf).join(", ")
            ),
        )
    }
}

fn time_valid(cert: &X509Certificate, now_ts: i64) -> bool {
    now_ts >= cert.validity().not_before.timestamp()
        && now_ts <= cert.validity().not_after.timestamp()
}

/// Walk from the leaf toward a trust-store root through the presented
/// chain. Every hop requires subject/issuer linkage and a valid
/// signature; every certificate on the walk must be within its
/// validity period.
pub(crate) fn check_chain_trust(
    parsed: &[(&[u8], X509Certificate)],
    subjects: &[String],
    trust_store: &TrustStore,
    now_ts: i64,
) -> CheckResult {
    if trust_store.is_empty() {
        return CheckResult::fail(CheckKind::ChainTrust, None, "chain: trust store is empty");
    }

    let mut used = vec![false; parsed.len()];
    used[0] = true;
    let mut current = 0usize;

    for _ in 0..MAX_CHAIN_DEPTH {
        let (der, cert) = &parsed[current];
        let subject = subjects.get(current).map(String::as_str).unwrap_or("");

        if !time_valid(cert, now_ts) {
            return CheckResult::fail(
                CheckKind::ChainTrust,
                None,
                format!(
                    "chain: certificate '{}' is outside its validity period",
                    subject
                ),
            );
        }

        if trust_store.contains(der) {
            return CheckResult::pass(
                CheckKind::ChainTrust,
                None,
                format!("chain: '{}' is itself a trust anchor", subject),
            );
        }

        let issuer_raw = cert.issuer().as_raw();
        if let Some(candidates) = trust_store.find_by_subject(issuer_raw) {
            for root_der in candidates {
                let Ok((_, root)) = X509Certificate::from_der(root_der) else {
                    continue;
                };
                if time_valid(&root, now_ts)
                    && cert.verify_signature(Some(root.public_key())).is_ok()
                {
                    return CheckResult::pass(
                        CheckKind::ChainTrust,
                        None,
                        format!(
                            "chain: anchored to trusted root '{}'",
                            dn_oneline(root.subject())
                        ),
                    );
                }
            }
        }

        // Walk up within the presented chain.
        let mut next = None;
        for (j, (_, candidate)) in parsed.iter().enumerate() {
            if used[j] || candidate.subject().as_raw() != issuer_raw {
                continue;
            }
            if cert.verify_signature(Some(candidate.public_key())).is_ok() {
                next = Some(j);
                break;
            }
        }
        match next {
            Some(j) => {
                used[j] = true;
                current = j;
            }
            None => {
                return CheckResult::fail(
                    CheckKind::ChainTrust,
                    None,
                    format!(
                        "chain: no trusted root found for issuer '{}'",
                        dn_oneline(cert.issuer())
                    ),
                );
            }
        }
    }

    CheckResult::fail(
        CheckKind::ChainTrust,
        None,
        "chain: maximum verification depth exceeded",
    )
}

/// Informational: records the subject, never fails.
pub(crate) fn check_subject(subject: &str, depth: usize) -> CheckResult {
    CheckResult::skip(CheckKind::Subject, Some(depth), format!("subject: {}", subject))
}

/// RFC 5280 Section 4.1.2.5: the certificate must already be valid.
pub(crate) fn check_not_before(cert: &X509Certificate, now_ts: i64, depth: usize) -> CheckResult {
    let not_before = cert.validity().not_before;
    if now_ts < not_before.timestamp() {
        CheckResult::fail(
            CheckKind::NotBefore,
            Some(depth),
            "notBefore: current datetime is before cert validity start time",
        )
    } else {
        CheckResult::pass(
            CheckKind::NotBefore,
            Some(depth),
            format!("notBefore: {}", not_before),
        )
    }
}

/// RFC 5280 Section 4.1.2.5: the certificate must not be expired.
pub(crate) fn check_not_after(cert: &X509Certificate, now_ts: i64, depth: usize) -> CheckResult {
    let not_after = cert.validity().not_after;
    if now_ts > not_after.timestamp() {
        CheckResult::fail(
            CheckKind::NotAfter,
            Some(depth),
            "notAfter: current datetime is after cert validity end time",
        )
    } else {
        CheckResult::pass(
            CheckKind::NotAfter,
            Some(depth),
            format!("notAfter: {}", not_after),
        )
    }
}

/// RFC 5280 Section 4.1.2.4: issuer name must match the next
/// certificate's subject, and the signature must verify under its key.
/// The terminal certificate has no in-chain issuer to check against.
pub(crate) fn check_issuer(
    cert: &X509Certificate,
    issuer: Option<&X509Certificate>,
    subject: &str,
    depth: usize,
) -> CheckResult {
    let Some(issuer) = issuer else {
        return CheckResult::skip(
            CheckKind::Issuer,
            Some(depth),
            "issuer: last certificate in chain, nothing to check against",
        );
    };

    let cert_issuer = dn_oneline(cert.issuer());
    let issuer_subject = dn_oneline(issuer.subject());

    if cert.issuer().as_raw() != issuer.subject().as_raw() {
        return CheckResult::fail(
            CheckKind::Issuer,
            Some(depth),
            format!(
                "issuer: issuer of '{}' is not correct (expected: '{}', actual: '{}')",
                subject, cert_issuer, issuer_subject
            ),
        );
    }

    if let Err(e) = cert.verify_signature(Some(issuer.public_key())) {
        return CheckResult::fail(
            CheckKind::Issuer,
            Some(depth),
            format!(
                "issuer: signature on '{}' is not a valid signature from '{}' ({})",
                subject, issuer_subject, e
            ),
        );
    }

    CheckResult::pass(CheckKind::Issuer, Some(depth), format!("issuer: {}", cert_issuer))
}

/// RFC 5280 Section 4.2.1.9: the extension must parse, be internally
/// consistent, and assert CA capability at issuer positions.
pub(crate) fn check_basic_constraints(cert: &X509Certificate, depth: usize) -> CheckResult {
    match cert.basic_constraints() {
        Err(_) => CheckResult::fail(
            CheckKind::BasicConstraints,
            Some(depth),
            "basicConstraints: extension could not be parsed",
        ),
        Ok(None) => {
            if depth > 0 {
                return CheckResult::fail(
                    CheckKind::BasicConstraints,
                    Some(depth),
                    "basicConstraints: certificate acts as an issuer but extension is not present",
                );
            }
            CheckResult::pass(
                CheckKind::BasicConstraints,
                Some(depth),
                "basicConstraints: extension not present",
            )
        }
        Ok(Some(bc)) => {
            let constraints = bc.value;
            if constraints.path_len_constraint.is_some() && !constraints.ca {
                return CheckResult::fail(
                    CheckKind::BasicConstraints,
                    Some(depth),
                    "basicConstraints: pathLenConstraint present but CA flag is not set",
                );
            }
            if depth > 0 && !constraints.ca {
                return CheckResult::fail(
                    CheckKind::BasicConstraints,
                    Some(depth),
                    "basicConstraints: certificate acts as an issuer but CA flag is not set",
                );
            }
            let description = match constraints.path_len_constraint {
                Some(pathlen) => format!(
                    "basicConstraints: CA:{}, pathlen:{}",
                    constraints.ca, pathlen
                ),
                None => format!("basicConstraints: CA:{}", constraints.ca),
            };
            CheckResult::pass(CheckKind::BasicConstraints, Some(depth), description)
        }
    }
}

/// CRL revocation lookup, fail-closed: any fetch or parse problem is a
/// failure, not a skip.
pub(crate) fn check_crl_revocation(
    cert: &X509Certificate,
    subject: &str,
    transport: &dyn RevocationTransport,
    depth: usize,
) -> CheckResult {
    let urls = crl_distribution_urls(cert);
    if urls.is_empty() {
        return CheckResult::skip(
            CheckKind::CrlRevocation,
            Some(depth),
            "crlRevocation: no CRL distribution points",
        );
    }

    for url in &urls {
        let crl_der = match transport.get(url) {
            Ok(body) => body,
            Err(e) => {
                return CheckResult::fail(
                    CheckKind::CrlRevocation,
                    Some(depth),
                    format!("crlRevocation: failed to fetch CRL from '{}': {}", url, e),
                );
            }
        };
        match crl::lookup_serial(cert, &crl_der) {
            Ok(Some(reason)) => {
                return CheckResult::fail(
                    CheckKind::CrlRevocation,
                    Some(depth),
                    format!(
                        "crlRevocation: cert '{}' was revoked via CRL (reason: {})",
                        subject, reason
                    ),
                );
            }
            Ok(None) => {}
            Err(e) => {
                return CheckResult::fail(
                    CheckKind::CrlRevocation,
                    Some(depth),
                    format!("crlRevocation: CRL from '{}' is unusable: {}", url, e),
                );
            }
        }
    }

    CheckResult::pass(
        CheckKind::CrlRevocation,
        Some(depth),
        "crlRevocation: serial not present on any listed CRL",
    )
}

/// OCSP revocation lookup, fail-closed for transport, parse, and
/// authentication problems. Skips when no issuer or responder is
/// available.
pub(crate) fn check_ocsp_revocation(
    cert: &X509Certificate,
    issuer: Option<&X509Certificate>,
    subject: &str,
    transport: &dyn RevocationTransport,
    depth: usize,
) -> CheckResult {
    let Some(issuer) = issuer else {
        return CheckResult::skip(
            CheckKind::OcspRevocation,
            Some(depth),
            "ocspRevocation: no issuer certificate available",
        );
    };

    let urls = ocsp_responder_urls(cert);
    if urls.is_empty() {
        return CheckResult::skip(
            CheckKind::OcspRevocation,
            Some(depth),
            "ocspRevocation: no OCSP responder listed",
        );
    }

    let request = ocsp::build_request(cert, issuer);

    for url in &urls {
        let body = match transport.post(
            url,
            "application/ocsp-request",
            "application/ocsp-response",
            &request,
        ) {
            Ok(body) => body,
            Err(e) => {
                return CheckResult::fail(
                    CheckKind::OcspRevocation,
                    Some(depth),
                    format!("ocspRevocation: query to '{}' failed: {}", url, e),
                );
            }
        };
        match ocsp::parse_response(&body, issuer, cert.raw_serial()) {
            Ok(CertStatus::Good) => {}
            Ok(CertStatus::Revoked) => {
                return CheckResult::fail(
                    CheckKind::OcspRevocation,
                    Some(depth),
                    format!("ocspRevocation: cert '{}' was revoked via OCSP", subject),
                );
            }
            Ok(CertStatus::Unknown) => {
                return CheckResult::fail(
                    CheckKind::OcspRevocation,
                    Some(depth),
                    format!(
                        "ocspRevocation: responder at '{}' does not know cert '{}'",
                        url, subject
                    ),
                );
            }
            Err(e) => {
                return CheckResult::fail(
                    CheckKind::OcspRevocation,
                    Some(depth),
                    format!("ocspRevocation: response from '{}' rejected: {}", url, e),
                );
            }
        }
    }

    CheckResult::pass(
        CheckKind::OcspRevocation,
        Some(depth),
        "ocspRevocation: responder reports status good",
    )
}

/// Informational: records the CA flag, never fails.
pub(crate) fn check_ca_flag(cert: &X509Certificate, depth: usize) -> CheckResult {
    CheckResult::skip(
        CheckKind::CaFlag,
        Some(depth),
        format!("caFlag: CA certificate: {}", is_ca(cert)),
    )
}
