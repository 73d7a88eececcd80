//! Small helper functions for chain validation.
//!
//! Contains DN formatting, SAN/CN extraction, RFC 6125 hostname
//! matching, and revocation endpoint extraction.

use crate::encode::hex_colon_upper;
use crate::oid;
use std::net::IpAddr;
use x509_parser::prelude::*;

/// Render an X.509 name as a one-line DN string ("C=JP, CN=example").
pub(crate) fn dn_oneline(name: &X509Name) -> String {
    let mut parts = Vec::new();
    for rdn in name.iter() {
        for attr in rdn.iter() {
            let oid_str = attr.attr_type().to_id_string();
            let key = match oid_str.as_str() {
                oid::COMMON_NAME => "CN".to_string(),
                oid::COUNTRY => "C".to_string(),
                oid::STATE_OR_PROVINCE => "ST".to_string(),
                oid::LOCALITY => "L".to_string(),
                oid::ORGANIZATION => "O".to_string(),
                oid::ORGANIZATIONAL_UNIT => "OU".to_string(),
                oid::SERIAL_NUMBER => "serialNumber".to_string(),
                oid::EMAIL_ADDRESS => "emailAddress".to_string(),
                oid::DOMAIN_COMPONENT => "DC".to_string(),
                other => other.to_string(),
            };
            if let Ok(val) = attr.as_str() {
                parts.push(format!("{}={}", key, val));
            }
        }
    }
    parts.join(", ")
}

/// Extract the Common Name from the certificate subject.
pub(crate) fn extract_cn(cert: &X509Certificate) -> Option<String> {
    for rdn in cert.subject().iter() {
        for attr in rdn.iter() {
            if attr.attr_type().to_id_string() == oid::COMMON_NAME {
                return attr.as_str().ok().map(|s| s.to_string());
            }
        }
    }
    None
}

/// Extract DNS names from the Subject Alternative Name extension.
pub(crate) fn extract_san_dns_names(cert: &X509Certificate) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for gn in &san.value.general_names {
            if let GeneralName::DNSName(name) = gn {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Extract IP address strings from the SAN extension.
pub(crate) fn extract_san_ips(cert: &X509Certificate) -> Vec<String> {
    let mut ips = Vec::new();
    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for gn in &san.value.general_names {
            if let GeneralName::IPAddress(ip_bytes) = gn {
                ips.push(format_ip_bytes(ip_bytes));
            }
        }
    }
    ips
}

/// Format raw SAN IP bytes as an address string.
fn format_ip_bytes(bytes: &[u8]) -> String {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
            IpAddr::from(octets).to_string()
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            IpAddr::from(octets).to_string()
        }
        _ => hex_colon_upper(bytes),
    }
}

/// Serial number as colon-separated uppercase hex.
pub(crate) fn serial_hex(cert: &X509Certificate) -> String {
    hex_colon_upper(cert.raw_serial())
}

/// All names a hostname could match: SAN DNS entries, with CN fallback
/// only when no SAN DNS entries exist (RFC 6125 Section 6.4.4).
pub(crate) fn presented_dns_names(cert: &X509Certificate) -> Vec<String> {
    let names = extract_san_dns_names(cert);
    if !names.is_empty() {
        return names;
    }
    extract_cn(cert).into_iter().collect()
}

/// Check a hostname (or IP literal) against the certificate's names.
pub(crate) fn hostname_matches(cert: &X509Certificate, hostname: &str) -> bool {
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        let wanted = ip.to_string();
        return extract_san_ips(cert).iter().any(|san| *san == wanted);
    }
    let host = normalize_dns(hostname);
    presented_dns_names(cert)
        .iter()
        .any(|pattern| dns_name_matches(&normalize_dns(pattern), &host))
}

fn normalize_dns(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// RFC 6125 DNS matching: exact match, or a wildcard as the entire
/// leftmost label matching exactly one label.
pub(crate) fn dns_name_matches(pattern: &str, host: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("*.") {
        let Some((_, host_rest)) = host.split_once('.') else {
            return false;
        };
        // The wildcard must cover a real label and nothing deeper.
        !host.starts_with('.') && !suffix.is_empty() && host_rest == suffix
    } else {
        pattern == host
    }
}

/// CRL distribution point URIs from the certificate (RFC 5280 4.2.1.13).
pub(crate) fn crl_distribution_urls(cert: &X509Certificate) -> Vec<String> {
    let mut urls = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::CRLDistributionPoints(cdp) = ext.parsed_extension() {
            for dp in cdp.points.iter() {
                if let Some(DistributionPointName::FullName(names)) = &dp.distribution_point {
                    for gn in names {
                        if let GeneralName::URI(uri) = gn {
                            urls.push(uri.to_string());
                        }
                    }
                }
            }
        }
    }
    urls
}

/// OCSP responder URIs from the AIA extension (RFC 5280 4.2.2.1).
pub(crate) fn ocsp_responder_urls(cert: &X509Certificate) -> Vec<String> {
    let mut urls = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in aia.accessdescs.iter() {
                if desc.access_method.to_id_string() == oid::ACCESS_OCSP {
                    if let GeneralName::URI(uri) = &desc.access_location {
                        urls.push(uri.to_string());
                    }
                }
            }
        }
    }
    urls
}

/// Whether the certificate carries CA:TRUE in BasicConstraints.
pub(crate) fn is_ca(cert: &X509Certificate) -> bool {
    cert.basic_constraints()
        .ok()
        .flatten()
        .map(|bc| bc.value.ca)
        .unwrap_or(false)
}
