//! CRL parsing and revocation membership lookup.

use crate::ChainCheckError;
use x509_parser::prelude::*;

/// Name for a CRL entry reason code, per RFC 5280 Section 5.3.1.
/// `ReasonCode` is a newtype over the raw `u8`.
fn format_crl_reason(rc: &x509_parser::x509::ReasonCode) -> &'static str {
    match rc.0 {
        0 => "unspecified",
        1 => "keyCompromise",
        2 => "cACompromise",
        3 => "affiliationChanged",
        4 => "superseded",
        5 => "cessationOfOperation",
        6 => "certificateHold",
        // 7 is unused per RFC 5280
        8 => "removeFromCRL",
        9 => "privilegeWithdrawn",
        10 => "aACompromise",
        _ => "unspecified",
    }
}

/// Look up a certificate's serial in a DER-encoded CRL.
///
/// Returns `Ok(Some(reason))` when the serial appears on the list,
/// `Ok(None)` when it does not, and an error when the CRL cannot be
/// parsed (callers treat that as fail-closed).
pub fn lookup_serial(cert: &X509Certificate, crl_der: &[u8]) -> Result<Option<String>, ChainCheckError> {
    let (_, crl) = x509_parser::revocation_list::CertificateRevocationList::from_der(crl_der)
        .map_err(|e| ChainCheckError::Der(format!("failed to parse CRL: {}", e)))?;

    let serial = cert.raw_serial();
    for revoked in crl.iter_revoked_certificates() {
        if revoked.raw_serial() == serial {
            let reason = revoked
                .reason_code()
                .map(|rc| format_crl_reason(&rc.1))
                .unwrap_or("unspecified");
            return Ok(Some(reason.to_string()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn garbage_crl_is_an_error() {
        let der = testdata::ee_der();
        let (_, cert) = X509Certificate::from_der(&der).unwrap();
        assert!(lookup_serial(&cert, b"\x00\x01\x02garbage").is_err());
    }

    #[test]
    fn certificate_is_not_a_crl() {
        // A certificate's DER does not parse as a CRL structure.
        let der = testdata::ee_der();
        let (_, cert) = X509Certificate::from_der(&der).unwrap();
        assert!(lookup_serial(&cert, &testdata::ca_der()).is_err());
    }

    #[test]
    fn reason_code_names() {
        use x509_parser::x509::ReasonCode;
        assert_eq!(format_crl_reason(&ReasonCode(1)), "keyCompromise");
        assert_eq!(format_crl_reason(&ReasonCode(4)), "superseded");
        assert_eq!(format_crl_reason(&ReasonCode(200)), "unspecified");
    }
}
