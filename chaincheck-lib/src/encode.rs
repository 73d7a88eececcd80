//! Re-encoding of raw certificate chains for the dump operation.

use crate::ChainCheckError;
use base64::Engine;

/// Output encoding for dumped chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// All certificates, PEM armored.
    Pem,
    /// Leaf certificate only, raw DER bytes.
    Der,
}

impl std::str::FromStr for Encoding {
    type Err = ChainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pem" | "PEM" => Ok(Encoding::Pem),
            "der" | "DER" => Ok(Encoding::Der),
            other => Err(ChainCheckError::Validation(format!(
                "encoding type '{}' is not supported",
                other
            ))),
        }
    }
}

/// Format bytes as colon-separated uppercase hex (e.g., "AB:CD:EF").
pub(crate) fn hex_colon_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Encode bytes as base64 with PEM-style 64-character line wrapping.
fn base64_wrap(data: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    encoded
        .as_bytes()
        .chunks(64)
        .filter_map(|c| std::str::from_utf8(c).ok())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a DER-encoded certificate in PEM armor.
pub fn der_to_pem(der: &[u8]) -> String {
    format!(
        "-----BEGIN CERTIFICATE-----\n{}\n-----END CERTIFICATE-----\n",
        base64_wrap(der)
    )
}

/// Render a whole chain as concatenated PEM blocks, leaf first.
pub fn chain_to_pem(certs_der: &[Vec<u8>]) -> String {
    certs_der.iter().map(|der| der_to_pem(der)).collect()
}

/// Encode an acquired chain for output. PEM renders every certificate;
/// DER emits the leaf only.
pub fn encode_chain(certs_der: &[Vec<u8>], encoding: Encoding) -> Result<Vec<u8>, ChainCheckError> {
    match encoding {
        Encoding::Pem => Ok(chain_to_pem(certs_der).into_bytes()),
        Encoding::Der => certs_der
            .first()
            .cloned()
            .ok_or_else(|| ChainCheckError::Validation("empty certificate chain".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn pem_armor_shape() {
        let der = testdata::ca_der();
        let pem = der_to_pem(&der);
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
        // Base64 body wraps at 64 columns
        for line in pem.lines().filter(|l| !l.starts_with("-----")) {
            assert!(line.len() <= 64);
        }
    }

    #[test]
    fn pem_roundtrips_through_parser() {
        let der = testdata::ca_der();
        let pem = der_to_pem(&der);
        let reparsed = crate::parse_pem_certificates(pem.as_bytes()).unwrap();
        assert_eq!(reparsed, vec![der]);
    }

    #[test]
    fn chain_pem_contains_every_certificate() {
        let chain = vec![testdata::ee_der(), testdata::ca_der()];
        let pem = chain_to_pem(&chain);
        assert_eq!(pem.matches("-----BEGIN CERTIFICATE-----").count(), 2);
    }

    #[test]
    fn der_encoding_emits_leaf_only() {
        let chain = vec![testdata::ee_der(), testdata::ca_der()];
        let out = encode_chain(&chain, Encoding::Der).unwrap();
        assert_eq!(out, testdata::ee_der());
    }

    #[test]
    fn der_encoding_rejects_empty_chain() {
        assert!(encode_chain(&[], Encoding::Der).is_err());
    }

    #[test]
    fn encoding_from_str() {
        assert_eq!("pem".parse::<Encoding>().unwrap(), Encoding::Pem);
        assert_eq!("DER".parse::<Encoding>().unwrap(), Encoding::Der);
        assert!("xml".parse::<Encoding>().is_err());
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(hex_colon_upper(&[0xab, 0x01, 0xff]), "AB:01:FF");
    }
}
