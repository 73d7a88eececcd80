//! OCSP request construction and response parsing (RFC 6960).
//!
//! Requests use an unsigned TBSRequest with a single SHA-256 CertID.
//! Responses are parsed with a minimal DER reader: the responder
//! status, the BasicOCSPResponse signature (verified against the
//! issuer key, or a delegated responder certificate the issuer
//! signed), and the certStatus of the matching SingleResponse.

use crate::ChainCheckError;
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

// DER tag bytes used below.
const TAG_SEQUENCE: u8 = 0x30;
const TAG_OID: u8 = 0x06;
const TAG_NULL: u8 = 0x05;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_ENUMERATED: u8 = 0x0a;
const TAG_GENERALIZED_TIME: u8 = 0x18;
const TAG_CTX_0: u8 = 0xa0;
const TAG_CTX_1: u8 = 0xa1;
const TAG_CTX_2: u8 = 0xa2;

/// Encoded OID 2.16.840.1.101.3.4.2.1 (SHA-256).
const OID_SHA256: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];
/// Encoded OID 1.3.6.1.5.5.7.48.1.1 (id-pkix-ocsp-basic).
const OID_OCSP_BASIC: &[u8] = &[0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01, 0x01];

// Signature algorithm OIDs accepted in responses.
const OID_SHA256_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b];
const OID_SHA384_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0c];
const OID_SHA512_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0d];
const OID_ECDSA_SHA256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02];
const OID_ECDSA_SHA384: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x03];
const OID_ED25519: &[u8] = &[0x2b, 0x65, 0x70];

/// Certificate status reported by a matching SingleResponse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    Good,
    Revoked,
    Unknown,
}

fn malformed(detail: &str) -> ChainCheckError {
    ChainCheckError::Revocation(format!("malformed OCSP response: {}", detail))
}

// ── DER writing ──────────────────────────────────────────────────────────

fn write_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        let significant = &bytes[skip..];
        out.push(0x80 | significant.len() as u8);
        out.extend_from_slice(significant);
    }
    out.extend_from_slice(content);
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 4);
    write_tlv(&mut out, tag, content);
    out
}

/// Encode INTEGER content bytes, padding with a leading zero when the
/// top bit is set so the value stays positive.
fn integer_tlv(bytes: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(bytes.len() + 1);
    if bytes.is_empty() {
        content.push(0);
    } else {
        if bytes[0] & 0x80 != 0 {
            content.push(0);
        }
        content.extend_from_slice(bytes);
    }
    tlv(TAG_INTEGER, &content)
}

// ── DER reading ──────────────────────────────────────────────────────────

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn read_byte(&mut self) -> Result<u8, ChainCheckError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| malformed("unexpected end of data"))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_header(&mut self) -> Result<(u8, usize), ChainCheckError> {
        let tag = self.read_byte()?;
        let first = self.read_byte()?;
        let len = if first < 0x80 {
            first as usize
        } else {
            let n = (first & 0x7f) as usize;
            if n == 0 || n > 4 {
                return Err(malformed("unsupported length encoding"));
            }
            let mut len = 0usize;
            for _ in 0..n {
                len = (len << 8) | self.read_byte()? as usize;
            }
            len
        };
        Ok((tag, len))
    }

    fn read_any(&mut self) -> Result<(u8, &'a [u8]), ChainCheckError> {
        let (tag, len) = self.read_header()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&e| e <= self.data.len())
            .ok_or_else(|| malformed("length exceeds data"))?;
        let content = &self.data[self.pos..end];
        self.pos = end;
        Ok((tag, content))
    }

    fn expect(&mut self, tag: u8) -> Result<&'a [u8], ChainCheckError> {
        let (got, content) = self.read_any()?;
        if got != tag {
            return Err(malformed(&format!(
                "expected tag {:#04x}, found {:#04x}",
                tag, got
            )));
        }
        Ok(content)
    }

    /// Read one element, returning the full TLV bytes including header.
    fn read_raw(&mut self, tag: u8) -> Result<&'a [u8], ChainCheckError> {
        let start = self.pos;
        self.expect(tag)?;
        Ok(&self.data[start..self.pos])
    }
}

// ── Request construction ─────────────────────────────────────────────────

/// Build an unsigned OCSP request for `cert`, issued by `issuer`.
///
/// The CertID hashes the issuer's subject name and public key with
/// SHA-256 (RFC 6960 Section 4.1.1).
pub fn build_request(cert: &X509Certificate, issuer: &X509Certificate) -> Vec<u8> {
    let name_hash = Sha256::digest(issuer.subject().as_raw());
    let key_hash = Sha256::digest(issuer.public_key().subject_public_key.data.as_ref());

    let mut alg = Vec::new();
    write_tlv(&mut alg, TAG_OID, OID_SHA256);
    write_tlv(&mut alg, TAG_NULL, &[]);

    let mut cert_id = Vec::new();
    write_tlv(&mut cert_id, TAG_SEQUENCE, &alg);
    write_tlv(&mut cert_id, TAG_OCTET_STRING, name_hash.as_slice());
    write_tlv(&mut cert_id, TAG_OCTET_STRING, key_hash.as_slice());
    cert_id.extend_from_slice(&integer_tlv(cert.raw_serial()));

    let request = tlv(TAG_SEQUENCE, &tlv(TAG_SEQUENCE, &cert_id));
    let request_list = tlv(TAG_SEQUENCE, &request);
    let tbs_request = tlv(TAG_SEQUENCE, &request_list);
    tlv(TAG_SEQUENCE, &tbs_request)
}

// ── Response parsing ─────────────────────────────────────────────────────

fn status_name(status: u8) -> &'static str {
    match status {
        1 => "malformedRequest",
        2 => "internalError",
        3 => "tryLater",
        5 => "sigRequired",
        6 => "unauthorized",
        _ => "unknown",
    }
}

fn ring_algorithm(oid: &[u8]) -> Option<&'static dyn ring::signature::VerificationAlgorithm> {
    match oid {
        o if o == OID_SHA256_WITH_RSA => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA256),
        o if o == OID_SHA384_WITH_RSA => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA384),
        o if o == OID_SHA512_WITH_RSA => Some(&ring::signature::RSA_PKCS1_2048_8192_SHA512),
        o if o == OID_ECDSA_SHA256 => Some(&ring::signature::ECDSA_P256_SHA256_ASN1),
        o if o == OID_ECDSA_SHA384 => Some(&ring::signature::ECDSA_P384_SHA384_ASN1),
        o if o == OID_ED25519 => Some(&ring::signature::ED25519),
        _ => None,
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    &bytes[skip.min(bytes.len().saturating_sub(1))..]
}

/// Authenticate the BasicOCSPResponse signature. Tries the issuer's key
/// first, then any delegated responder certificate the issuer signed.
fn verify_response_signature(
    tbs_raw: &[u8],
    sig_alg: &[u8],
    sig_bits: &[u8],
    issuer: &X509Certificate,
    certs: Option<&[u8]>,
) -> Result<(), ChainCheckError> {
    let mut alg_reader = Reader::new(sig_alg);
    let alg_oid = alg_reader.expect(TAG_OID)?;
    let Some(algorithm) = ring_algorithm(alg_oid) else {
        return Err(ChainCheckError::Revocation(
            "unsupported OCSP response signature algorithm".into(),
        ));
    };
    if sig_bits.is_empty() || sig_bits[0] != 0 {
        return Err(malformed("signature bit string has unused bits"));
    }
    let signature = &sig_bits[1..];

    let issuer_key = issuer.public_key().subject_public_key.data.as_ref();
    if ring::signature::UnparsedPublicKey::new(algorithm, issuer_key)
        .verify(tbs_raw, signature)
        .is_ok()
    {
        return Ok(());
    }

    // Delegated responder: the response carries a certificate that the
    // issuer signed, whose key signed the response.
    if let Some(certs_content) = certs {
        let mut outer = Reader::new(certs_content);
        let list = outer.expect(TAG_SEQUENCE)?;
        let mut certs_reader = Reader::new(list);
        while !certs_reader.is_done() {
            let responder_der = certs_reader.read_raw(TAG_SEQUENCE)?;
            let Ok((_, responder)) = X509Certificate::from_der(responder_der) else {
                continue;
            };
            if responder
                .verify_signature(Some(issuer.public_key()))
                .is_err()
            {
                continue;
            }
            let responder_key = responder.public_key().subject_public_key.data.as_ref();
            if ring::signature::UnparsedPublicKey::new(algorithm, responder_key)
                .verify(tbs_raw, signature)
                .is_ok()
            {
                return Ok(());
            }
        }
    }

    Err(ChainCheckError::Revocation(
        "OCSP response signature could not be verified".into(),
    ))
}

fn cert_id_serial(cert_id: &[u8]) -> Result<&[u8], ChainCheckError> {
    let mut reader = Reader::new(cert_id);
    reader.expect(TAG_SEQUENCE)?; // hashAlgorithm
    reader.expect(TAG_OCTET_STRING)?; // issuerNameHash
    reader.expect(TAG_OCTET_STRING)?; // issuerKeyHash
    reader.expect(TAG_INTEGER)
}

/// Parse a DER OCSP response, authenticate it against `issuer`, and
/// return the status of the certificate with the given raw serial.
pub fn parse_response(
    der: &[u8],
    issuer: &X509Certificate,
    serial: &[u8],
) -> Result<CertStatus, ChainCheckError> {
    let mut outer = Reader::new(der);
    let response = outer.expect(TAG_SEQUENCE)?;
    let mut reader = Reader::new(response);

    let status_content = reader.expect(TAG_ENUMERATED)?;
    let status = *status_content.first().ok_or_else(|| malformed("empty status"))?;
    if status != 0 {
        return Err(ChainCheckError::Revocation(format!(
            "OCSP responder returned status {} ({})",
            status,
            status_name(status)
        )));
    }

    if reader.peek_tag() != Some(TAG_CTX_0) {
        return Err(malformed("successful response without responseBytes"));
    }
    let response_bytes = reader.expect(TAG_CTX_0)?;
    let mut reader = Reader::new(response_bytes);
    let rb_seq = reader.expect(TAG_SEQUENCE)?;
    let mut reader = Reader::new(rb_seq);
    let response_type = reader.expect(TAG_OID)?;
    if response_type != OID_OCSP_BASIC {
        return Err(ChainCheckError::Revocation(
            "unsupported OCSP response type".into(),
        ));
    }
    let basic = reader.expect(TAG_OCTET_STRING)?;

    let mut reader = Reader::new(basic);
    let basic_seq = reader.expect(TAG_SEQUENCE)?;
    let mut reader = Reader::new(basic_seq);
    let tbs_raw = reader.read_raw(TAG_SEQUENCE)?;
    let sig_alg = reader.expect(TAG_SEQUENCE)?;
    let sig_bits = reader.expect(TAG_BIT_STRING)?;
    let certs = if reader.peek_tag() == Some(TAG_CTX_0) {
        Some(reader.expect(TAG_CTX_0)?)
    } else {
        None
    };

    verify_response_signature(tbs_raw, sig_alg, sig_bits, issuer, certs)?;

    // ResponseData. Skip the header of the raw TLV we captured.
    let mut tbs = Reader::new(tbs_raw);
    let response_data = tbs.expect(TAG_SEQUENCE)?;
    let mut reader = Reader::new(response_data);
    if reader.peek_tag() == Some(TAG_CTX_0) {
        reader.expect(TAG_CTX_0)?; // version
    }
    match reader.peek_tag() {
        Some(TAG_CTX_1) => {
            reader.expect(TAG_CTX_1)?; // responderID byName
        }
        Some(TAG_CTX_2) => {
            reader.expect(TAG_CTX_2)?; // responderID byKey
        }
        _ => return Err(malformed("missing responderID")),
    }
    reader.expect(TAG_GENERALIZED_TIME)?; // producedAt
    let responses = reader.expect(TAG_SEQUENCE)?;

    let wanted = strip_leading_zeros(serial);
    let mut list = Reader::new(responses);
    while !list.is_done() {
        let single = list.expect(TAG_SEQUENCE)?;
        let mut single_reader = Reader::new(single);
        let cert_id = single_reader.expect(TAG_SEQUENCE)?;
        let found = cert_id_serial(cert_id)?;
        if strip_leading_zeros(found) != wanted {
            continue;
        }
        let (tag, _) = single_reader.read_any()?;
        return match tag {
            0x80 => Ok(CertStatus::Good),
            0xa1 => Ok(CertStatus::Revoked),
            0x82 => Ok(CertStatus::Unknown),
            other => Err(malformed(&format!("unknown certStatus tag {:#04x}", other))),
        };
    }

    Err(ChainCheckError::Revocation(
        "OCSP response does not answer for the requested certificate".into(),
    ))
}
