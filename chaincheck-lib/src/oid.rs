//! Centralized OID string constants.
//!
//! Object Identifiers are defined by ITU-T X.660 and referenced
//! extensively in RFC 5280 (X.509) and RFC 6960 (OCSP). Grouping them
//! here avoids magic strings scattered across modules.

// ── X.509 Distinguished Name attributes (RFC 4519 / X.520) ──────────────

pub const COMMON_NAME: &str = "2.5.4.3";
pub const SERIAL_NUMBER: &str = "2.5.4.5";
pub const COUNTRY: &str = "2.5.4.6";
pub const LOCALITY: &str = "2.5.4.7";
pub const STATE_OR_PROVINCE: &str = "2.5.4.8";
pub const ORGANIZATION: &str = "2.5.4.10";
pub const ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1"; // PKCS#9
pub const DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";

// ── PKIX Authority Information Access (RFC 5280 Section 4.2.2) ──────────

pub const ACCESS_OCSP: &str = "1.3.6.1.5.5.7.48.1";
