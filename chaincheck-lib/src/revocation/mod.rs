//! Network transport for revocation lookups.
//!
//! CRL and OCSP checks go through the [`RevocationTransport`] trait so
//! the validation engine can be exercised in tests without a network.
//! The production implementation is a blocking `ureq` client with a
//! bounded per-request timeout.

pub mod crl;
pub mod ocsp;

use crate::ChainCheckError;
use std::io::Read;
use std::time::Duration;

/// Maximum accepted response body (CRLs can be large, but bounded).
const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Blocking HTTP operations needed by revocation checks.
pub trait RevocationTransport: Send + Sync {
    /// HTTP GET returning the raw body.
    fn get(&self, url: &str) -> Result<Vec<u8>, ChainCheckError>;

    /// HTTP POST of a binary body, returning the raw response body.
    fn post(
        &self,
        url: &str,
        content_type: &str,
        accept: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, ChainCheckError>;
}

/// `ureq`-backed transport with a fixed timeout per request.
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        HttpTransport { timeout }
    }

    fn read_body(response: ureq::Response, url: &str) -> Result<Vec<u8>, ChainCheckError> {
        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| {
                ChainCheckError::Revocation(format!("failed to read body from '{}': {}", url, e))
            })?;
        Ok(body)
    }

    fn map_err(err: ureq::Error, url: &str) -> ChainCheckError {
        match err {
            ureq::Error::Status(code, _) => {
                ChainCheckError::Revocation(format!("'{}' returned HTTP {}", url, code))
            }
            ureq::Error::Transport(t) => {
                ChainCheckError::Revocation(format!("request to '{}' failed: {}", url, t))
            }
        }
    }
}

impl RevocationTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, ChainCheckError> {
        tracing::debug!(url, "fetching revocation data");
        let response = ureq::get(url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| Self::map_err(e, url))?;
        Self::read_body(response, url)
    }

    fn post(
        &self,
        url: &str,
        content_type: &str,
        accept: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, ChainCheckError> {
        tracing::debug!(url, bytes = body.len(), "posting revocation query");
        let response = ureq::post(url)
            .timeout(self.timeout)
            .set("Content-Type", content_type)
            .set("Accept", accept)
            .send_bytes(body)
            .map_err(|e| Self::map_err(e, url))?;
        Self::read_body(response, url)
    }
}
