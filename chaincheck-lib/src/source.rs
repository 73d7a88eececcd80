//! Chain acquisition: from a live TLS peer or from a PEM bundle on
//! disk. A `file://` prefix on the target selects the file source.

use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::{pki_types, DigitallySignedStruct, SignatureScheme};
use tracing::debug;
use x509_parser::pem::Pem;
use x509_parser::prelude::*;

use crate::validate::helpers::extract_cn;
use crate::ChainCheckError;

/// A chain as presented by its source, leaf first, plus the hostname
/// to validate it against.
#[derive(Debug, Clone)]
pub struct PeerChain {
    pub hostname: String,
    pub certs_der: Vec<Vec<u8>>,
}

/// Something that can produce a certificate chain.
pub trait CertificateSource {
    fn acquire(&self) -> Result<PeerChain, ChainCheckError>;
}

/// Pick a source for `target`: `file://path` reads a PEM bundle,
/// anything else dials the host over TLS.
pub fn source_for_target(
    target: &str,
    port: u16,
    timeout: Duration,
) -> Box<dyn CertificateSource> {
    match target.strip_prefix("file://") {
        Some(path) => Box::new(FileSource {
            path: PathBuf::from(path),
        }),
        None => Box::new(TlsSource {
            host: target.to_string(),
            port,
            timeout,
        }),
    }
}

/// Extract every certificate from a PEM buffer, in order. Labels other
/// than `CERTIFICATE` / `TRUSTED CERTIFICATE` are ignored, as is any
/// non-PEM text around the blocks.
pub fn parse_pem_certificates(data: &[u8]) -> Result<Vec<Vec<u8>>, ChainCheckError> {
    let mut certs = Vec::new();
    for entry in Pem::iter_from_buffer(data) {
        let pem = entry.map_err(|e| ChainCheckError::Pem(e.to_string()))?;
        if pem.label == "CERTIFICATE" || pem.label == "TRUSTED CERTIFICATE" {
            certs.push(pem.contents);
        }
    }
    if certs.is_empty() {
        return Err(ChainCheckError::Pem(
            "no CERTIFICATE blocks found".to_string(),
        ));
    }
    Ok(certs)
}

/// Reads a leaf-first PEM bundle from disk. The hostname is taken from
/// the leaf's CN since there is no peer to name one.
pub struct FileSource {
    pub path: PathBuf,
}

impl CertificateSource for FileSource {
    fn acquire(&self) -> Result<PeerChain, ChainCheckError> {
        debug!(path = %self.path.display(), "reading chain from file");
        let data = std::fs::read(&self.path)?;
        let certs_der = parse_pem_certificates(&data)?;
        let hostname = match X509Certificate::from_der(&certs_der[0]) {
            Ok((_, leaf)) => extract_cn(&leaf).unwrap_or_default(),
            Err(e) => {
                return Err(ChainCheckError::Der(format!(
                    "leaf certificate in '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };
        Ok(PeerChain {
            hostname,
            certs_der,
        })
    }
}

/// Dials the host and captures the chain the peer presents during the
/// handshake. Certificate verification is disabled on purpose: the
/// point is to obtain the chain, judging it comes later.
pub struct TlsSource {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl CertificateSource for TlsSource {
    fn acquire(&self) -> Result<PeerChain, ChainCheckError> {
        debug!(host = %self.host, port = self.port, "dialing TLS peer");
        let mut socket = self.connect()?;

        let config = rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoCertificateVerification))
            .with_no_client_auth();
        let server_name = pki_types::ServerName::try_from(self.host.clone())
            .map_err(|e| ChainCheckError::Acquire(format!("invalid server name: {}", e)))?;
        let mut client = rustls::ClientConnection::new(Arc::new(config), server_name)
            .map_err(|e| ChainCheckError::Acquire(format!("TLS client setup failed: {}", e)))?;

        loop {
            if client.wants_read() {
                let n = client
                    .read_tls(&mut socket)
                    .map_err(|e| ChainCheckError::Acquire(format!("read_tls failed: {}", e)))?;
                if n == 0 {
                    return Err(ChainCheckError::Acquire(format!(
                        "'{}' closed the connection before presenting certificates",
                        self.host
                    )));
                }
                client.process_new_packets().map_err(|e| {
                    ChainCheckError::Acquire(format!("TLS handshake failed: {}", e))
                })?;
            }

            if client.wants_write() {
                client
                    .write_tls(&mut socket)
                    .map_err(|e| ChainCheckError::Acquire(format!("write_tls failed: {}", e)))?;
            }

            socket.flush()?;

            if let Some(peer_certificates) = client.peer_certificates() {
                let certs_der = peer_certificates
                    .iter()
                    .map(|cert| cert.as_ref().to_vec())
                    .collect::<Vec<_>>();
                debug!(certs = certs_der.len(), "received peer chain");
                return Ok(PeerChain {
                    hostname: self.host.clone(),
                    certs_der,
                });
            }
        }
    }
}

impl TlsSource {
    fn connect(&self) -> Result<TcpStream, ChainCheckError> {
        let addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                ChainCheckError::Acquire(format!("could not resolve '{}': {}", self.host, e))
            })?;
        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(socket) => {
                    socket.set_read_timeout(Some(self.timeout))?;
                    socket.set_write_timeout(Some(self.timeout))?;
                    return Ok(socket);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(ChainCheckError::Acquire(match last_err {
            Some(e) => format!("could not connect to '{}:{}': {}", self.host, self.port, e),
            None => format!("no addresses found for '{}'", self.host),
        }))
    }
}

/// Accepts any server certificate during the capture handshake.
#[derive(Debug)]
struct NoCertificateVerification;

impl ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _: &pki_types::CertificateDer<'_>,
        _: &[pki_types::CertificateDer<'_>],
        _: &pki_types::ServerName<'_>,
        _: &[u8],
        _: pki_types::UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _: &[u8],
        _: &pki_types::CertificateDer<'_>,
        _: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _: &[u8],
        _: &pki_types::CertificateDer<'_>,
        _: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}
