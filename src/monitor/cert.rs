//! TLS certificate expiry inspection.
//!
//! # Responsibilities
//! - Derive the TLS host from an `https://` URL
//! - Perform a single verified handshake and read the leaf `notAfter`
//! - Classify the remaining lifetime against the warning threshold
//!
//! # Known limitations
//! - The host is the text between `https://` and the first `/` or `:`.
//!   IPv6 literals are not understood and an explicit port in the URL is
//!   ignored: the handshake always goes to port 443.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// Certificates expiring within this many days raise an alert.
pub const CERT_WARN_DAYS: i64 = 30;

/// Port every certificate check connects to.
pub const TLS_PORT: u16 = 443;

/// Deadline for the TCP connect plus TLS handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for certificate inspection.
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    #[error("not an https URL or empty host: {0}")]
    InvalidHost(String),
    #[error("TLS configuration error: {0}")]
    Config(#[from] rustls::Error),
    #[error("connect failed: {0}")]
    Connect(std::io::Error),
    #[error("handshake failed: {0}")]
    Handshake(std::io::Error),
    #[error("handshake timed out after {0:?}")]
    Timeout(Duration),
    #[error("server presented no certificate")]
    NoCertificate,
    #[error("could not parse certificate: {0}")]
    Parse(String),
}

/// Extract the host part of an `https://` URL by plain string slicing.
pub fn cert_host(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("https://")?;
    let end = rest.find(['/', ':']).unwrap_or(rest.len());
    let host = &rest[..end];
    (!host.is_empty()).then_some(host)
}

/// Whole days between `now` and `expiry`, truncated toward zero.
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_days()
}

/// Outcome of comparing a certificate expiry with the warning threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertVerdict {
    /// At most [`CERT_WARN_DAYS`] left (possibly already expired).
    Expiring { days_left: i64 },
    Valid { days_left: i64 },
}

impl CertVerdict {
    pub fn evaluate(expiry: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days_left = days_until(expiry, now);
        if days_left <= CERT_WARN_DAYS {
            CertVerdict::Expiring { days_left }
        } else {
            CertVerdict::Valid { days_left }
        }
    }
}

/// One-shot TLS client that reports the leaf certificate expiry.
#[derive(Clone)]
pub struct CertInspector {
    connector: TlsConnector,
    port: u16,
    timeout: Duration,
}

impl std::fmt::Debug for CertInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertInspector")
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CertInspector {
    /// Inspector trusting the bundled webpki root certificates.
    pub fn new() -> Result<Self, CertError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self::with_roots(roots)
    }

    /// Inspector trusting only `roots`.
    pub fn with_roots(roots: RootCertStore) -> Result<Self, CertError> {
        let config = ClientConfig::builder_with_provider(
            rustls::crypto::ring::default_provider().into(),
        )
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            port: TLS_PORT,
            timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        })
    }

    /// Override the port the handshake connects to.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the leaf certificate expiry for an `https://` URL.
    pub async fn inspect(&self, url: &str) -> Result<DateTime<Utc>, CertError> {
        let host = cert_host(url).ok_or_else(|| CertError::InvalidHost(url.to_string()))?;
        self.fetch_expiry(host).await
    }

    /// Handshake with `host` on the configured port and read `notAfter`.
    pub async fn fetch_expiry(&self, host: &str) -> Result<DateTime<Utc>, CertError> {
        tokio::time::timeout(self.timeout, self.handshake(host))
            .await
            .map_err(|_| CertError::Timeout(self.timeout))?
    }

    async fn handshake(&self, host: &str) -> Result<DateTime<Utc>, CertError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| CertError::InvalidHost(host.to_string()))?;

        let stream = TcpStream::connect((host, self.port))
            .await
            .map_err(CertError::Connect)?;
        let tls = self
            .connector
            .connect(server_name, stream)
            .await
            .map_err(CertError::Handshake)?;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(CertError::NoCertificate)?;

        not_after(leaf.as_ref())
    }
}

/// Read `notAfter` from a DER-encoded certificate.
pub fn not_after(der: &[u8]) -> Result<DateTime<Utc>, CertError> {
    let (_, cert) =
        x509_parser::parse_x509_certificate(der).map_err(|e| CertError::Parse(e.to_string()))?;
    let ts = cert.validity().not_after.timestamp();
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| CertError::Parse(format!("notAfter out of range: {}", ts)))
}
