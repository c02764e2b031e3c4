//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use uptimer::platform::Alerter;

/// Alerter that counts how often it fired.
#[derive(Debug, Default)]
pub struct CountingAlerter(AtomicUsize);

impl CountingAlerter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Alerter for CountingAlerter {
    fn alert(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn http_response(status: u16, body: &str) -> String {
    let status_text = match status {
        200 => "200 OK",
        204 => "204 No Content",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        other => return format!(
            "HTTP/1.1 {} Unknown\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            other,
            body.len(),
            body
        ),
    };
    format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    )
}

/// Start a backend whose response status is decided per request by `f`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let status = f().await;
                let _ = socket.write_all(http_response(status, "ok").as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that serves `statuses` in order, then repeats the last one.
pub async fn start_sequenced_backend(statuses: Vec<u16>) -> SocketAddr {
    let statuses = Arc::new(statuses);
    let calls = Arc::new(AtomicUsize::new(0));
    start_programmable_backend(move || {
        let statuses = statuses.clone();
        let calls = calls.clone();
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            statuses[n.min(statuses.len() - 1)]
        }
    })
    .await
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// A test CA and a `localhost` leaf certificate it signed.
pub struct TestPki {
    pub ca: CertificateDer<'static>,
    pub leaf: CertificateDer<'static>,
    pub leaf_key: Vec<u8>,
}

/// Issue a `localhost` certificate expiring `days` days from now.
pub fn issue_localhost_cert(days: i64) -> TestPki {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params
        .distinguished_name
        .push(DnType::CommonName, "uptimer test CA");
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let expiry = (chrono::Utc::now() + chrono::Duration::days(days)).date_naive();
    let leaf_key = KeyPair::generate().unwrap();
    let mut leaf_params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    leaf_params.not_after = rcgen::date_time_ymd(
        chrono::Datelike::year(&expiry),
        chrono::Datelike::month(&expiry) as u8,
        chrono::Datelike::day(&expiry) as u8,
    );
    let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

    TestPki {
        ca: ca_cert.der().clone(),
        leaf: leaf_cert.der().clone(),
        leaf_key: leaf_key.serialize_der(),
    }
}

/// Start a TLS backend presenting `pki.leaf` that answers every request with 200.
pub async fn start_tls_backend(pki: &TestPki) -> SocketAddr {
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(pki.leaf_key.clone()));
    let config = rustls::ServerConfig::builder_with_provider(
        rustls::crypto::ring::default_provider().into(),
    )
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![pki.leaf.clone()], key)
    .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(socket).await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                if let Ok(n) = tls.read(&mut buf).await {
                    if n > 0 {
                        let _ = tls.write_all(http_response(200, "ok").as_bytes()).await;
                    }
                }
                let _ = tls.shutdown().await;
            });
        }
    });

    addr
}
