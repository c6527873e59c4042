//! Plain TCP or TLS streams to the IRC server.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, info, warn};

/// Anything the connection can read from and write to.
pub trait IrcStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IrcStream for T {}

pub type BoxedStream = Box<dyn IrcStream>;

/// Connect to the configured server, upgrading to TLS when `ssl` is set.
///
/// The host name is used for SNI and certificate verification against the
/// platform trust store. A host that cannot be a TLS server name is rejected
/// before dialing.
pub async fn open(config: &ServerConfig) -> Result<BoxedStream> {
    let host = config.host_address.as_str();
    let transport_error = |source: io::Error| Error::Transport {
        host: host.to_string(),
        port: config.port,
        source,
    };

    let server_name = if config.ssl {
        let name = ServerName::try_from(host.to_string())
            .map_err(|_| Error::ServerName(host.to_string()))?;
        Some(name)
    } else {
        None
    };

    let tcp = TcpStream::connect((host, config.port))
        .await
        .map_err(transport_error)?;

    let Some(server_name) = server_name else {
        info!(address = %config.address(), "Connected");
        return Ok(Box::new(tcp));
    };

    let tls = tls_connector()
        .connect(server_name, tcp)
        .await
        .map_err(transport_error)?;
    info!(address = %config.address(), "Connected with TLS");
    Ok(Box::new(tls))
}

fn tls_connector() -> TlsConnector {
    let config = ClientConfig::builder()
        .with_root_certificates(platform_roots())
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

fn platform_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for e in &native.errors {
        warn!("Error loading native certs: {}", e);
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!(added, ignored, "Loaded platform trust roots");
    roots
}
