use crate::error::ScanError;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::io::{self, ErrorKind};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Transport used to reach the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Protocol, ScanError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            other => Err(ScanError::UnsupportedProtocol(other.to_string())),
        }
    }
}

/// A single port to test against the session's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest {
    pub port: u16,
}

/// Result of probing one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "port", rename_all = "lowercase")]
pub enum ProbeOutcome {
    Open(u16),
    /// Refused, timed out, unreachable or otherwise not connectable
    Closed(u16),
}

impl ProbeOutcome {
    pub fn port(&self) -> u16 {
        match *self {
            ProbeOutcome::Open(port) | ProbeOutcome::Closed(port) => port,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ProbeOutcome::Open(_))
    }
}

/// Host, transport and per-dial timeout shared by every probe of a scan.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: Arc<str>,
    pub protocol: Protocol,
    pub timeout: Duration,
}

/// The connect primitive a scan is built on.
///
/// Implementations return the established connection on success. The caller
/// only checks reachability and drops the connection straight away.
pub trait Dialer: Send + Sync + 'static {
    type Connection: Send;

    fn dial(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = io::Result<Self::Connection>> + Send;
}

/// Dials real TCP connections through tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

impl Dialer for TcpDialer {
    type Connection = TcpStream;

    async fn dial(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> io::Result<TcpStream> {
        match protocol {
            Protocol::Tcp => {
                match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
                    Ok(result) => result,
                    Err(_) => Err(io::Error::new(ErrorKind::TimedOut, "connect timed out")),
                }
            }
        }
    }
}

/// Probe one port and classify the outcome.
///
/// Dial failures are the normal closed case and never escape this function.
pub async fn probe<D: Dialer>(dialer: &D, target: &Target, request: ProbeRequest) -> ProbeOutcome {
    let port = request.port;
    match dialer
        .dial(target.protocol, &target.host, port, target.timeout)
        .await
    {
        Ok(connection) => {
            // Reachability only, no data is exchanged
            drop(connection);
            tracing::debug!(host = %target.host, port, "port open");
            ProbeOutcome::Open(port)
        }
        Err(e) => {
            tracing::trace!(host = %target.host, port, kind = ?e.kind(), "port closed");
            ProbeOutcome::Closed(port)
        }
    }
}
