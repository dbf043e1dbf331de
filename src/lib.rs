//! Bounded-concurrency TCP port scanner.
//!
//! A scan runs in three stages: a feeder enqueues one request per port, a
//! fixed pool of workers dials them, and a collector waits for exactly one
//! outcome per request before sorting the open ports.

pub mod args;
pub mod core;
pub mod error;
pub mod logging;
pub mod output;

pub use crate::core::{
    CancelHandle, Dialer, PortRange, ProbeOutcome, Protocol, ScanConfig, ScanReport, ScanResult,
    ScanSession, TcpDialer,
};
pub use crate::error::{Result, ScanError};
