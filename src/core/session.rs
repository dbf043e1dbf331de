use crate::core::collector::{Collector, ScanResult};
use crate::core::feeder;
use crate::core::pool::WorkerPool;
use crate::core::probe::{Dialer, ProbeOutcome, ProbeRequest, Protocol, TcpDialer, Target, probe};
use crate::core::range::PortRange;
use crate::error::{Result, ScanError};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};

pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Everything one scan needs to know.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub host: String,
    pub protocol: Protocol,
    pub range: PortRange,
    /// Number of concurrent probe workers
    pub workers: usize,
    /// Capacity of both the request and the outcome queue
    pub queue_capacity: usize,
    /// Per-dial connect timeout
    pub timeout: Duration,
}

impl ScanConfig {
    pub fn new(host: impl Into<String>) -> ScanConfig {
        ScanConfig {
            host: host.into(),
            ..ScanConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ScanError::EmptyTarget);
        }
        if self.workers == 0 {
            return Err(ScanError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ScanError::NoQueueCapacity);
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            host: String::new(),
            protocol: Protocol::Tcp,
            range: PortRange::default(),
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Outcome of one `ScanSession::run`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub host: String,
    pub protocol: Protocol,
    pub range: PortRange,
    /// Open ports, ascending
    pub open: ScanResult,
    /// Outcomes the collector received
    pub probed: usize,
    /// True if the feeder was stopped before the end of the range
    pub cancelled: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Stops a running scan from enqueuing further ports.
///
/// Probes already handed to a worker finish or time out on their own. The
/// flag is sticky: a cancelled session stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// One scan configuration bound to a dialer.
///
/// Queues are created fresh on each `run`, so sessions never share channels.
pub struct ScanSession<D: Dialer = TcpDialer> {
    config: ScanConfig,
    dialer: Arc<D>,
    cancel: Arc<watch::Sender<bool>>,
}

impl ScanSession<TcpDialer> {
    /// Session that dials real TCP connections.
    pub fn tcp(config: ScanConfig) -> Result<ScanSession<TcpDialer>> {
        ScanSession::new(config, TcpDialer)
    }
}

impl<D: Dialer> ScanSession<D> {
    /// Validate `config` up front; a bad config never starts a scan.
    pub fn new(config: ScanConfig, dialer: D) -> Result<ScanSession<D>> {
        config.validate()?;
        let (cancel, _) = watch::channel(false);
        Ok(ScanSession {
            config,
            dialer: Arc::new(dialer),
            cancel: Arc::new(cancel),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel.clone(),
        }
    }

    fn target(&self) -> Target {
        Target {
            host: Arc::from(self.config.host.as_str()),
            protocol: self.config.protocol,
            timeout: self.config.timeout,
        }
    }

    /// Probe a single port outside the pool.
    pub async fn probe_port(&self, port: u16) -> Result<ProbeOutcome> {
        if port == 0 {
            return Err(ScanError::InvalidRange { start: 0, end: 0 });
        }
        Ok(probe(self.dialer.as_ref(), &self.target(), ProbeRequest { port }).await)
    }

    /// Scan the configured range.
    ///
    /// Feeder, pool and collector run as separate tasks. This call returns
    /// once the collector has received one outcome per enqueued request and
    /// sorted the open ports.
    pub async fn run(&self) -> Result<ScanReport> {
        let started = Instant::now();
        let ScanConfig {
            range,
            workers,
            queue_capacity,
            ..
        } = self.config;
        let expected = range.len();

        tracing::info!(
            host = %self.config.host,
            protocol = %self.config.protocol,
            %range,
            workers,
            "starting scan"
        );

        let (request_tx, request_rx) = mpsc::channel(queue_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel(queue_capacity);
        let (done_tx, done_rx) = oneshot::channel();

        let collector = Collector::new(expected).spawn(outcome_rx, done_tx);
        let pool = WorkerPool::spawn(
            workers,
            self.dialer.clone(),
            self.target(),
            request_rx,
            outcome_tx,
        );
        tracing::debug!(workers = pool.size(), expected, "pool started");
        let feeder = tokio::spawn(feeder::feed(range, request_tx, self.cancel.subscribe()));

        let collected = done_rx.await;
        let enqueued = match feeder.await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!("feeder task failed: {}", e);
                0
            }
        };
        pool.join().await;
        if let Err(e) = collector.await {
            tracing::error!("collector task failed: {}", e);
        }

        let collected = collected.map_err(|_| ScanError::Incomplete {
            expected: enqueued,
            received: 0,
        })?;
        if collected.received != enqueued {
            return Err(ScanError::Incomplete {
                expected: enqueued,
                received: collected.received,
            });
        }

        let report = ScanReport {
            host: self.config.host.clone(),
            protocol: self.config.protocol,
            range,
            open: collected.result,
            probed: collected.received,
            cancelled: enqueued < expected,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            open = report.open.len(),
            probed = report.probed,
            cancelled = report.cancelled,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "scan finished"
        );

        Ok(report)
    }
}
