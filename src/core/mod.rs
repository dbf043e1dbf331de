use crate::args::Config;
use crate::error::Result;
use crate::output::OutputHandler;

mod collector;
mod feeder;
mod pool;
mod probe;
mod range;
mod session;

pub use collector::{Collected, Collector, ScanResult};
pub use feeder::feed;
pub use pool::WorkerPool;
pub use probe::{Dialer, ProbeOutcome, ProbeRequest, Protocol, TcpDialer, Target, probe};
pub use range::PortRange;
pub use session::{
    CancelHandle, DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT, DEFAULT_WORKERS, ScanConfig,
    ScanReport, ScanSession,
};

pub struct Scanner {
    pub config: Config,
}

impl Scanner {
    pub fn new(config: Config) -> Scanner {
        Scanner { config }
    }

    /// Run a TCP scan from the resolved configuration and print the report.
    pub async fn exec(&self) -> Result<()> {
        let session = ScanSession::tcp(self.config.to_scan_config()?)?;
        let report = session.run().await?;

        let output = OutputHandler::new();
        if self.config.json {
            output.out_json(&report)?;
        } else {
            output.out_results(&report);
        }
        Ok(())
    }
}
