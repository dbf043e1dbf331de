use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "portpool")]
#[command(about = "A bounded-concurrency TCP port scanner")]
#[command(version)]
pub struct Args {
    /// Configuration file path. Note that CLI arguments override configuration file settings.
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Target host name or IP address
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Transport protocol (only tcp is supported)
    #[arg(long = "proto")]
    pub protocol: Option<String>,

    /// Inclusive port range (e.g., 1-1024)
    #[arg(short = 'p', long = "ports")]
    pub ports: Option<String>,

    /// Number of concurrent probe workers
    #[arg(short = 'w', long = "workers")]
    pub workers: Option<usize>,

    /// Capacity of the request and outcome queues
    #[arg(long = "queue")]
    pub queue: Option<usize>,

    /// Connect timeout per probe in milliseconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Print the scan report as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
