use crate::error::Result;
use clap::Parser;

mod cli;
mod config;

pub use cli::Args;
pub use config::Config;

/// Parse the command line and merge it over the optional config file.
pub fn get_config() -> Result<Config> {
    resolve(Args::parse())
}

pub fn resolve(args: Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    if let Some(target) = args.target {
        config.target = target;
    }

    if let Some(protocol) = args.protocol {
        config.protocol = protocol;
    }

    if let Some(ports) = args.ports {
        config.ports = ports;
    }

    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    if let Some(queue) = args.queue {
        config.queue = queue;
    }

    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    if args.json {
        config.json = true;
    }

    if args.verbose {
        config.verbose = true;
    }

    Ok(config)
}
