use crate::core::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT, DEFAULT_WORKERS, PortRange, Protocol, ScanConfig,
};
use crate::error::{Result, ScanError};
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Config {
    pub target: String,
    pub protocol: String,
    pub ports: String,
    pub workers: usize,
    pub queue: usize,
    pub timeout: u64,
    pub json: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: String::new(),
            protocol: "tcp".to_string(),
            ports: "1-1024".to_string(),
            workers: DEFAULT_WORKERS,
            queue: DEFAULT_QUEUE_CAPACITY,
            timeout: DEFAULT_TIMEOUT.as_millis() as u64,
            json: false,
            verbose: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ScanError::Config(format!("cannot read '{}': {}", path, e)))?;
        Self::from_yaml(&content)
    }

    /// Merge the keys present in `content` over the defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ScanError::Config(e.to_string()))?;

        let mut config = Config::default();

        let map = match yaml_value {
            serde_yaml::Value::Mapping(map) => map,
            serde_yaml::Value::Null => return Ok(config),
            _ => return Err(ScanError::Config("expected a mapping at top level".to_string())),
        };

        for (key, value) in map {
            let serde_yaml::Value::String(key) = key else {
                continue;
            };
            let invalid = |e: serde_yaml::Error| ScanError::Config(format!("{}: {}", key, e));

            match key.as_str() {
                "target" => config.target = serde_yaml::from_value(value).map_err(invalid)?,
                "protocol" => config.protocol = serde_yaml::from_value(value).map_err(invalid)?,
                "ports" => {
                    // Accept both `ports: 1-1024` and `ports: 80`
                    config.ports = match value {
                        serde_yaml::Value::Number(n) => n.to_string(),
                        other => serde_yaml::from_value(other).map_err(invalid)?,
                    }
                }
                "workers" => config.workers = serde_yaml::from_value(value).map_err(invalid)?,
                "queue" => config.queue = serde_yaml::from_value(value).map_err(invalid)?,
                "timeout" => config.timeout = serde_yaml::from_value(value).map_err(invalid)?,
                "json" => config.json = serde_yaml::from_value(value).map_err(invalid)?,
                "verbose" => config.verbose = serde_yaml::from_value(value).map_err(invalid)?,
                other => {
                    return Err(ScanError::Config(format!("unknown config key '{}'", other)));
                }
            }
        }

        Ok(config)
    }

    /// Parse the string fields and build the scan configuration.
    pub fn to_scan_config(&self) -> Result<ScanConfig> {
        let config = ScanConfig {
            host: self.target.clone(),
            protocol: self.protocol.parse::<Protocol>()?,
            range: self.ports.parse::<PortRange>()?,
            workers: self.workers,
            queue_capacity: self.queue,
            timeout: Duration::from_millis(self.timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_merges_over_defaults() {
        let config =
            Config::from_yaml("target: scanme.nmap.org\nworkers: 10\nports: 20-25\n").unwrap();
        assert_eq!(config.target, "scanme.nmap.org");
        assert_eq!(config.workers, 10);
        assert_eq!(config.ports, "20-25");
        assert_eq!(config.queue, 100);
        assert_eq!(config.timeout, 2000);
        assert_eq!(config.protocol, "tcp");
    }

    #[test]
    fn test_yaml_numeric_port() {
        let config = Config::from_yaml("ports: 443\n").unwrap();
        assert_eq!(config.ports, "443");
    }

    #[test]
    fn test_yaml_empty_document() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_yaml_bad_value() {
        assert!(matches!(
            Config::from_yaml("workers: lots\n"),
            Err(ScanError::Config(_))
        ));
        assert!(matches!(
            Config::from_yaml("- a\n- b\n"),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let err = Config::from_yaml("target: 127.0.0.1\nworker: 5\nports: 1-2\n").unwrap_err();
        match err {
            ScanError::Config(msg) => assert!(msg.contains("'worker'"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.yaml");
        fs::write(&path, "target: 10.0.0.1\ntimeout: 500\n").unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.target, "10.0.0.1");
        assert_eq!(config.timeout, 500);

        assert!(matches!(
            Config::from_file(dir.path().join("missing.yaml").to_str().unwrap()),
            Err(ScanError::Config(_))
        ));
    }

    #[test]
    fn test_to_scan_config() {
        let config = Config {
            target: "localhost".to_string(),
            ports: "1-100".to_string(),
            workers: 5,
            ..Config::default()
        };
        let scan = config.to_scan_config().unwrap();
        assert_eq!(scan.range, PortRange::up_to(100));
        assert_eq!(scan.workers, 5);
        assert_eq!(scan.timeout, Duration::from_millis(2000));
    }

    #[test]
    fn test_to_scan_config_rejects() {
        let base = Config {
            target: "localhost".to_string(),
            ..Config::default()
        };

        let inverted = Config {
            ports: "100-1".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            inverted.to_scan_config(),
            Err(ScanError::InvalidRange { .. })
        ));

        let udp = Config {
            protocol: "udp".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            udp.to_scan_config(),
            Err(ScanError::UnsupportedProtocol(_))
        ));

        let idle = Config {
            workers: 0,
            ..base.clone()
        };
        assert!(matches!(idle.to_scan_config(), Err(ScanError::NoWorkers)));

        let no_target = Config::default();
        assert!(matches!(
            no_target.to_scan_config(),
            Err(ScanError::EmptyTarget)
        ));
    }
}
