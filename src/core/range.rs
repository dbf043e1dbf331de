use crate::error::{Result, ScanError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive range of ports to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Build `[start, end]`, rejecting port 0 and inverted bounds.
    pub fn new(start: u16, end: u16) -> Result<PortRange> {
        if start == 0 || start > end {
            return Err(ScanError::InvalidRange { start, end });
        }
        Ok(PortRange { start, end })
    }

    /// `[1, n]`. `up_to(0)` is the empty range.
    pub fn up_to(n: u16) -> PortRange {
        PortRange { start: 1, end: n }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of ports in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            usize::from(self.end - self.start) + 1
        }
    }

    /// Ports in ascending order.
    pub fn ports(&self) -> impl Iterator<Item = u16> + use<> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    fn default() -> Self {
        PortRange::up_to(1024)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// Parse "start-end" or a single port
impl FromStr for PortRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<PortRange> {
        let s = s.trim();
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|_| ScanError::InvalidPortSpec(s.to_string()))
        };

        match s.split_once('-') {
            Some((start, end)) => PortRange::new(parse(start)?, parse(end)?),
            None => {
                let port = parse(s)?;
                PortRange::new(port, port)
            }
        }
    }
}
