use crate::core::ScanReport;
use std::io::{self, Write};

pub struct OutputHandler;

impl OutputHandler {
    pub fn new() -> OutputHandler {
        OutputHandler
    }

    /// Print one `"<port> open"` line per open port to stdout.
    pub fn out_results(&self, report: &ScanReport) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = self.write_results(report, &mut out) {
            tracing::error!("failed to write results: {}", e);
        }
    }

    pub fn write_results<W: Write>(&self, report: &ScanReport, out: &mut W) -> io::Result<()> {
        for port in &report.open {
            writeln!(out, "{} open", port)?;
        }
        out.flush()
    }

    /// Print the whole report as pretty JSON to stdout.
    pub fn out_json(&self, report: &ScanReport) -> Result<(), crate::error::ScanError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_json(report, &mut out)
    }

    pub fn write_json<W: Write>(
        &self,
        report: &ScanReport,
        out: &mut W,
    ) -> Result<(), crate::error::ScanError> {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PortRange, Protocol, ScanResult};
    use std::time::Duration;

    fn report(open: Vec<u16>) -> ScanReport {
        ScanReport {
            host: "scanme.nmap.org".to_string(),
            protocol: Protocol::Tcp,
            range: PortRange::up_to(1024),
            open: ScanResult::from_ports(open),
            probed: 1024,
            cancelled: false,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_plain_lines() {
        let mut buf = Vec::new();
        OutputHandler::new()
            .write_results(&report(vec![443, 22, 80]), &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "22 open\n80 open\n443 open\n");
    }

    #[test]
    fn test_plain_empty() {
        let mut buf = Vec::new();
        OutputHandler::new().write_results(&report(vec![]), &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_json() {
        let mut buf = Vec::new();
        OutputHandler::new().write_json(&report(vec![80, 22]), &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["open"], serde_json::json!([22, 80]));
        assert_eq!(value["range"]["start"], 1);
        assert_eq!(value["range"]["end"], 1024);
        assert_eq!(value["elapsed_ms"], 1500);
        assert_eq!(value["cancelled"], false);
    }
}
