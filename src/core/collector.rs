use crate::core::probe::ProbeOutcome;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Open ports of a finished scan, strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScanResult {
    open: Vec<u16>,
}

impl ScanResult {
    /// Sorts and deduplicates, so arrival order never leaks out.
    pub fn from_ports(mut ports: Vec<u16>) -> ScanResult {
        ports.sort_unstable();
        ports.dedup();
        ScanResult { open: ports }
    }

    pub fn ports(&self) -> &[u16] {
        &self.open
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn contains(&self, port: u16) -> bool {
        self.open.binary_search(&port).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u16> {
        self.open.iter()
    }
}

impl IntoIterator for ScanResult {
    type Item = u16;
    type IntoIter = std::vec::IntoIter<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.open.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a u16;
    type IntoIter = std::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.open.iter()
    }
}

/// What the collector hands back once it stops receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub result: ScanResult,
    /// Outcomes actually received; equals the expected count unless the
    /// outcome stream closed early.
    pub received: usize,
}

/// Gathers outcomes into a `ScanResult`.
///
/// Termination is count based: the collector stops after exactly `expected`
/// outcomes. Workers share the outcome sender, so stream closure is only a
/// fallback for when every worker has already gone away.
#[derive(Debug, Clone, Copy)]
pub struct Collector {
    expected: usize,
}

impl Collector {
    pub fn new(expected: usize) -> Collector {
        Collector { expected }
    }

    pub async fn collect(self, outcomes: &mut mpsc::Receiver<ProbeOutcome>) -> Collected {
        let mut open = Vec::new();
        let mut received = 0;

        while received < self.expected {
            let Some(outcome) = outcomes.recv().await else {
                tracing::warn!(
                    expected = self.expected,
                    received,
                    "outcome stream closed early"
                );
                break;
            };
            received += 1;

            if let ProbeOutcome::Open(port) = outcome {
                open.push(port);
            }
        }

        Collected {
            result: ScanResult::from_ports(open),
            received,
        }
    }

    /// Run `collect` as a task and signal `done` once with the sorted result.
    pub fn spawn(
        self,
        mut outcomes: mpsc::Receiver<ProbeOutcome>,
        done: oneshot::Sender<Collected>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let collected = self.collect(&mut outcomes).await;
            tracing::debug!(
                received = collected.received,
                open = collected.result.len(),
                "collector finished"
            );
            if done.send(collected).is_err() {
                tracing::warn!("scan caller went away before completion");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_sorted_and_deduped() {
        let result = ScanResult::from_ports(vec![443, 22, 80, 22]);
        assert_eq!(result.ports(), &[22, 80, 443]);
        assert!(result.contains(80));
        assert!(!result.contains(81));
        assert_eq!(result.iter().copied().collect::<Vec<_>>(), vec![22, 80, 443]);
    }

    #[test]
    fn test_result_json() {
        let result = ScanResult::from_ports(vec![80, 22]);
        assert_eq!(serde_json::to_string(&result).unwrap(), "[22,80]");
    }

    #[tokio::test]
    async fn test_filters_and_sorts() {
        let (tx, mut rx) = mpsc::channel(8);
        for outcome in [
            ProbeOutcome::Open(443),
            ProbeOutcome::Closed(1),
            ProbeOutcome::Open(22),
            ProbeOutcome::Closed(2),
            ProbeOutcome::Open(80),
        ] {
            tx.send(outcome).await.unwrap();
        }

        let collected = Collector::new(5).collect(&mut rx).await;
        assert_eq!(collected.received, 5);
        assert_eq!(collected.result.ports(), &[22, 80, 443]);
    }

    #[tokio::test]
    async fn test_stops_at_expected_count() {
        let (tx, mut rx) = mpsc::channel(8);
        for port in 1..=6 {
            tx.send(ProbeOutcome::Open(port)).await.unwrap();
        }

        // Sender still alive: termination must come from the count alone
        let collected = Collector::new(4).collect(&mut rx).await;
        assert_eq!(collected.received, 4);
        assert_eq!(collected.result.ports(), &[1, 2, 3, 4]);
        assert_eq!(rx.recv().await, Some(ProbeOutcome::Open(5)));
        drop(tx);
    }

    #[tokio::test]
    async fn test_zero_expected_receives_nothing() {
        let (tx, mut rx) = mpsc::channel(1);
        tx.send(ProbeOutcome::Open(1)).await.unwrap();

        let collected = Collector::new(0).collect(&mut rx).await;
        assert_eq!(collected.received, 0);
        assert!(collected.result.is_empty());
        // Nothing was consumed
        assert_eq!(rx.recv().await, Some(ProbeOutcome::Open(1)));
    }

    #[tokio::test]
    async fn test_early_close_reports_shortfall() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(ProbeOutcome::Open(9)).await.unwrap();
        drop(tx);

        let collected = Collector::new(3).collect(&mut rx).await;
        assert_eq!(collected.received, 1);
        assert_eq!(collected.result.ports(), &[9]);
    }

    #[tokio::test]
    async fn test_spawn_signals_completion() {
        let (tx, rx) = mpsc::channel(4);
        let (done_tx, done_rx) = oneshot::channel();

        let handle = Collector::new(2).spawn(rx, done_tx);
        tx.send(ProbeOutcome::Closed(7)).await.unwrap();
        tx.send(ProbeOutcome::Closed(8)).await.unwrap();

        let collected = done_rx.await.unwrap();
        assert_eq!(collected.received, 2);
        assert!(collected.result.is_empty());
        handle.await.unwrap();
    }
}
