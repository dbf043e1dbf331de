use crate::core::probe::ProbeRequest;
use crate::core::range::PortRange;
use tokio::sync::{mpsc, watch};

/// Enqueue one request per port of `range`, in ascending order.
///
/// Blocks on the bounded queue when workers fall behind. Dropping `requests`
/// on return closes the stream, which is the only stop signal workers get.
/// Returns how many requests were enqueued; fewer than `range.len()` only if
/// the scan was cancelled.
pub async fn feed(
    range: PortRange,
    requests: mpsc::Sender<ProbeRequest>,
    mut cancel: watch::Receiver<bool>,
) -> usize {
    let mut sent = 0;

    for port in range.ports() {
        tokio::select! {
            biased;
            Ok(_) = cancel.wait_for(|cancelled| *cancelled) => break,
            result = requests.send(ProbeRequest { port }) => {
                if result.is_err() {
                    // Every worker is gone
                    break;
                }
                sent += 1;
            }
        }
    }

    tracing::debug!(sent, total = range.len(), "feeder finished");
    sent
}
