use crate::core::probe::{Dialer, ProbeOutcome, ProbeRequest, Target, probe};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Fixed-size set of probe workers sharing one request queue.
pub struct WorkerPool {
    handles: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Start `workers` tasks.
    ///
    /// Each task claims the next request from the shared queue, so a request
    /// is handled by exactly one worker and there is no fixed port-to-worker
    /// assignment. A task exits once the request stream is closed and empty.
    /// With every worker doing one dial at a time, at most `workers` dials are
    /// in flight.
    pub fn spawn<D: Dialer>(
        workers: usize,
        dialer: Arc<D>,
        target: Target,
        requests: mpsc::Receiver<ProbeRequest>,
        outcomes: mpsc::Sender<ProbeOutcome>,
    ) -> WorkerPool {
        let requests = Arc::new(Mutex::new(requests));

        let handles = (0..workers)
            .map(|id| {
                let dialer = dialer.clone();
                let target = target.clone();
                let requests = requests.clone();
                let outcomes = outcomes.clone();
                tokio::spawn(async move {
                    worker(id, dialer.as_ref(), &target, &requests, &outcomes).await
                })
            })
            .collect();

        // The pool's own sender is dropped here; once every worker exits, the
        // outcome stream closes.
        drop(outcomes);

        WorkerPool { handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit and return the total number of probes run.
    pub async fn join(self) -> usize {
        let mut probed = 0;
        for handle in self.handles {
            match handle.await {
                Ok(count) => probed += count,
                Err(e) => tracing::error!("worker task failed: {}", e),
            }
        }
        probed
    }
}

async fn worker<D: Dialer>(
    id: usize,
    dialer: &D,
    target: &Target,
    requests: &Mutex<mpsc::Receiver<ProbeRequest>>,
    outcomes: &mpsc::Sender<ProbeOutcome>,
) -> usize {
    let mut probed = 0;

    loop {
        // Lock only for the dequeue so other workers can claim while we dial
        let next = requests.lock().await.recv().await;
        let Some(request) = next else {
            break;
        };

        let outcome = probe(dialer, target, request).await;
        probed += 1;

        if outcomes.send(outcome).await.is_err() {
            // Collector is gone, nothing left to report to
            break;
        }
    }

    tracing::trace!(worker = id, probed, "worker exiting");
    probed
}
