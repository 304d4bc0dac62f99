//! Background diagram rendering.
//!
//! A single worker thread renders one request at a time. Requests carry the
//! slot index and a generation counter; the receiver must drop results whose
//! generation no longer matches the slot's current one, so a superseded
//! render can never overwrite a newer result.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use super::DiagramConfig;

/// A render job for one diagram slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub slot: usize,
    pub generation: u64,
    pub source: String,
}

/// Outcome of one render job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub slot: usize,
    pub generation: u64,
    /// Rendered art lines, or the error message for the error panel.
    pub outcome: Result<Vec<String>, String>,
}

/// Handle to the render thread.
///
/// Dropping the handle closes the request channel, which ends the worker
/// loop after the in-flight job. The thread is detached so a hung render
/// cannot block shutdown.
pub struct DiagramWorker {
    tx: Sender<RenderRequest>,
    rx: Receiver<RenderResult>,
}

impl DiagramWorker {
    /// Spawn the render thread.
    ///
    /// # Errors
    /// Returns an error if the OS refuses to create the thread.
    pub fn spawn(config: DiagramConfig) -> std::io::Result<Self> {
        let (req_tx, req_rx) = channel::<RenderRequest>();
        let (res_tx, res_rx) = channel::<RenderResult>();

        thread::Builder::new()
            .name("diagram-render".to_string())
            .spawn(move || {
                while let Ok(req) = req_rx.recv() {
                    tracing::debug!(slot = req.slot, generation = req.generation, "rendering");
                    let outcome =
                        super::render(&req.source, &config).map_err(|err| err.to_string());
                    let result = RenderResult {
                        slot: req.slot,
                        generation: req.generation,
                        outcome,
                    };
                    if res_tx.send(result).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            tx: req_tx,
            rx: res_rx,
        })
    }

    /// Queue a render job. A dead worker is ignored; the slot simply stays
    /// in its pending state.
    pub fn submit(&self, request: RenderRequest) {
        if self.tx.send(request).is_err() {
            tracing::warn!("diagram worker is gone, dropping render request");
        }
    }

    /// Drain all finished results without blocking.
    pub fn drain_results(&self) -> Vec<RenderResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_results(worker: &DiagramWorker, count: usize) -> Vec<RenderResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut results = Vec::new();
        while results.len() < count && Instant::now() < deadline {
            results.extend(worker.drain_results());
            std::thread::sleep(Duration::from_millis(10));
        }
        results
    }

    #[test]
    fn test_worker_renders_valid_source() {
        let worker = DiagramWorker::spawn(DiagramConfig::default()).expect("spawn");
        worker.submit(RenderRequest {
            slot: 0,
            generation: 1,
            source: "flowchart TD\n  A[Start] --> B[End]".to_string(),
        });
        let results = wait_for_results(&worker, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slot, 0);
        assert_eq!(results[0].generation, 1);
        let lines = results[0].outcome.as_ref().expect("ok");
        assert!(lines.iter().any(|l| l.contains("Start")));
    }

    #[test]
    fn test_worker_reports_error_message() {
        let worker = DiagramWorker::spawn(DiagramConfig::default()).expect("spawn");
        worker.submit(RenderRequest {
            slot: 2,
            generation: 7,
            source: "gantt\n  title x".to_string(),
        });
        let results = wait_for_results(&worker, 1);
        assert_eq!(results.len(), 1);
        let err = results[0].outcome.as_ref().expect_err("error");
        assert!(err.contains("unsupported"));
    }

    #[test]
    fn test_worker_preserves_request_order_per_slot() {
        let worker = DiagramWorker::spawn(DiagramConfig::default()).expect("spawn");
        for generation in 1..=3 {
            worker.submit(RenderRequest {
                slot: 0,
                generation,
                source: format!("flowchart TD\n  A[Gen{generation}]"),
            });
        }
        let results = wait_for_results(&worker, 3);
        let generations: Vec<u64> = results.iter().map(|r| r.generation).collect();
        assert_eq!(generations, [1, 2, 3]);
    }

    #[test]
    fn test_drain_on_idle_worker_is_empty() {
        let worker = DiagramWorker::spawn(DiagramConfig::default()).expect("spawn");
        assert!(worker.drain_results().is_empty());
    }
}
