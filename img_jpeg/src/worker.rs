//! Background run controller.
//!
//! A run executes on its own thread and talks to the foreground only through
//! a channel of [`RunEvent`]s. The controller allows one run at a time; the
//! busy flag is released when the worker finishes, whether it completed or
//! crashed.

use crate::conversion_api::ConversionRequest;
use crate::errors::RunError;
use shared_utils::common_utils::panic_message;
use shared_utils::{ConversionResult, ProgressEvent};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

/// Worker to foreground messages.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Progress(ProgressEvent),
    Finished(ConversionResult),
    Crashed(String),
}

/// How a run ended, as seen by the foreground.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(ConversionResult),
    Crashed(String),
}

/// Progress sink handed to a job; forwards events to the foreground.
#[derive(Clone)]
pub struct ProgressSender {
    tx: Sender<RunEvent>,
}

impl ProgressSender {
    pub fn report(&self, event: ProgressEvent) {
        // The foreground may have stopped listening; the run still completes.
        let _ = self.tx.send(RunEvent::Progress(event));
    }
}

// Clears the busy flag when the worker closure ends or is dropped unrun.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunController {
    busy: Arc<AtomicBool>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a run is active; the start control should be disabled.
    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn start(&self, request: ConversionRequest) -> Result<RunHandle, RunError> {
        self.start_with(move |progress| request.run(|event| progress.report(event)))
    }

    /// Runs an arbitrary job under the same one-at-a-time and crash rules.
    pub fn start_with<J>(&self, job: J) -> Result<RunHandle, RunError>
    where
        J: FnOnce(&ProgressSender) -> ConversionResult + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunError::AlreadyRunning);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("img-jpeg-worker".to_string())
            .spawn(move || {
                let progress = ProgressSender { tx: tx.clone() };
                let final_event = match panic::catch_unwind(AssertUnwindSafe(|| job(&progress))) {
                    Ok(result) => {
                        info!(
                            succeeded = result.succeeded_count,
                            failed = result.failures.len(),
                            "Run finished"
                        );
                        RunEvent::Finished(result)
                    }
                    Err(payload) => {
                        let message = panic_message(&*payload);
                        error!(error = %message, "Run crashed");
                        RunEvent::Crashed(message)
                    }
                };
                // Release before reporting so a listener that sees the final
                // event can start the next run immediately.
                drop(guard);
                let _ = tx.send(final_event);
            })
            .map_err(RunError::Spawn)?;

        Ok(RunHandle {
            events: rx,
            worker: Some(worker),
        })
    }
}

/// Foreground side of an active run.
pub struct RunHandle {
    events: Receiver<RunEvent>,
    worker: Option<JoinHandle<()>>,
}

impl RunHandle {
    /// Blocking iterator over events; ends once the worker has exited.
    pub fn events(&self) -> mpsc::Iter<'_, RunEvent> {
        self.events.iter()
    }

    /// Drains the run, passing each progress event to `on_progress`.
    pub fn wait_with<F>(mut self, mut on_progress: F) -> RunOutcome
    where
        F: FnMut(ProgressEvent),
    {
        let mut outcome = None;
        for event in self.events() {
            match event {
                RunEvent::Progress(p) => on_progress(p),
                RunEvent::Finished(result) => outcome = Some(RunOutcome::Completed(result)),
                RunEvent::Crashed(message) => outcome = Some(RunOutcome::Crashed(message)),
            }
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        outcome.unwrap_or_else(|| {
            RunOutcome::Crashed("worker exited without reporting a result".to_string())
        })
    }

    pub fn wait(self) -> RunOutcome {
        self.wait_with(|_| {})
    }
}
