//! Boundary for long-running external analyses.
//!
//! Model fits and MCMC runs on a reconciled pair are done by other
//! libraries and may take hours. Here they are wrapped as
//! [ExternalAnalysis] implementations that receive a [CancellationToken],
//! and [run_with_deadline] bounds how long the caller waits.

use crate::error::{ReconcileError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Cancellation token shared between a caller and a running analysis.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, not yet cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the operation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns [ReconcileError::Cancelled] once cancelled, for use with `?`
    /// at convenient points of a long loop.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ReconcileError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A long-running computation provided by another library.
///
/// Implementations should poll the token regularly (e.g. once per MCMC
/// generation) and return [ReconcileError::Cancelled] when it trips.
pub trait ExternalAnalysis: Send + 'static {
    /// Input, typically a [ReconciledPair](crate::reconcile::ReconciledPair)
    type Input: Send + 'static;
    /// Result of the analysis
    type Output: Send + 'static;

    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Runs the analysis to completion or cancellation.
    fn run(&self, input: Self::Input, cancel: &CancellationToken) -> Result<Self::Output>;
}

/// Runs an analysis on a worker thread and waits at most `timeout`.
///
/// # Arguments
/// * `analysis` - The analysis to run
/// * `input` - Its input
/// * `timeout` - How long to wait for a result
/// * `cancel` - Token the caller may trip early; also tripped on timeout
///
/// # Returns
/// * `Ok(output)` if the analysis finished in time
/// * [ReconcileError::TimedOut] after the deadline; the token is cancelled
///   so a cooperative analysis stops, its result is discarded
/// * [ReconcileError::Cancelled] or any other error the analysis returned
/// * [ReconcileError::Analysis] if the worker panicked
pub fn run_with_deadline<A: ExternalAnalysis>(
    analysis: A,
    input: A::Input,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<A::Output> {
    let name = analysis.name().to_string();
    let (tx, rx) = mpsc::channel();
    let worker_token = cancel.clone();

    debug!(analysis = %name, ?timeout, "starting external analysis");
    thread::Builder::new()
        .name(format!("analysis-{name}"))
        .spawn(move || {
            let result = analysis.run(input, &worker_token);
            // Receiver may be gone after a timeout
            let _ = tx.send(result);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            debug!(analysis = %name, ok = result.is_ok(), "external analysis finished");
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(analysis = %name, ?timeout, "external analysis timed out, cancelling");
            cancel.cancel();
            Err(ReconcileError::TimedOut {
                name,
                after: timeout,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(ReconcileError::Analysis(format!(
            "worker of '{name}' stopped without result"
        ))),
    }
}
