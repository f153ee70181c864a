//! Background solve handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::config::SolverConfig;
use super::runner::{SolveResult, SolverRunner};
use crate::domain::TimetableProblem;
use crate::error::InvalidProblem;

/// Owns one solve running on a background thread.
///
/// This is the handle an external solver runner keeps per submitted
/// problem: create with [`SolverSession::spawn`], optionally
/// [`SolverSession::cancel`], then [`SolverSession::join`] for the
/// result. Cancellation is cooperative — the engine checks the shared
/// flag at each iteration boundary and returns its best snapshot,
/// flagged as cancelled. Dropping the session without joining detaches
/// the thread; the solve still terminates on its own budgets.
///
/// # Examples
///
/// ```no_run
/// use timetable_solver::domain::TimetableProblem;
/// use timetable_solver::solver::{SolverConfig, SolverSession};
///
/// # fn problem() -> TimetableProblem { unimplemented!() }
/// let session = SolverSession::spawn(problem(), SolverConfig::default());
/// session.cancel();
/// let result = session.join().unwrap();
/// assert!(result.cancelled || result.iterations > 0);
/// ```
pub struct SolverSession {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<SolveResult, InvalidProblem>>,
}

impl SolverSession {
    /// Starts solving `problem` on a new thread.
    pub fn spawn(problem: TimetableProblem, config: SolverConfig) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || {
            SolverRunner::run_with_cancel(&problem, &config, Some(flag))
        });
        Self { cancel, handle }
    }

    /// Requests termination at the next iteration boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Whether the solve has terminated (naturally or via cancel).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for termination and returns the result.
    pub fn join(self) -> Result<SolveResult, InvalidProblem> {
        self.handle.join().expect("solver thread panicked")
    }
}
