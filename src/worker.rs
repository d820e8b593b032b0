//! Run a solver on a dedicated OS thread with an explicit stop signal, for
//! hosts without a cooperative scheduler.
use crate::cancel::StopFlag;
use crate::digest::DigestEngine;
use crate::error::{Error, Result};
use crate::solver::{Solution, Solver};
use flume::{Receiver, RecvTimeoutError, TryRecvError};
use rand::RngCore;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Handle to a solver running on its own thread.
///
/// Dropping the handle without calling [`cancel`](Self::cancel) leaves the
/// search running until it finds a solution.
#[derive(Debug)]
pub struct SolverHandle {
    stop: Arc<StopFlag>,
    rx: Receiver<Result<Solution>>,
    join: Option<thread::JoinHandle<()>>,
}

impl<D, R> Solver<D, R>
where
    D: DigestEngine + Send + 'static,
    R: RngCore + Send + 'static,
{
    /// Move the solver onto a new thread and start searching.
    pub fn spawn(self) -> Result<SolverHandle> {
        let stop = Arc::new(StopFlag::new());
        let (tx, rx) = flume::bounded(1);
        let worker_stop = stop.clone();
        let join = thread::Builder::new()
            .name("botbarrier-solver".into())
            .spawn(move || {
                let result = self.solve_blocking(&worker_stop);
                let _ = tx.send(result);
            })
            .map_err(Error::Spawn)?;
        Ok(SolverHandle {
            stop,
            rx,
            join: Some(join),
        })
    }
}

impl SolverHandle {
    /// Ask the worker to stop before its next attempt.
    pub fn cancel(&self) {
        self.stop.raise();
    }

    /// Block until the worker reports.
    pub fn wait(mut self) -> Result<Solution> {
        let received = self.rx.recv();
        self.join_worker()?;
        received.map_err(|_| Error::ChannelClosed)?
    }

    /// Block for at most `timeout`. On expiry the worker is cancelled and
    /// [`Error::Cancelled`] is returned.
    pub fn wait_timeout(mut self, timeout: Duration) -> Result<Solution> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.join_worker()?;
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                self.cancel();
                self.join_worker()?;
                Err(Error::Cancelled)
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.join_worker()?;
                Err(Error::ChannelClosed)
            }
        }
    }

    /// Non-blocking poll; `None` while the worker is still searching.
    pub fn try_result(&mut self) -> Option<Result<Solution>> {
        let result = match self.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(Error::ChannelClosed),
        };
        Some(self.join_worker().and(result))
    }

    /// A panicked worker surfaces as [`Error::ChannelClosed`].
    fn join_worker(&mut self) -> Result<()> {
        let Some(handle) = self.join.take() else {
            return Ok(());
        };
        handle.join().map_err(|_| {
            warn!("solver thread panicked");
            Error::ChannelClosed
        })
    }
}
