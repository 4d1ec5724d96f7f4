//! Completion signals for the prover stages.
//!
//! Every stage waits on the signals of its predecessors, runs, then fires its
//! own signal exactly once. The first error is recorded and wakes every
//! waiter, which then gives up with [`PlonkError::Cancelled`].

use crate::errors::{PlonkError, Result};
use ark_std::{end_timer, start_timer};
use parking_lot::{Condvar, Mutex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Weak,
};

/// The prover stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stage {
    Solve,
    InitBlinding,
    CommitLro,
    CompleteQk,
    DeriveGammaBeta,
    BuildZ,
    ComputeQuotient,
    DeriveZeta,
    BatchOpen,
}

const NUM_STAGES: usize = 9;

#[derive(Debug, Default)]
struct GraphState {
    done: [bool; NUM_STAGES],
    error: Option<PlonkError>,
}

#[derive(Debug, Default)]
struct Signal {
    state: Mutex<GraphState>,
    condvar: Condvar,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    listeners: Mutex<Vec<Weak<Signal>>>,
}

/// Handle to abort a running proof from the outside.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every proof using this token to stop. Stages blocked on a
    /// predecessor wake up immediately.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        for signal in self.inner.listeners.lock().iter().filter_map(Weak::upgrade) {
            let _state = signal.state.lock();
            signal.condvar.notify_all();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    fn register(&self, signal: &Arc<Signal>) {
        let mut listeners = self.inner.listeners.lock();
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(Arc::downgrade(signal));
    }
}

/// The dependency graph of one proof.
pub(crate) struct TaskGraph {
    signal: Arc<Signal>,
    token: Option<CancellationToken>,
}

impl TaskGraph {
    pub(crate) fn new(token: Option<CancellationToken>) -> Self {
        let signal = Arc::new(Signal::default());
        if let Some(token) = token.as_ref() {
            token.register(&signal);
        }
        Self { signal, token }
    }

    fn cancelled(&self, state: &GraphState) -> bool {
        state.error.is_some() || self.token.as_ref().map_or(false, |t| t.is_cancelled())
    }

    /// Block until every stage in `deps` has completed.
    pub(crate) fn wait(&self, deps: &[Stage]) -> Result<()> {
        let mut state = self.signal.state.lock();
        loop {
            if self.cancelled(&state) {
                return Err(PlonkError::Cancelled);
            }
            if deps.iter().all(|d| state.done[*d as usize]) {
                return Ok(());
            }
            self.signal.condvar.wait(&mut state);
        }
    }

    fn fire(&self, stage: Stage) {
        let mut state = self.signal.state.lock();
        state.done[stage as usize] = true;
        self.signal.condvar.notify_all();
    }

    fn fail(&self, err: PlonkError) {
        let mut state = self.signal.state.lock();
        if state.error.is_none() {
            state.error = Some(err);
        }
        self.signal.condvar.notify_all();
    }

    /// Run `task` once `deps` are done and signal the outcome. A panicking
    /// task counts as a failed stage.
    pub(crate) fn run<T>(&self, stage: Stage, deps: &[Stage], task: T)
    where
        T: FnOnce() -> Result<()>,
    {
        let result = self.wait(deps).and_then(|_| {
            let stage_time = start_timer!(|| format!("{:?}", stage));
            let res = catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|_| {
                Err(PlonkError::Message(format!("stage {:?} panicked", stage)))
            });
            end_timer!(stage_time);
            res
        });
        match result {
            Ok(()) => self.fire(stage),
            Err(e) => self.fail(e),
        }
    }

    /// The first error of the run, if any.
    pub(crate) fn finish(self) -> Result<()> {
        let mut state = self.signal.state.lock();
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        if self.token.as_ref().map_or(false, |t| t.is_cancelled()) {
            return Err(PlonkError::Cancelled);
        }
        Ok(())
    }
}
