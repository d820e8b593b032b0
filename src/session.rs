//! One challenge-solving session: validated config in, credential out.
//!
//! A session is built fresh for every challenge and never shared. Its solver
//! owns the search buffer; its emitter runs once, after the solver succeeds.
use crate::cancel::StopFlag;
use crate::config::ChallengeConfig;
use crate::credential::{Credential, CredentialEmitter, CredentialHost};
use crate::digest::{DigestEngine, Sha512Engine};
use crate::error::Result;
use crate::solver::{Solution, Solver};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tracing::debug;

pub struct Session<D = Sha512Engine, R = OsRng> {
    solver: Solver<D, R>,
    pending: PendingCredential,
}

impl Session {
    pub fn new(config: ChallengeConfig) -> Result<Self> {
        Self::with_parts(config, Sha512Engine, OsRng)
    }
}

impl<D: DigestEngine, R: RngCore> Session<D, R> {
    /// Validate `config` and set up the search buffer. A malformed seed fails
    /// here, before any search state exists.
    pub fn with_parts(config: ChallengeConfig, engine: D, rng: R) -> Result<Self> {
        let seed = config.validated_seed()?;
        debug!(
            complexity = config.complexity,
            seed_len = seed.len(),
            "session created"
        );
        let solver = Solver::with_parts(&seed, config.complexity, engine, rng)?;
        Ok(Self {
            solver,
            pending: PendingCredential::new(config),
        })
    }

    pub fn with_progress(mut self, progress: Arc<AtomicU64>) -> Self {
        self.solver = self.solver.with_progress(progress);
        self
    }

    pub fn config(&self) -> &ChallengeConfig {
        &self.pending.config
    }

    /// Solve, then persist the credential and trigger the reload.
    pub async fn run<H: CredentialHost + ?Sized>(self, host: &mut H) -> Result<Credential> {
        self.run_until(host, &StopFlag::new()).await
    }

    /// Like [`run`](Self::run), but cancellable. Nothing is emitted when the
    /// search is cancelled.
    pub async fn run_until<H: CredentialHost + ?Sized>(
        self,
        host: &mut H,
        stop: &StopFlag,
    ) -> Result<Credential> {
        let solution = self.solver.solve_until(stop).await?;
        self.pending.emit(&solution, host)
    }

    pub fn run_blocking<H: CredentialHost + ?Sized>(
        self,
        host: &mut H,
        stop: &StopFlag,
    ) -> Result<Credential> {
        let solution = self.solver.solve_blocking(stop)?;
        self.pending.emit(&solution, host)
    }

    /// Separate the solver from the emission step, e.g. to run the search on
    /// a worker thread via [`Solver::spawn`].
    pub fn into_parts(self) -> (Solver<D, R>, PendingCredential) {
        (self.solver, self.pending)
    }
}

/// The emission half of a session, waiting for a solution.
#[derive(Clone, Debug)]
pub struct PendingCredential {
    config: ChallengeConfig,
    emitter: CredentialEmitter,
}

impl PendingCredential {
    fn new(config: ChallengeConfig) -> Self {
        let emitter = CredentialEmitter::from_config(&config);
        Self { config, emitter }
    }

    pub fn emit<H: CredentialHost + ?Sized>(
        &self,
        solution: &Solution,
        host: &mut H,
    ) -> Result<Credential> {
        let credential = Credential::new(&self.config, solution);
        self.emitter.emit(&credential, host)?;
        Ok(credential)
    }
}
