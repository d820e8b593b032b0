//! The search loop: draw a nonce, hash `seed || nonce`, count leading zeros,
//! compare against the complexity.
//!
//! A solver starts in [`SolverState::Searching`] and has exactly one way out,
//! [`SolverState::Solved`]. There is no attempt cap: the expected number of
//! attempts is `2^complexity` and the worst case is unbounded. Callers that
//! need a bound must stop the solver through a [`StopFlag`]; without one the
//! loop runs until it finds a solution.
use crate::bits::leading_zero_bits;
use crate::buffer::SearchBuffer;
use crate::cancel::StopFlag;
use crate::codec::encode_hex;
use crate::digest::{DigestEngine, Sha512Engine, DIGEST_BITS};
use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// The nonce that satisfied the complexity, frozen at the moment of success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub nonce: Vec<u8>,
    /// Attempts made by this solver, including the successful one.
    pub attempts: u64,
    pub leading_zeros: u32,
}

impl Solution {
    pub fn nonce_hex(&self) -> String {
        encode_hex(&self.nonce)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverState {
    Searching,
    Solved(Solution),
}

/// Owns the search buffer for one session. Nothing else writes to it.
pub struct Solver<D = Sha512Engine, R = OsRng> {
    buffer: SearchBuffer,
    complexity: u32,
    engine: D,
    rng: R,
    attempts: u64,
    progress: Option<Arc<AtomicU64>>,
    state: SolverState,
}

impl Solver {
    /// SHA-512 solver drawing nonces from the operating system's CSPRNG.
    pub fn new(seed: &[u8], complexity: u32) -> Result<Self> {
        Self::with_parts(seed, complexity, Sha512Engine, OsRng)
    }
}

impl<D: DigestEngine, R: RngCore> Solver<D, R> {
    /// Build a solver with an explicit digest engine and nonce source.
    ///
    /// `rng` should be a cryptographically secure generator outside of tests;
    /// a predictable nonce stream lets an observer precompute solutions.
    pub fn with_parts(seed: &[u8], complexity: u32, engine: D, rng: R) -> Result<Self> {
        if seed.is_empty() {
            return Err(Error::InvalidConfig("seed must not be empty".into()));
        }
        if complexity > DIGEST_BITS {
            return Err(Error::InvalidConfig(format!(
                "complexity {complexity} exceeds digest width of {DIGEST_BITS} bits"
            )));
        }
        Ok(Self {
            buffer: SearchBuffer::new(seed),
            complexity,
            engine,
            rng,
            attempts: 0,
            progress: None,
            state: SolverState::Searching,
        })
    }

    /// Count every completed attempt into `progress` as well.
    pub fn with_progress(mut self, progress: Arc<AtomicU64>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.state {
            SolverState::Solved(solution) => Some(solution),
            SolverState::Searching => None,
        }
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn complexity(&self) -> u32 {
        self.complexity
    }

    pub fn seed(&self) -> &[u8] {
        self.buffer.seed_view()
    }

    /// Run one iteration of the search.
    ///
    /// Returns `Some` once solved. After that the solver is terminal: further
    /// calls return the same solution without touching the buffer.
    pub fn attempt(&mut self) -> Result<Option<&Solution>> {
        if matches!(self.state, SolverState::Solved(_)) {
            return Ok(self.solution());
        }

        self.rng
            .try_fill_bytes(self.buffer.nonce_view_mut())
            .map_err(|e| Error::Entropy(e.to_string()))?;
        let digest = self.engine.digest(self.buffer.as_bytes())?;
        self.attempts += 1;
        if let Some(progress) = &self.progress {
            progress.fetch_add(1, Ordering::Relaxed);
        }

        let zeros = leading_zero_bits(&digest);
        trace!(attempt = self.attempts, zeros, "attempt");
        if zeros < self.complexity {
            return Ok(None);
        }

        info!(
            attempts = self.attempts,
            complexity = self.complexity,
            zeros,
            "challenge solved"
        );
        self.state = SolverState::Solved(Solution {
            nonce: self.buffer.nonce_view().to_vec(),
            attempts: self.attempts,
            leading_zeros: zeros,
        });
        Ok(self.solution())
    }

    /// Search until solved, yielding to the async scheduler between attempts.
    pub async fn solve(self) -> Result<Solution> {
        self.solve_until(&StopFlag::new()).await
    }

    /// Like [`solve`](Self::solve), but returns [`Error::Cancelled`] once
    /// `stop` is raised. The flag is checked before every attempt.
    pub async fn solve_until(mut self, stop: &StopFlag) -> Result<Solution> {
        debug!(complexity = self.complexity, "async search started");
        loop {
            if stop.is_raised() {
                warn!(attempts = self.attempts, "search cancelled");
                return Err(Error::Cancelled);
            }
            if let Some(solution) = self.attempt()? {
                return Ok(solution.clone());
            }
            tokio::task::yield_now().await;
        }
    }

    /// Search on the current thread until solved or stopped.
    pub fn solve_blocking(mut self, stop: &StopFlag) -> Result<Solution> {
        debug!(complexity = self.complexity, "blocking search started");
        loop {
            if stop.is_raised() {
                warn!(attempts = self.attempts, "search cancelled");
                return Err(Error::Cancelled);
            }
            if let Some(solution) = self.attempt()? {
                return Ok(solution.clone());
            }
        }
    }
}

/// Recompute SHA-512 over `seed || nonce` and check it against `complexity`.
///
/// The nonce may have any length; verifiers hash the plain concatenation.
pub fn verify_solution(seed: &[u8], nonce: &[u8], complexity: u32) -> Result<bool> {
    let mut input = Vec::with_capacity(seed.len() + nonce.len());
    input.extend_from_slice(seed);
    input.extend_from_slice(nonce);
    let digest = Sha512Engine.digest(&input)?;
    Ok(leading_zero_bits(&digest) >= complexity)
}
