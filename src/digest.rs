use crate::error::Result;
use sha2::{Digest as _, Sha512};

/// Digest width in bytes.
pub const DIGEST_LEN: usize = 64;

/// Digest width in bits; the upper bound for any satisfiable complexity.
pub const DIGEST_BITS: u32 = (DIGEST_LEN * 8) as u32;

pub type Digest = [u8; DIGEST_LEN];

/// A stateless 512-bit hash over the search buffer.
///
/// Implementations must be deterministic. An `Err` is fatal for the session;
/// the solver does not retry or fall back to another algorithm.
pub trait DigestEngine {
    fn digest(&self, input: &[u8]) -> Result<Digest>;
}

/// SHA-512, the digest the gate's verifier expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Engine;

impl DigestEngine for Sha512Engine {
    fn digest(&self, input: &[u8]) -> Result<Digest> {
        let mut hasher = Sha512::new();
        hasher.update(input);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hasher.finalize());
        Ok(out)
    }
}

impl<D: DigestEngine + ?Sized> DigestEngine for &D {
    fn digest(&self, input: &[u8]) -> Result<Digest> {
        (**self).digest(input)
    }
}
