//! Client-side solver for bot-barrier proof-of-work gates.
//!
//! The server issues a hex seed, an opaque authentication tag, a complexity
//! (required leading zero bits of SHA-512) and a credential lifetime. The
//! client searches for a nonce of the seed's length such that
//! `SHA-512(seed || nonce)` meets the complexity, then hands
//! `(seed, nonce, tag)` back as three cookies and reloads.
//!
//! ```no_run
//! use botbarrier::{ChallengeConfigBuilder, MemoryHost, Session};
//!
//! # async fn demo() -> botbarrier::Result<()> {
//! let config = ChallengeConfigBuilder::default()
//!     .seed_hex("00112233445566778899aabbccddeeff")
//!     .authentication_tag("3f9a")
//!     .complexity(16)
//!     .credential_ttl_secs(300)
//!     .build_validated()?;
//! let mut host = MemoryHost::new();
//! let credential = Session::new(config)?.run(&mut host).await?;
//! println!("solved with nonce {}", credential.nonce_hex);
//! # Ok(())
//! # }
//! ```
//!
//! The search has no attempt cap. Expected cost is `2^complexity` hashes and
//! the worst case is unbounded; use [`StopFlag`] or
//! [`SolverHandle::wait_timeout`] to bound it.

pub mod bits;
pub mod buffer;
pub mod cancel;
pub mod codec;
pub mod config;
pub mod credential;
pub mod digest;
pub mod error;
pub mod session;
pub mod solver;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_util;

pub use bits::{leading_zero_bits, meets_leading_zero_bits};
pub use buffer::SearchBuffer;
pub use cancel::StopFlag;
pub use codec::{decode_hex, encode_hex};
pub use config::{ChallengeConfig, ChallengeConfigBuilder};
pub use credential::{
    Credential, CredentialEmitter, CredentialHost, CredentialRecord, HostError, MemoryHost,
    WriterHost,
};
pub use digest::{Digest, DigestEngine, Sha512Engine, DIGEST_BITS, DIGEST_LEN};
pub use error::{Error, Result};
pub use session::{PendingCredential, Session};
pub use solver::{verify_solution, Solution, Solver, SolverState};
pub use worker::SolverHandle;
