use crate::credential::HostError;

/// Errors surfaced by a challenge-solving session.
///
/// Every variant is terminal for the session that produced it; nothing in this
/// crate retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed hex: {0}")]
    Format(#[from] hex::FromHexError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("digest failed: {0}")]
    Digest(String),
    #[error("random source failed: {0}")]
    Entropy(String),
    #[error("solver cancelled")]
    Cancelled,
    #[error("credential emission failed: {0}")]
    Emit(#[from] HostError),
    #[error("failed to spawn solver thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("solver channel closed")]
    ChannelClosed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
