/// Hash input for one session: `seed || nonce`, each half `seed.len()` bytes.
///
/// The seed half is written once at construction. Only the nonce half is
/// handed out mutably, so the two views can never alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchBuffer {
    bytes: Vec<u8>,
    seed_len: usize,
}

impl SearchBuffer {
    /// Allocate `2 * seed.len()` bytes and copy `seed` into the first half.
    /// The nonce half starts zeroed.
    pub fn new(seed: &[u8]) -> Self {
        let mut bytes = vec![0u8; seed.len() * 2];
        bytes[..seed.len()].copy_from_slice(seed);
        Self {
            bytes,
            seed_len: seed.len(),
        }
    }

    pub fn seed_view(&self) -> &[u8] {
        &self.bytes[..self.seed_len]
    }

    pub fn nonce_view(&self) -> &[u8] {
        &self.bytes[self.seed_len..]
    }

    pub fn nonce_view_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[self.seed_len..]
    }

    /// Length of each half.
    pub fn half_len(&self) -> usize {
        self.seed_len
    }

    /// The full `seed || nonce` byte sequence fed to the digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for SearchBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
