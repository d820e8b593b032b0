use crate::digest::{Digest, DigestEngine};
use crate::error::{Error, Result};
use rand::RngCore;
use std::cell::Cell;

/// Fills every request by cycling over a fixed byte pattern.
pub struct FixedRng {
    pattern: Vec<u8>,
}

impl FixedRng {
    pub fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
        }
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for (dst, src) in dest.iter_mut().zip(self.pattern.iter().cycle()) {
            *dst = *src;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// A random source that always fails.
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {}

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new("entropy source unavailable"))
    }
}

/// A digest engine that always fails and counts how often it was asked.
pub struct FailingEngine<'a> {
    pub calls: &'a Cell<usize>,
}

impl DigestEngine for FailingEngine<'_> {
    fn digest(&self, _input: &[u8]) -> Result<Digest> {
        self.calls.set(self.calls.get() + 1);
        Err(Error::Digest("hashing primitive unavailable".into()))
    }
}

/// A digest engine that panics, standing in for a crashed hashing primitive.
pub struct PanickingEngine;

impl DigestEngine for PanickingEngine {
    fn digest(&self, _input: &[u8]) -> Result<Digest> {
        panic!("hashing primitive crashed")
    }
}
