//! Random sources for nonce generation

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Source of nonce seed bytes.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill(&self, dest: &mut [u8]);
}

/// Per-thread CSPRNG, periodically reseeded from the operating system.
///
/// Each caller draws from its own thread's generator, so concurrent signers
/// never contend on a lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn fill(&self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

/// Deterministic generator for tests and reproducible fixtures.
///
/// Never use this to sign real traffic: the nonce sequence is predictable.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    /// Create a generator from a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, dest: &mut [u8]) {
        self.rng.lock().fill_bytes(dest);
    }
}
