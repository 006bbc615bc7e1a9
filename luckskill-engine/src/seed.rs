//! Per-trial random streams derived from a single user-visible seed.
//!
//! Each trial owns a private `ChaCha20Rng` so trials can run on any thread in
//! any order and still reproduce bit-for-bit.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::constants::{STREAM_TAG_SWEEP, STREAM_TAG_TRIALS};

/// Domain separating the streams of independent trial sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamScope {
    /// A stand-alone `run_trials` call.
    Trials,
    /// One point of the luck-weight sweep, by grid index.
    SweepPoint(u32),
}

impl StreamScope {
    fn tag(self) -> ([u8; 4], &'static [u8]) {
        match self {
            Self::Trials => (0u32.to_le_bytes(), STREAM_TAG_TRIALS),
            Self::SweepPoint(index) => (index.to_le_bytes(), STREAM_TAG_SWEEP),
        }
    }
}

/// Derive the seed of one trial's stream.
#[must_use]
pub fn derive_stream_seed(base_seed: u64, scope: StreamScope, trial: u64) -> u64 {
    let (scope_index, domain_tag) = scope.tag();
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&base_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    mac.update(&scope_index);
    mac.update(&trial.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Random stream owned by a single trial.
#[must_use]
pub fn trial_rng(base_seed: u64, scope: StreamScope, trial: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(base_seed, scope, trial))
}
