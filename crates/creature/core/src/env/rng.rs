//! RNG oracle for deterministic random number generation.
//!
//! Randomness in the core (corpse despawn delays) is derived from a seed built
//! out of the world seed, the world clock and the entity id, so a replay of the
//! same triggers yields the same timers.

use crate::state::{EntityId, Millis};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same value for the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Generate a value in `[min, max)`. Returns `min` for an empty range.
    fn range_exclusive(&self, seed: u64, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        min + (self.next_u32(seed) as u64 % (max - min))
    }
}

/// PCG-XSH-RR generator (64-bit state, 32-bit output).
///
/// - Same seed always produces same output
/// - Single multiply + xorshift + rotate
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed for a random event.
///
/// `context` separates independent rolls made for the same entity at the same
/// instant (0 = despawn delay).
pub fn compute_seed(world_seed: u64, clock: Millis, entity: EntityId, context: u32) -> u64 {
    let mut hash = world_seed;

    hash ^= clock.0.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= entity.0.wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // SplitMix64 finalizer
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
