//! Per-path random streams.
//!
//! Parallel generation must not interleave draws from one shared generator:
//! the assignment of draws to paths would then depend on thread scheduling.
//! Instead every path index maps to its own stream.

use rand::Rng;

use super::prng::{NormalSource, ProjectorRng};

/// Increment of the SplitMix64 sequence (2^64 / golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hands out one independent draw stream per path.
///
/// Implementations must be deterministic: asking twice for the same path
/// index yields two streams producing the same draws.
pub trait StreamFactory: Sync {
    /// Stream type produced for each path.
    type Stream: NormalSource;

    /// Returns the stream for the path with the given index.
    fn stream(&self, path_index: usize) -> Self::Stream;
}

/// Seeded per-path streams backed by [`ProjectorRng`].
///
/// # Examples
///
/// ```rust
/// use projector_engine::rng::{NormalSource, SeededStreams, StreamFactory};
///
/// let streams = SeededStreams::new(42);
/// let mut first = streams.stream(0);
/// let mut second = streams.stream(1);
/// assert_ne!(first.next_normal(), second.next_normal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededStreams {
    base_seed: u64,
}

impl SeededStreams {
    /// Creates a stream family rooted at `base_seed`.
    #[inline]
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Returns the base seed.
    #[inline]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }
}

impl StreamFactory for SeededStreams {
    type Stream = ProjectorRng;

    #[inline]
    fn stream(&self, path_index: usize) -> ProjectorRng {
        ProjectorRng::from_seed(path_seed(self.base_seed, path_index))
    }
}

/// Derives the seed of a single path's stream.
///
/// Applies the SplitMix64 finaliser to `base_seed + (path_index + 1) * γ`, so
/// neighbouring path indices land on well-separated seeds.
#[inline]
pub fn path_seed(base_seed: u64, path_index: usize) -> u64 {
    let offset = (path_index as u64).wrapping_add(1).wrapping_mul(GOLDEN_GAMMA);
    let mut z = base_seed.wrapping_add(offset);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Largest seed [`fresh_seed`] returns, `2^53 - 1`.
///
/// Seeds travel as JSON numbers; anything above this loses precision in an
/// IEEE double and could not be sent back by a JavaScript client.
pub const MAX_FRESH_SEED: u64 = (1 << 53) - 1;

/// Draws a base seed from operating-system seeded entropy.
///
/// Used when the caller does not pin a seed; the returned value is reported
/// alongside the results so the run can be replayed. Always at most
/// [`MAX_FRESH_SEED`].
#[inline]
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen_range(0..=MAX_FRESH_SEED)
}
