//! # Random Number Generation Infrastructure
//!
//! Random draw sources for the trajectory generator. The generator never
//! touches an ambient global RNG: every draw comes from a source passed in
//! explicitly, which is what makes runs replayable.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: All generators support seeding for deterministic sequences
//! - **Independence**: Each path owns its own stream, derived from a base seed
//!   and the path index, so parallel scheduling cannot change the output
//! - **Static dispatch**: Sources are generic parameters, not `Box<dyn Trait>`
//!
//! ## Module Structure
//!
//! - [`prng`]: Seeded PRNG wrapper and the [`NormalSource`] trait
//! - [`streams`]: Per-path stream derivation ([`StreamFactory`], [`SeededStreams`])
//!
//! ## Usage Example
//!
//! ```rust
//! use projector_engine::rng::{NormalSource, SeededStreams, StreamFactory};
//!
//! let streams = SeededStreams::new(12345);
//!
//! // Path 7 always receives the same stream for the same base seed
//! let mut a = streams.stream(7);
//! let mut b = streams.stream(7);
//! assert_eq!(a.next_normal(), b.next_normal());
//! ```

mod prng;
mod streams;

// Public re-exports
pub use prng::{NormalSource, ProjectorRng};
pub use streams::{fresh_seed, path_seed, SeededStreams, StreamFactory, MAX_FRESH_SEED};
