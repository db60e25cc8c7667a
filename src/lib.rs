//! Monte Carlo simulations of three classic probability puzzles:
//!
//! - [`family`]: the two-child paradox — a man has two kids and at
//!   least one is a girl (later: a girl named Julie); what are the
//!   chances both are girls?
//! - [`boxes`]: 100 people each open at most 50 of 100 numbered boxes,
//!   following the cycle-chasing strategy, trying to find their own
//!   number.
//! - [`doors`]: the three-door game with a goat-revealing host and a
//!   player who always switches.
//!
//! Each module exposes a per-trial game and a `run_trials` runner;
//! every randomized operation takes the RNG as a parameter so trials
//! can be replayed from a seed.

mod error;

pub mod boxes;
pub mod doors;
pub mod family;

pub use error::*;
