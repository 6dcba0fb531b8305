//! Work functions executed by the processes.
//!
//! Everything here is a pure function of its inputs: no clock, no I/O.
//! Randomness only enters through the `sample` helpers, which take the RNG
//! from the caller so the computation itself stays deterministic.

pub mod error;
pub mod math;
pub mod matrix;
pub mod sample;
pub mod search;
pub mod sort;
pub mod stats;

pub use error::{Result, WorkError};
pub use math::MathOp;
pub use matrix::Matrix2x2;
pub use search::{linear_search, search_all, SearchHit};
pub use sort::quicksort;
pub use stats::{average, factorial};
