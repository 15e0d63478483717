//! Linear solvers for the implicit conduction schemes.
//!
//! The only system shape the brake model produces is tridiagonal, so this
//! crate provides the storage type for such a system and an O(N) Thomas
//! elimination that reports a singular pivot instead of dividing by it.

pub mod error;
pub mod tridiagonal;

pub use error::{SolverError, SolverResult};
pub use tridiagonal::{TridiagonalSystem, solve_tridiagonal};
