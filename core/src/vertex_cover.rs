//! Minimum vertex cover: the reference checker used as an external verifier, and a reference solver.

pub mod checker;
pub mod solver;

pub use checker::{CheckError, CoverVerdict, VerificationContext};
pub use solver::{minimum_vertex_cover, Graph, GraphError};
