mod problem;
mod simplex;
mod solution;

pub use problem::{ConstraintKind, LpProblem, ProblemError};
pub use simplex::Solver;
pub use solution::{Solution, SolutionStatus};
