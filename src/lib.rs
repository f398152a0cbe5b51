#[macro_use]
extern crate log;

pub mod consts;
pub mod datatype;
mod helpers;
pub mod problem;
pub mod sensitivity;
pub mod solution;
pub mod solver;
pub mod tableau;

pub mod solvers {
    pub mod big_m;
    pub mod dual_simplex;
    pub mod pivot;
    pub mod primal_simplex;
}

pub use problem::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
pub use sensitivity::SensitivityReport;
pub use solution::Solution;
pub use solver::{Error, Method, Options, PivotRule, Solver, SolverTryNew, Status};
