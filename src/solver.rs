use crate::{
    consts::{DEFAULT_BIG_M, DEFAULT_MAX_ITERATIONS, FEASIBILITY_TOL},
    problem::Problem,
    solution::Solution,
};

/// A failure that prevents a solve from running or a report from being produced.
///
/// Outcomes of a solve that did run (infeasible, unbounded, iteration limit) are not
/// errors, see [`Status`].
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The problem has no constraint other than non-negativity bounds.
    NoStructuralConstraints,
    /// The chosen method cannot start from this problem.
    NotApplicable { method: Method, reason: String },
    /// Dense input with inconsistent dimensions.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Two columns of a tableau would share a name.
    DuplicateVariable(String),
    /// Sensitivity analysis needs an optimal solution.
    NotOptimal(Status),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NoStructuralConstraints => f.write_str("problem has no structural constraints"),
            Error::NotApplicable { method, reason } => {
                write!(f, "{} is not applicable: {}", method, reason)
            }
            Error::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{}: expected {} entries, found {}", what, expected, found),
            Error::DuplicateVariable(name) => write!(f, "duplicate variable name `{}`", name),
            Error::NotOptimal(status) => {
                write!(f, "solution is not optimal (status: {})", status)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Terminal state of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
    Unbounded,
    /// The iteration cap was hit before any other terminal state was reached.
    IterationLimit,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = match self {
            Status::Optimal => "optimal",
            Status::Infeasible => "infeasible",
            Status::Unbounded => "unbounded",
            Status::IterationLimit => "iteration limit exceeded",
        };
        f.write_str(msg)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    PrimalSimplex,
    BigM,
    DualSimplex,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::PrimalSimplex, Method::BigM, Method::DualSimplex];
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = match self {
            Method::PrimalSimplex => "primal simplex",
            Method::BigM => "Big-M method",
            Method::DualSimplex => "dual simplex",
        };
        f.write_str(msg)
    }
}

/// Entering/leaving selection policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PivotRule {
    /// Most negative reduced cost enters, minimum ratio leaves, ties to the lowest index.
    /// The dual variant picks the most negative right-hand side and the minimum dual ratio.
    Dantzig,
    /// Lowest-index rule. Never cycles on degenerate problems.
    Bland,
}

/// Per-solve tunables.
#[derive(Clone, Debug)]
pub struct Options {
    /// Penalty of artificial variables in the Big-M method.
    pub big_m: f64,
    /// Number of pivots after which the solve stops with [`Status::IterationLimit`].
    pub max_iterations: usize,
    /// Largest value an artificial variable may keep at the optimum.
    pub feasibility_tol: f64,
    pub pivot_rule: PivotRule,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            big_m: DEFAULT_BIG_M,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            feasibility_tol: FEASIBILITY_TOL,
            pivot_rule: PivotRule::Dantzig,
        }
    }
}

pub trait SolverTryNew<T> {
    fn try_new(problem: &Problem) -> Result<T, Error> {
        Self::try_new_with(problem, &Options::default())
    }

    fn try_new_with(problem: &Problem, options: &Options) -> Result<T, Error>;
}

pub trait Solver {
    fn solve(&mut self) -> Result<Solution, Error>;
}
