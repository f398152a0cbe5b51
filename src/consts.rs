/// Zero threshold for tableau entries: pivot elements, reduced costs and ratio-test
/// denominators with smaller magnitude are treated as zero.
pub const EPS: f64 = 1e-10;

/// An artificial variable still basic at the optimum with a value above this makes the
/// problem infeasible.
pub const FEASIBILITY_TOL: f64 = 1e-6;

/// Penalty applied to artificial variables by the Big-M method.
///
/// Every artificial row is subtracted `M` times from the objective row, so a too large
/// value swamps the structural coefficients and costs precision in the reduced costs.
pub const DEFAULT_BIG_M: f64 = 1e6;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
