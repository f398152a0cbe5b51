//! Post-optimal analysis read off the final tableau.
//!
//! All quantities are reported in the user's terms: ranges of the original objective
//! coefficients and right-hand sides, reduced costs with the sign convention of the
//! optimization direction and dual values as the change of the user's objective per unit
//! increase of a right-hand side.

use std::f64::INFINITY;

use crate::{
    consts::EPS,
    problem::{ComparisonOp, OptimizationDirection},
    solution::Solution,
    tableau::{registry::VarKind, Tableau},
};

/// Interval over which a single coefficient can move while the current basis stays optimal
/// (objective coefficients) or feasible (right-hand sides). Unbounded sides are infinite.
#[derive(Clone, Debug, PartialEq)]
pub struct Range {
    pub name: String,
    pub current: f64,
    pub lower: f64,
    pub upper: f64,
    pub allowable_decrease: f64,
    pub allowable_increase: f64,
}

impl Range {
    fn new(name: String, current: f64, allowable_decrease: f64, allowable_increase: f64) -> Self {
        Range {
            name,
            current,
            lower: current - allowable_decrease,
            upper: current + allowable_increase,
            allowable_decrease,
            allowable_increase,
        }
    }

    pub fn contains(&self, val: f64) -> bool {
        self.lower - EPS <= val && val <= self.upper + EPS
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShadowPrice {
    pub constraint: String,
    /// Slack, surplus or (for `=` rows) artificial variable of the constraint.
    pub aux_variable: String,
    /// Magnitude of the dual value, exactly 0 for a non-binding constraint.
    pub value: f64,
    /// Change of the objective per unit increase of the right-hand side.
    pub dual_value: f64,
    pub binding: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReducedCost {
    pub variable: String,
    /// Exactly 0 for basic variables. Non-positive at a maximum, non-negative at a minimum.
    pub value: f64,
    pub is_basic: bool,
}

#[derive(Clone, Debug)]
pub struct SensitivityReport {
    pub direction: OptimizationDirection,
    pub objective_value: f64,
    pub objective_ranges: Vec<Range>,
    pub rhs_ranges: Vec<Range>,
    pub shadow_prices: Vec<ShadowPrice>,
    pub reduced_costs: Vec<ReducedCost>,
    pub basic_variables: Vec<String>,
    pub non_basic_variables: Vec<String>,
}

impl SensitivityReport {
    /// Analyzes an optimal solution. The caller checks optimality.
    pub(crate) fn new(solution: &Solution) -> Self {
        let model = solution.model();
        let tableau = solution.tableau();
        let dir_sign = model.direction.sign();

        let reduced_costs = model
            .var_names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let is_basic = tableau.is_basic(col);
                let value = if is_basic {
                    0.0
                } else {
                    -dir_sign * tableau.obj_coeff(col).max(0.0)
                };
                ReducedCost {
                    variable: name.clone(),
                    value,
                    is_basic,
                }
            })
            .collect();

        let objective_ranges = model
            .var_names
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let (dec, inc) = objective_slack(tableau, col);
                let (dec, inc) = match model.direction {
                    OptimizationDirection::Maximize => (dec, inc),
                    OptimizationDirection::Minimize => (inc, dec),
                };
                Range::new(name.clone(), model.c[col], dec, inc)
            })
            .collect();

        let mut rhs_ranges = vec![];
        let mut shadow_prices = vec![];
        for (i, name) in model.constraint_names.iter().enumerate() {
            let aux_col = tableau.aux_col(i);
            let aux_kind = tableau.registry().kind(aux_col);
            let kappa = if aux_kind == VarKind::Surplus { -1.0 } else { 1.0 };
            let scale = tableau.row_sign(i) * kappa;

            let (dec, inc) = rhs_slack(tableau, aux_col, scale);
            rhs_ranges.push(Range::new(name.clone(), model.b[i], dec, inc));

            let binding = model.ops[i] == ComparisonOp::Eq || !tableau.is_basic(aux_col);
            let dual_value = if binding {
                dir_sign * scale * tableau.obj_coeff(aux_col)
            } else {
                0.0
            };
            shadow_prices.push(ShadowPrice {
                constraint: name.clone(),
                aux_variable: tableau.registry().name(aux_col).to_string(),
                value: dual_value.abs(),
                dual_value,
                binding,
            });
        }

        let registry = tableau.registry();
        let non_basic_variables = (0..tableau.num_vars())
            .filter(|&col| !tableau.is_basic(col) && registry.kind(col) != VarKind::Artificial)
            .map(|col| registry.name(col).to_string())
            .collect();

        SensitivityReport {
            direction: model.direction,
            objective_value: solution.objective_value(),
            objective_ranges,
            rhs_ranges,
            shadow_prices,
            reduced_costs,
            basic_variables: tableau.basis_names(),
            non_basic_variables,
        }
    }

    pub fn objective_range(&self, var: &str) -> Option<&Range> {
        self.objective_ranges.iter().find(|r| r.name == var)
    }

    pub fn rhs_range(&self, constraint: &str) -> Option<&Range> {
        self.rhs_ranges.iter().find(|r| r.name == constraint)
    }

    pub fn shadow_price(&self, constraint: &str) -> Option<&ShadowPrice> {
        self.shadow_prices.iter().find(|p| p.constraint == constraint)
    }

    pub fn reduced_cost(&self, var: &str) -> Option<&ReducedCost> {
        self.reduced_costs.iter().find(|c| c.variable == var)
    }
}

/// Allowable (decrease, increase) of the maximization-form cost of `col`.
fn objective_slack(tableau: &Tableau, col: usize) -> (f64, f64) {
    let row = match tableau.basic_row(col) {
        Some(row) => row,
        // Raising the cost of a non-basic column lowers its reduced cost until it would enter.
        None => return (INFINITY, tableau.obj_coeff(col).max(0.0)),
    };

    let registry = tableau.registry();
    let mut dec = INFINITY;
    let mut inc = INFINITY;
    for j in 0..tableau.num_vars() {
        if tableau.is_basic(j) || registry.kind(j) == VarKind::Artificial {
            continue;
        }
        let coeff = tableau.coeff(row, j);
        let obj_coeff = tableau.obj_coeff(j).max(0.0);
        if coeff > EPS {
            dec = dec.min(obj_coeff / coeff);
        } else if coeff < -EPS {
            inc = inc.min(obj_coeff / -coeff);
        }
    }
    (dec, inc)
}

/// Allowable (decrease, increase) of a right-hand side whose unit change moves the basic
/// values by `scale` times the column `aux_col`.
fn rhs_slack(tableau: &Tableau, aux_col: usize, scale: f64) -> (f64, f64) {
    let mut dec = INFINITY;
    let mut inc = INFINITY;
    for row in 0..tableau.num_constraints() {
        let change = scale * tableau.coeff(row, aux_col);
        let val = tableau.rhs(row).max(0.0);
        if change > EPS {
            dec = dec.min(val / change);
        } else if change < -EPS {
            inc = inc.min(val / -change);
        }
    }
    (dec, inc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::Problem,
        solver::{Error, Method, Status},
    };

    fn assert_close(val: f64, expected: f64) {
        assert!(
            (val - expected).abs() < 1e-9 || val == expected,
            "{} != {}",
            val,
            expected
        );
    }

    fn classic() -> SensitivityReport {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[3.0, 2.0],
            &[vec![2.0, 1.0], vec![2.0, 3.0], vec![3.0, 1.0]],
            &[18.0, 42.0, 24.0],
            &[ComparisonOp::Le, ComparisonOp::Le, ComparisonOp::Le],
        )
        .unwrap();
        problem
            .solve(Method::PrimalSimplex)
            .unwrap()
            .sensitivity()
            .unwrap()
    }

    #[test]
    fn shadow_prices() {
        let report = classic();

        assert_close(report.objective_value, 33.0);
        let prices: Vec<f64> = report.shadow_prices.iter().map(|p| p.value).collect();
        assert_close(prices[0], 1.25);
        assert_close(prices[1], 0.25);
        assert_eq!(prices[2], 0.0);

        let c3 = report.shadow_price("c3").unwrap();
        assert!(!c3.binding);
        assert_eq!(c3.aux_variable, "s3");
        assert!(report.shadow_price("c1").unwrap().binding);
    }

    #[test]
    fn objective_ranges() {
        let report = classic();

        let x1 = report.objective_range("x1").unwrap();
        assert_close(x1.lower, 4.0 / 3.0);
        assert_close(x1.upper, 4.0);
        let x2 = report.objective_range("x2").unwrap();
        assert_close(x2.lower, 1.5);
        assert_close(x2.upper, 4.5);
        assert!(x2.contains(2.0));

        for cost in &report.reduced_costs {
            assert!(cost.is_basic);
            assert_eq!(cost.value, 0.0);
        }
    }

    #[test]
    fn rhs_ranges() {
        let report = classic();

        let c1 = report.rhs_range("c1").unwrap();
        assert_close(c1.allowable_decrease, 4.0);
        assert_close(c1.allowable_increase, 12.0 / 7.0);

        let c3 = report.rhs_range("c3").unwrap();
        assert_close(c3.lower, 21.0);
        assert_eq!(c3.upper, INFINITY);
    }

    #[test]
    fn non_basic_variable() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[3.0, 2.0],
            &[vec![2.0, 1.0]],
            &[10.0],
            &[ComparisonOp::Le],
        )
        .unwrap();
        let report = problem
            .solve(Method::PrimalSimplex)
            .unwrap()
            .sensitivity()
            .unwrap();

        assert_close(report.shadow_price("c1").unwrap().value, 2.0);
        assert_close(report.reduced_cost("x1").unwrap().value, -1.0);
        assert_eq!(report.reduced_cost("x2").unwrap().value, 0.0);

        let x1 = report.objective_range("x1").unwrap();
        assert_eq!(x1.lower, -INFINITY);
        assert_close(x1.upper, 4.0);
        let x2 = report.objective_range("x2").unwrap();
        assert_close(x2.lower, 1.5);
        assert_eq!(x2.upper, INFINITY);

        assert_eq!(report.basic_variables, vec!["x2"]);
        assert_eq!(report.non_basic_variables, vec!["x1", "s1"]);
    }

    #[test]
    fn minimization() {
        let problem = Problem::from_dense(
            OptimizationDirection::Minimize,
            &["x1", "x2"],
            &[2.0, 3.0],
            &[vec![1.0, 1.0], vec![2.0, 1.0]],
            &[4.0, 5.0],
            &[ComparisonOp::Ge, ComparisonOp::Ge],
        )
        .unwrap();
        let report = problem
            .solve(Method::DualSimplex)
            .unwrap()
            .sensitivity()
            .unwrap();

        let c1 = report.shadow_price("c1").unwrap();
        assert!(c1.binding);
        assert_close(c1.dual_value, 2.0);
        assert_eq!(report.shadow_price("c2").unwrap().value, 0.0);

        assert_close(report.reduced_cost("x2").unwrap().value, 1.0);
        let x1 = report.objective_range("x1").unwrap();
        assert_close(x1.lower, 0.0);
        assert_close(x1.upper, 3.0);
        let x2 = report.objective_range("x2").unwrap();
        assert_close(x2.lower, 2.0);
        assert_eq!(x2.upper, INFINITY);

        let rhs = report.rhs_range("c1").unwrap();
        assert_close(rhs.lower, 2.5);
        assert_eq!(rhs.upper, INFINITY);
    }

    #[test]
    fn not_optimal() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1"],
            &[1.0],
            &[vec![-1.0]],
            &[1.0],
            &[ComparisonOp::Le],
        )
        .unwrap();
        let solution = problem.solve(Method::PrimalSimplex).unwrap();
        assert_eq!(
            solution.sensitivity().unwrap_err(),
            Error::NotOptimal(Status::Unbounded)
        );
    }
}
