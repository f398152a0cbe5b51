use stopwatch::Stopwatch;

use crate::{
    problem::{DenseModel, Problem},
    solution::Solution,
    solver::{Error, Method, Options, Solver, SolverTryNew, Status},
    tableau::{registry::VarKind, trace::IterationStep, Tableau},
};

use super::primal_simplex::iterate_primal;

/// Primal simplex on a tableau with artificial variables penalized by `M` in the objective.
///
/// Artificial columns never re-enter the basis once they left it. An artificial variable
/// still basic with a positive value at the optimum means the original problem is infeasible.
#[derive(Debug)]
pub struct BigM {
    model: DenseModel,
    tableau: Tableau,
    artificials: Vec<usize>,
    options: Options,
}

impl SolverTryNew<BigM> for BigM {
    fn try_new_with(problem: &Problem, options: &Options) -> Result<BigM, Error> {
        problem.check_applicable(Method::BigM)?;
        let model = problem.to_dense()?;
        let tableau = Tableau::with_artificials(&model, options.big_m)?;
        let artificials = tableau.registry().cols_of(VarKind::Artificial);

        debug!(
            "initialized Big-M: vars: {}, constraints: {}, artificials: {}, M: {}, thread: {}",
            model.num_vars(),
            model.num_constraints(),
            artificials.len(),
            options.big_m,
            thread_id::get(),
        );

        Ok(BigM {
            model,
            tableau,
            artificials,
            options: options.clone(),
        })
    }
}

impl Solver for BigM {
    fn solve(&mut self) -> Result<Solution, Error> {
        let stopwatch = Stopwatch::start_new();
        let registry = self.tableau.registry();
        let mut trace = vec![IterationStep::initial(
            &self.tableau,
            format!(
                "{} structural, {} slack, {} surplus and {} artificial columns, M = {}",
                registry.count(VarKind::Structural),
                registry.count(VarKind::Slack),
                registry.count(VarKind::Surplus),
                registry.count(VarKind::Artificial),
                self.options.big_m,
            ),
        )];

        let mut status = iterate_primal(
            &mut self.tableau,
            &self.artificials,
            &self.options,
            &mut trace,
        );
        if status == Status::Optimal {
            if let Some(row) = self.infeasible_row() {
                debug!(
                    "artificial {} stays basic at {}",
                    self.tableau.basic_var_name(row),
                    self.tableau.rhs(row)
                );
                status = Status::Infeasible;
            }
        }
        trace.push(IterationStep::terminal(trace.len(), &self.tableau, status));

        let solution = Solution::new(
            Method::BigM,
            status,
            self.model.clone(),
            self.tableau.clone(),
            trace,
        );
        debug!(
            "Big-M finished: {} after {} iterations, obj.: {}, elapsed: {}ms",
            status,
            solution.iterations(),
            solution.objective_value(),
            stopwatch.elapsed_ms(),
        );
        Ok(solution)
    }
}

impl BigM {
    /// First row whose basic variable is an artificial one above the feasibility tolerance.
    fn infeasible_row(&self) -> Option<usize> {
        let registry = self.tableau.registry();
        self.tableau
            .basis()
            .iter()
            .enumerate()
            .find(|&(row, &col)| {
                registry.kind(col) == VarKind::Artificial
                    && self.tableau.rhs(row) > self.options.feasibility_tol
            })
            .map(|(row, _)| row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ComparisonOp, OptimizationDirection};

    fn solve(problem: &Problem) -> Solution {
        BigM::try_new(problem).unwrap().solve().unwrap()
    }

    #[test]
    fn infeasible() {
        let problem = Problem::from_dense(
            OptimizationDirection::Minimize,
            &["x1", "x2"],
            &[1.0, 1.0],
            &[vec![1.0, 1.0], vec![1.0, 1.0]],
            &[5.0, 3.0],
            &[ComparisonOp::Ge, ComparisonOp::Le],
        )
        .unwrap();
        let solution = solve(&problem);

        assert_eq!(solution.status(), Status::Infeasible);
        assert_eq!(solution.iterations(), 1);
        assert_eq!(solution.tableau().basis_names(), vec!["a1", "x1"]);
    }

    #[test]
    fn ge_rows() {
        let problem = Problem::from_dense(
            OptimizationDirection::Minimize,
            &["x1", "x2"],
            &[2.0, 3.0],
            &[vec![1.0, 1.0], vec![2.0, 1.0]],
            &[4.0, 5.0],
            &[ComparisonOp::Ge, ComparisonOp::Ge],
        )
        .unwrap();
        let solution = solve(&problem);

        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() - 8.0).abs() < 1e-6);
        assert!((solution.value("x1").unwrap() - 4.0).abs() < 1e-6);
        assert!(solution.value("x2").unwrap().abs() < 1e-6);
    }

    #[test]
    fn mixed_rows() {
        // x1 - x2 = 1, x1 + 2 x2 >= -2 (flipped to a slack row), x1 + x2 >= 3
        let problem = Problem::from_dense(
            OptimizationDirection::Minimize,
            &["x1", "x2"],
            &[1.0, 1.0],
            &[vec![1.0, -1.0], vec![1.0, 2.0], vec![1.0, 1.0]],
            &[1.0, -2.0, 3.0],
            &[ComparisonOp::Eq, ComparisonOp::Ge, ComparisonOp::Ge],
        )
        .unwrap();
        let solution = solve(&problem);

        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() - 3.0).abs() < 1e-6);
        assert!((solution.value("x1").unwrap() - 2.0).abs() < 1e-6);
        assert!((solution.value("x2").unwrap() - 1.0).abs() < 1e-6);

        let registry = solution.tableau().registry();
        for col in registry.cols_of(VarKind::Artificial) {
            assert!(!solution.tableau().is_basic(col));
        }
    }

    #[test]
    fn unbounded() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[1.0, 0.0],
            &[vec![1.0, -1.0]],
            &[1.0],
            &[ComparisonOp::Ge],
        )
        .unwrap();
        assert_eq!(solve(&problem).status(), Status::Unbounded);
    }

    #[test]
    fn initial_step_records_penalty() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1"],
            &[1.0],
            &[vec![1.0]],
            &[2.0],
            &[ComparisonOp::Eq],
        )
        .unwrap();
        let options = Options {
            big_m: 50.0,
            ..Options::default()
        };
        let solution = BigM::try_new_with(&problem, &options)
            .unwrap()
            .solve()
            .unwrap();

        let initial = &solution.trace()[0];
        assert!(initial.rationale.description.contains("M = 50"));
        assert_eq!(initial.tableau_after[[1, 0]], -51.0);
        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() - 2.0).abs() < 1e-9);
    }
}
