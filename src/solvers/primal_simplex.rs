use stopwatch::Stopwatch;

use crate::{
    problem::{DenseModel, Problem},
    solution::Solution,
    solver::{Error, Method, Options, Solver, SolverTryNew, Status},
    solvers::pivot,
    tableau::{
        registry::VarKind,
        trace::{primal_ratios, IterationStep},
        Tableau,
    },
};

/// Tableau simplex starting from the all-slack basis.
///
/// Needs a problem whose rows are all `<=` with a non-negative right-hand side once `>=`
/// rows are negated.
#[derive(Debug)]
pub struct PrimalSimplex {
    model: DenseModel,
    tableau: Tableau,
    options: Options,
}

impl SolverTryNew<PrimalSimplex> for PrimalSimplex {
    fn try_new_with(problem: &Problem, options: &Options) -> Result<PrimalSimplex, Error> {
        problem.check_applicable(Method::PrimalSimplex)?;
        let model = problem.to_dense()?;
        let tableau = Tableau::with_slacks(&model)?;

        debug!(
            "initialized primal simplex: vars: {}, constraints: {}, slacks: {}, thread: {}",
            model.num_vars(),
            model.num_constraints(),
            tableau.registry().count(VarKind::Slack),
            thread_id::get(),
        );

        Ok(PrimalSimplex {
            model,
            tableau,
            options: options.clone(),
        })
    }
}

impl Solver for PrimalSimplex {
    fn solve(&mut self) -> Result<Solution, Error> {
        let stopwatch = Stopwatch::start_new();
        let mut trace = vec![IterationStep::initial(
            &self.tableau,
            format!(
                "slack basis, {} structural and {} slack columns",
                self.model.num_vars(),
                self.tableau.registry().count(VarKind::Slack),
            ),
        )];

        let status = iterate_primal(&mut self.tableau, &[], &self.options, &mut trace);
        trace.push(IterationStep::terminal(trace.len(), &self.tableau, status));

        let solution = Solution::new(
            Method::PrimalSimplex,
            status,
            self.model.clone(),
            self.tableau.clone(),
            trace,
        );
        debug!(
            "primal simplex finished: {} after {} iterations, obj.: {}, elapsed: {}ms",
            status,
            solution.iterations(),
            solution.objective_value(),
            stopwatch.elapsed_ms(),
        );
        Ok(solution)
    }
}

/// Primal pivots until no column outside of `excluded` improves the objective.
///
/// Every pivot is appended to `trace`. Stops with [`Status::IterationLimit`] instead of
/// pivoting once `options.max_iterations` pivots were made.
pub(crate) fn iterate_primal(
    tableau: &mut Tableau,
    excluded: &[usize],
    options: &Options,
    trace: &mut Vec<IterationStep>,
) -> Status {
    let chooser = pivot::chooser(options.pivot_rule);
    let mut num_pivots = 0;
    loop {
        let col = match chooser.choose_pivot_col(tableau, excluded) {
            Some(col) => col,
            None => return Status::Optimal,
        };
        let row = match chooser.choose_pivot_row(tableau, col) {
            Some(row) => row,
            None => {
                debug!("column {} is unbounded", tableau.registry().name(col));
                return Status::Unbounded;
            }
        };
        if num_pivots >= options.max_iterations {
            warn!(
                "stopping after {} iterations, obj.: {}",
                num_pivots,
                tableau.obj_rhs()
            );
            return Status::IterationLimit;
        }

        let before = tableau.clone();
        tableau.pivot(row, col);
        num_pivots += 1;

        trace!(
            "iteration {}: {} enters, {} leaves, pivot element {}\n{}",
            num_pivots,
            before.registry().name(col),
            before.basic_var_name(row),
            before.coeff(row, col),
            tableau,
        );
        let rationale = primal_ratios(&before, col, row);
        trace.push(IterationStep::pivot(
            trace.len(),
            &before,
            tableau,
            row,
            col,
            rationale,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::EPS,
        problem::{ComparisonOp, OptimizationDirection},
        solver::PivotRule,
        tableau::trace::StepKind,
    };

    fn classic_problem() -> Problem {
        Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[3.0, 2.0],
            &[vec![2.0, 1.0], vec![2.0, 3.0], vec![3.0, 1.0]],
            &[18.0, 42.0, 24.0],
            &[ComparisonOp::Le, ComparisonOp::Le, ComparisonOp::Le],
        )
        .unwrap()
    }

    #[test]
    fn single_constraint() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[3.0, 2.0],
            &[vec![2.0, 1.0]],
            &[10.0],
            &[ComparisonOp::Le],
        )
        .unwrap();
        let mut solver = PrimalSimplex::try_new(&problem).unwrap();
        let solution = solver.solve().unwrap();

        assert_eq!(solution.status(), Status::Optimal);
        // x1 enters first, then x2 replaces it.
        assert_eq!(solution.iterations(), 2);
        assert!((solution.objective_value() - 20.0).abs() < 1e-9);
        assert_eq!(solution.value("x1"), Some(0.0));
        assert!((solution.value("x2").unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn classic() {
        let problem = classic_problem();
        let mut solver = PrimalSimplex::try_new(&problem).unwrap();
        let solution = solver.solve().unwrap();

        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() - 33.0).abs() < 1e-9);
        assert!((solution.value("x1").unwrap() - 3.0).abs() < 1e-9);
        assert!((solution.value("x2").unwrap() - 12.0).abs() < 1e-9);

        let trace = solution.trace();
        assert_eq!(trace.first().map(|s| s.kind), Some(StepKind::Initial));
        assert_eq!(
            trace.last().map(|s| s.kind),
            Some(StepKind::Final(Status::Optimal))
        );
        for (i, step) in trace.iter().enumerate() {
            assert_eq!(step.iteration, i);
        }
        let first = &trace[1];
        assert_eq!(first.entering.as_deref(), Some("x1"));
        assert_eq!(first.leaving.as_deref(), Some("s3"));
        assert_eq!(first.pivot_element, Some(3.0));
        assert_eq!(first.rationale.ratios.len(), 3);
        assert_eq!(
            first
                .rationale
                .ratios
                .iter()
                .filter(|r| r.chosen)
                .map(|r| r.index)
                .collect::<Vec<_>>(),
            vec![2]
        );
    }

    #[test]
    fn minimization_with_ge_rows() {
        // min x1 - x2, x1 - x2 >= -2 (negated to -x1 + x2 <= 2), x2 <= 3
        let problem = Problem::from_dense(
            OptimizationDirection::Minimize,
            &["x1", "x2"],
            &[1.0, -1.0],
            &[vec![1.0, -1.0], vec![0.0, 1.0]],
            &[-2.0, 3.0],
            &[ComparisonOp::Ge, ComparisonOp::Le],
        )
        .unwrap();
        let mut solver = PrimalSimplex::try_new(&problem).unwrap();
        let solution = solver.solve().unwrap();

        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() + 2.0).abs() < 1e-9);
        assert!((solution.value("x2").unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unbounded() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1", "x2"],
            &[1.0, 1.0],
            &[vec![1.0, -1.0]],
            &[1.0],
            &[ComparisonOp::Le],
        )
        .unwrap();
        let solution = PrimalSimplex::try_new(&problem).unwrap().solve().unwrap();
        assert_eq!(solution.status(), Status::Unbounded);
    }

    #[test]
    fn iteration_limit() {
        let options = Options {
            max_iterations: 1,
            ..Options::default()
        };
        let mut solver = PrimalSimplex::try_new_with(&classic_problem(), &options).unwrap();
        let solution = solver.solve().unwrap();

        assert_eq!(solution.status(), Status::IterationLimit);
        assert_eq!(solution.iterations(), 1);
    }

    #[test]
    fn bland_rule() {
        let options = Options {
            pivot_rule: PivotRule::Bland,
            ..Options::default()
        };
        let mut solver = PrimalSimplex::try_new_with(&classic_problem(), &options).unwrap();
        let solution = solver.solve().unwrap();

        assert_eq!(solution.status(), Status::Optimal);
        assert!((solution.objective_value() - 33.0).abs() < 1e-9);
        assert!(solution.tableau().is_canonical(EPS));
    }

    #[test]
    fn equality_is_rejected() {
        let problem = Problem::from_dense(
            OptimizationDirection::Maximize,
            &["x1"],
            &[1.0],
            &[vec![1.0]],
            &[1.0],
            &[ComparisonOp::Eq],
        )
        .unwrap();
        assert!(matches!(
            PrimalSimplex::try_new(&problem),
            Err(Error::NotApplicable {
                method: Method::PrimalSimplex,
                ..
            })
        ));
    }
}
