use stopwatch::Stopwatch;

use crate::{
    problem::{DenseModel, Problem},
    solution::Solution,
    solver::{Error, Method, Options, Solver, SolverTryNew, Status},
    solvers::pivot,
    tableau::{
        registry::VarKind,
        trace::{dual_ratios, IterationStep},
        Tableau,
    },
};

/// Dual simplex on the slack tableau.
///
/// Starts from a dual feasible objective row and pivots out negative right-hand sides while
/// keeping it dual feasible. A row that cannot be repaired proves primal infeasibility, so
/// this solver never reports [`Status::Unbounded`].
#[derive(Debug)]
pub struct DualSimplex {
    model: DenseModel,
    tableau: Tableau,
    options: Options,
}

impl SolverTryNew<DualSimplex> for DualSimplex {
    fn try_new_with(problem: &Problem, options: &Options) -> Result<DualSimplex, Error> {
        problem.check_applicable(Method::DualSimplex)?;
        let model = problem.to_dense()?;
        let tableau = Tableau::with_slacks(&model)?;

        debug!(
            "initialized dual simplex: vars: {}, constraints: {}, primal infeasibility: {}, thread: {}",
            model.num_vars(),
            model.num_constraints(),
            tableau.primal_infeasibility(),
            thread_id::get(),
        );

        Ok(DualSimplex {
            model,
            tableau,
            options: options.clone(),
        })
    }
}

impl Solver for DualSimplex {
    fn solve(&mut self) -> Result<Solution, Error> {
        let stopwatch = Stopwatch::start_new();
        let mut trace = vec![IterationStep::initial(
            &self.tableau,
            format!(
                "slack basis, {} structural and {} slack columns, primal infeasibility {}",
                self.model.num_vars(),
                self.tableau.registry().count(VarKind::Slack),
                self.tableau.primal_infeasibility(),
            ),
        )];

        let status = iterate_dual(&mut self.tableau, &self.options, &mut trace);
        trace.push(IterationStep::terminal(trace.len(), &self.tableau, status));

        let solution = Solution::new(
            Method::DualSimplex,
            status,
            self.model.clone(),
            self.tableau.clone(),
            trace,
        );
        debug!(
            "dual simplex finished: {} after {} iterations, obj.: {}, elapsed: {}ms",
            status,
            solution.iterations(),
            solution.objective_value(),
            stopwatch.elapsed_ms(),
        );
        Ok(solution)
    }
}

fn iterate_dual(
    tableau: &mut Tableau,
    options: &Options,
    trace: &mut Vec<IterationStep>,
) -> Status {
    let chooser = pivot::chooser(options.pivot_rule);
    let mut num_pivots = 0;
    loop {
        let row = match chooser.choose_pivot_row_dual(tableau) {
            Some(row) => row,
            None => return Status::Optimal,
        };
        let col = match chooser.choose_pivot_col_dual(tableau, row) {
            Some(col) => col,
            None => {
                debug!(
                    "row of {} has no negative coefficient, rhs: {}",
                    tableau.basic_var_name(row),
                    tableau.rhs(row)
                );
                return Status::Infeasible;
            }
        };
        if num_pivots >= options.max_iterations {
            warn!(
                "stopping after {} iterations, primal infeasibility: {}",
                num_pivots,
                tableau.primal_infeasibility()
            );
            return Status::IterationLimit;
        }

        let before = tableau.clone();
        tableau.pivot(row, col);
        num_pivots += 1;

        trace!(
            "iteration {}: {} leaves, {} enters, pivot element {}\n{}",
            num_pivots,
            before.basic_var_name(row),
            before.registry().name(col),
            before.coeff(row, col),
            tableau,
        );
        let rationale = dual_ratios(&before, row, col);
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
