use crate::{consts::EPS, datatype::Matrix, solver::Status};

use super::Tableau;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// The tableau right after construction.
    Initial,
    Pivot,
    /// The tableau the solve stopped at.
    Final(Status),
}

/// One candidate of a ratio test.
#[derive(Clone, Debug, PartialEq)]
pub struct Ratio {
    /// Row of a primal ratio test, column of a dual one.
    pub index: usize,
    /// Basic variable of the row, or the variable owning the column.
    pub variable: String,
    pub numerator: f64,
    pub denominator: f64,
    pub ratio: f64,
    pub chosen: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rationale {
    pub description: String,
    pub ratios: Vec<Ratio>,
}

/// Snapshot of a single solver step.
///
/// Steps are created by the solvers and only handed out behind shared references.
/// Pivot steps carry the tableau and basis before and after the pivot, initial and final
/// steps only the "after" state.
#[derive(Clone, Debug)]
pub struct IterationStep {
    pub iteration: usize,
    pub kind: StepKind,
    pub entering: Option<String>,
    pub leaving: Option<String>,
    pub pivot_row: Option<usize>,
    pub pivot_col: Option<usize>,
    pub pivot_element: Option<f64>,
    pub tableau_before: Option<Matrix>,
    pub tableau_after: Matrix,
    pub basis_before: Option<Vec<String>>,
    pub basis_after: Vec<String>,
    pub rationale: Rationale,
}

impl IterationStep {
    pub(crate) fn initial(tableau: &Tableau, description: String) -> Self {
        IterationStep {
            iteration: 0,
            kind: StepKind::Initial,
            entering: None,
            leaving: None,
            pivot_row: None,
            pivot_col: None,
            pivot_element: None,
            tableau_before: None,
            tableau_after: tableau.mat().clone(),
            basis_before: None,
            basis_after: tableau.basis_names(),
            rationale: Rationale {
                description,
                ratios: vec![],
            },
        }
    }

    pub(crate) fn pivot(
        iteration: usize,
        before: &Tableau,
        after: &Tableau,
        row: usize,
        col: usize,
        rationale: Rationale,
    ) -> Self {
        IterationStep {
            iteration,
            kind: StepKind::Pivot,
            entering: Some(before.registry().name(col).to_string()),
            leaving: Some(before.basic_var_name(row).to_string()),
            pivot_row: Some(row),
            pivot_col: Some(col),
            pivot_element: Some(before.mat()[[row, col]]),
            tableau_before: Some(before.mat().clone()),
            tableau_after: after.mat().clone(),
            basis_before: Some(before.basis_names()),
            basis_after: after.basis_names(),
            rationale,
        }
    }

    pub(crate) fn terminal(iteration: usize, tableau: &Tableau, status: Status) -> Self {
        IterationStep {
            iteration,
            kind: StepKind::Final(status),
            entering: None,
            leaving: None,
            pivot_row: None,
            pivot_col: None,
            pivot_element: None,
            tableau_before: None,
            tableau_after: tableau.mat().clone(),
            basis_before: None,
            basis_after: tableau.basis_names(),
            rationale: Rationale {
                description: format!("stopped: {}", status),
                ratios: vec![],
            },
        }
    }
}

/// Minimum-ratio candidates for `col` entering: every row with a positive coefficient.
pub(crate) fn primal_ratios(tableau: &Tableau, col: usize, chosen_row: usize) -> Rationale {
    let ratios = (0..tableau.num_constraints())
        .filter(|&r| tableau.coeff(r, col) > EPS)
        .map(|r| Ratio {
            index: r,
            variable: tableau.basic_var_name(r).to_string(),
            numerator: tableau.rhs(r),
            denominator: tableau.coeff(r, col),
            ratio: tableau.rhs(r) / tableau.coeff(r, col),
            chosen: r == chosen_row,
        })
        .collect();

    Rationale {
        description: format!(
            "{} enters with reduced cost {}, {} leaves on the minimum ratio",
            tableau.registry().name(col),
            tableau.obj_coeff(col),
            tableau.basic_var_name(chosen_row),
        ),
        ratios,
    }
}

/// Dual ratio candidates for `row` leaving: every column with a negative coefficient.
pub(crate) fn dual_ratios(tableau: &Tableau, row: usize, chosen_col: usize) -> Rationale {
    let ratios = (0..tableau.num_vars())
        .filter(|&c| tableau.coeff(row, c) < -EPS)
        .map(|c| Ratio {
            index: c,
            variable: tableau.registry().name(c).to_string(),
            numerator: tableau.obj_coeff(c),
            denominator: tableau.coeff(row, c),
            ratio: (tableau.obj_coeff(c) / tableau.coeff(row, c)).abs(),
            chosen: c == chosen_col,
        })
        .collect();

    Rationale {
        description: format!(
            "{} leaves with right-hand side {}, {} enters on the minimum dual ratio",
            tableau.basic_var_name(row),
            tableau.rhs(row),
            tableau.registry().name(chosen_col),
        ),
        ratios,
    }
}
