use crate::{solver::PivotRule, tableau::Tableau};

pub mod bland;
pub mod dantzig;

use self::{bland::Bland, dantzig::Dantzig};

/// Entering/leaving selection on a tableau whose objective row describes a maximization.
///
/// Primal choices assume a primal feasible tableau, dual choices a dual feasible one. `None`
/// means no candidate exists, the caller decides what that implies.
pub trait PivotChooser {
    /// Column with a negative objective-row entry to enter the basis. Columns in `excluded`
    /// never enter.
    fn choose_pivot_col(&self, tableau: &Tableau, excluded: &[usize]) -> Option<usize>;
    /// Row whose basic variable leaves when `entering_col` enters.
    fn choose_pivot_row(&self, tableau: &Tableau, entering_col: usize) -> Option<usize>;
    /// Row with a negative right-hand side to leave the basis.
    fn choose_pivot_row_dual(&self, tableau: &Tableau) -> Option<usize>;
    /// Column entering when the basic variable of `row` leaves.
    fn choose_pivot_col_dual(&self, tableau: &Tableau, row: usize) -> Option<usize>;
}

pub fn chooser(rule: PivotRule) -> Box<dyn PivotChooser> {
    match rule {
        PivotRule::Dantzig => Box::new(Dantzig {}),
        PivotRule::Bland => Box::new(Bland {}),
    }
}

// Dantzig selection as free functions. The solvers go through `chooser`.

/// Most negative objective-row entry outside of `excluded`, `None` at the optimum.
pub fn select_entering(tableau: &Tableau, excluded: &[usize]) -> Option<usize> {
    Dantzig {}.choose_pivot_col(tableau, excluded)
}

/// Minimum-ratio row for `entering_col`, `None` if the column is unbounded.
pub fn select_leaving(tableau: &Tableau, entering_col: usize) -> Option<usize> {
    Dantzig {}.choose_pivot_row(tableau, entering_col)
}

/// Row with the most negative right-hand side, `None` once the tableau is primal feasible.
pub fn select_leaving_row(tableau: &Tableau) -> Option<usize> {
    Dantzig {}.choose_pivot_row_dual(tableau)
}

/// Minimum dual ratio column for `leaving_row`, `None` if the row proves infeasibility.
pub fn select_entering_col(tableau: &Tableau, leaving_row: usize) -> Option<usize> {
    Dantzig {}.choose_pivot_col_dual(tableau, leaving_row)
}
