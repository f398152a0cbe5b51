use crate::{consts::EPS, tableau::Tableau};

use super::PivotChooser;

/// Smallest subscript rule: the lowest-index candidate enters, ratio ties leave by the lowest
/// basic column index. Terminates on degenerate problems where [`super::dantzig::Dantzig`]
/// may cycle.
#[derive(Debug)]
pub struct Bland {}

impl PivotChooser for Bland {
    fn choose_pivot_col(&self, tableau: &Tableau, excluded: &[usize]) -> Option<usize> {
        (0..tableau.num_vars())
            .find(|&col| !excluded.contains(&col) && tableau.obj_coeff(col) < -EPS)
    }

    fn choose_pivot_row(&self, tableau: &Tableau, entering_col: usize) -> Option<usize> {
        let candidates = (0..tableau.num_constraints())
            .filter(|&row| tableau.coeff(row, entering_col) > EPS)
            .map(|row| (row, tableau.rhs(row) / tableau.coeff(row, entering_col)));
        lowest_basic_among_min(tableau, candidates)
    }

    fn choose_pivot_row_dual(&self, tableau: &Tableau) -> Option<usize> {
        (0..tableau.num_constraints())
            .filter(|&row| tableau.rhs(row) < -EPS)
            .min_by_key(|&row| tableau.basis()[row])
    }

    fn choose_pivot_col_dual(&self, tableau: &Tableau, row: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for col in 0..tableau.num_vars() {
            let coeff = tableau.coeff(row, col);
            if coeff >= -EPS {
                continue;
            }
            let ratio = (tableau.obj_coeff(col) / coeff).abs();
            match best {
                Some((_, best_ratio)) if ratio >= best_ratio - EPS => {}
                _ => best = Some((col, ratio)),
            }
        }
        best.map(|(col, _)| col)
    }
}

fn lowest_basic_among_min(
    tableau: &Tableau,
    candidates: impl Iterator<Item = (usize, f64)>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (row, ratio) in candidates {
        best = match best {
            None => Some((row, ratio)),
            Some((_, best_ratio)) if ratio < best_ratio - EPS => Some((row, ratio)),
            Some((best_row, best_ratio))
                if ratio <= best_ratio + EPS && tableau.basis()[row] < tableau.basis()[best_row] =>
            {
                Some((row, ratio))
            }
            keep => keep,
        };
    }
    best.map(|(row, _)| row)
}
