use crate::{consts::EPS, tableau::Tableau};

use super::PivotChooser;

/// Largest coefficient rule. Ties always go to the lowest index.
#[derive(Debug)]
pub struct Dantzig {}

impl PivotChooser for Dantzig {
    fn choose_pivot_col(&self, tableau: &Tableau, excluded: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for col in 0..tableau.num_vars() {
            if excluded.contains(&col) {
                continue;
            }
            let obj_coeff = tableau.obj_coeff(col);
            if obj_coeff >= -EPS {
                continue;
            }
            match best {
                Some((_, best_coeff)) if obj_coeff >= best_coeff => {}
                _ => best = Some((col, obj_coeff)),
            }
        }
        best.map(|(col, _)| col)
    }

    fn choose_pivot_row(&self, tableau: &Tableau, entering_col: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..tableau.num_constraints() {
            let coeff = tableau.coeff(row, entering_col);
            if coeff <= EPS {
                continue;
            }
            let ratio = tableau.rhs(row) / coeff;
            match best {
                Some((_, best_ratio)) if ratio >= best_ratio => {}
                _ => best = Some((row, ratio)),
            }
        }
        best.map(|(row, _)| row)
    }

    fn choose_pivot_row_dual(&self, tableau: &Tableau) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for row in 0..tableau.num_constraints() {
            let rhs = tableau.rhs(row);
            if rhs >= -EPS {
                continue;
            }
            match best {
                Some((_, best_rhs)) if rhs >= best_rhs => {}
                _ => best = Some((row, rhs)),
            }
        }
        best.map(|(row, _)| row)
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
                Some((_, best_ratio)) if ratio >= best_ratio => {}
                _ => best = Some((col, ratio)),
            }
        }
        best.map(|(col, _)| col)
    }
}
