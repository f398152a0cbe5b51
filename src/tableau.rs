pub mod registry;
pub mod trace;

use std::fmt;

use crate::{
    consts::EPS,
    datatype::Matrix,
    problem::{ComparisonOp, DenseModel},
    solver::Error,
};

use self::registry::{VarKind, VariableRegistry};

/// Dense simplex tableau.
///
/// Rows `0..m` are the constraints, row `m` is the objective row. Columns are laid out as
/// structural, slack/surplus, artificial and finally the right-hand side. The objective row
/// always describes a maximization: an entry below zero marks an improving column, and its
/// right-hand side is the current objective value of the maximization form.
#[derive(Clone, Debug)]
pub struct Tableau {
    mat: Matrix,
    registry: VariableRegistry,
    basis: Vec<usize>,
    /// Per constraint, the slack/surplus column, or the artificial column for `=` rows.
    aux_cols: Vec<usize>,
    /// Per constraint, +1 or -1: the factor the original row was multiplied with.
    row_signs: Vec<f64>,
}

impl Tableau {
    /// One slack per row, `>=` rows negated to `<=` first. Starting point of both the
    /// primal and the dual simplex.
    ///
    /// Equality rows cannot be expressed with slacks alone; the caller checks applicability.
    pub(crate) fn with_slacks(model: &DenseModel) -> Result<Tableau, Error> {
        let mut row_signs = Vec::with_capacity(model.num_constraints());
        let mut ops = Vec::with_capacity(model.num_constraints());
        for &op in &model.ops {
            assert!(op != ComparisonOp::Eq, "equality row in a slack-only tableau");
            if op == ComparisonOp::Ge {
                row_signs.push(-1.0);
            } else {
                row_signs.push(1.0);
            }
            ops.push(ComparisonOp::Le);
        }

        Tableau::build(model, row_signs, &ops, None)
    }

    /// Slack, surplus and artificial columns as needed, rows with a negative right-hand side
    /// flipped first. Every row whose basic variable is artificial is subtracted `big_m`
    /// times from the objective row.
    pub(crate) fn with_artificials(model: &DenseModel, big_m: f64) -> Result<Tableau, Error> {
        let mut row_signs = Vec::with_capacity(model.num_constraints());
        let mut ops = Vec::with_capacity(model.num_constraints());
        for (&op, &rhs) in model.ops.iter().zip(&model.b) {
            if rhs < 0.0 {
                row_signs.push(-1.0);
                ops.push(op.flipped());
            } else {
                row_signs.push(1.0);
                ops.push(op);
            }
        }

        Tableau::build(model, row_signs, &ops, Some(big_m))
    }

    fn build(
        model: &DenseModel,
        row_signs: Vec<f64>,
        ops: &[ComparisonOp],
        big_m: Option<f64>,
    ) -> Result<Tableau, Error> {
        let num_constraints = model.num_constraints();
        let num_structural = model.num_vars();

        let mut registry = VariableRegistry::new();
        for name in &model.var_names {
            registry.push(name.clone(), VarKind::Structural)?;
        }

        let mut aux_cols = vec![0; num_constraints];
        let mut basis = vec![0; num_constraints];
        for (r, op) in ops.iter().enumerate() {
            let kind = match op {
                ComparisonOp::Le => VarKind::Slack,
                ComparisonOp::Ge => VarKind::Surplus,
                ComparisonOp::Eq => continue,
            };
            let col = registry.push_generated(&format!("s{}", r + 1), kind);
            aux_cols[r] = col;
            basis[r] = col;
        }

        let mut artificials = vec![];
        for (r, op) in ops.iter().enumerate() {
            if *op == ComparisonOp::Le {
                continue;
            }
            let col = registry.push_generated(
                &format!("a{}", artificials.len() + 1),
                VarKind::Artificial,
            );
            if *op == ComparisonOp::Eq {
                aux_cols[r] = col;
            }
            basis[r] = col;
            artificials.push(r);
        }
        assert!(
            artificials.is_empty() || big_m.is_some(),
            "artificial columns without a penalty"
        );

        let num_vars = registry.len();
        let mut mat = Matrix::zeros((num_constraints + 1, num_vars + 1));
        for r in 0..num_constraints {
            let sign = row_signs[r];
            for j in 0..num_structural {
                mat[[r, j]] = sign * model.a[[r, j]];
            }
            mat[[r, num_vars]] = sign * model.b[r];
            match registry.kind(aux_cols[r]) {
                VarKind::Surplus => mat[[r, aux_cols[r]]] = -1.0,
                _ => mat[[r, aux_cols[r]]] = 1.0,
            }
            mat[[r, basis[r]]] = 1.0;
        }

        for (j, c) in model.max_form_obj().into_iter().enumerate() {
            mat[[num_constraints, j]] = -c;
        }
        if let Some(big_m) = big_m {
            for &r in &artificials {
                let row = mat.row(r).to_owned();
                mat.row_mut(num_constraints).scaled_add(-big_m, &row);
            }
        }

        Ok(Tableau {
            mat,
            registry,
            basis,
            aux_cols,
            row_signs,
        })
    }

    /// Pivots on `(row, col)` and makes `col` the basic column of `row`.
    pub fn pivot(&mut self, row: usize, col: usize) {
        pivot_in_place(&mut self.mat, row, col);
        self.basis[row] = col;
    }

    pub fn mat(&self) -> &Matrix {
        &self.mat
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn num_constraints(&self) -> usize {
        self.basis.len()
    }

    /// Number of variable columns, right-hand side excluded.
    pub fn num_vars(&self) -> usize {
        self.registry.len()
    }

    pub fn coeff(&self, row: usize, col: usize) -> f64 {
        self.mat[[row, col]]
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.mat[[row, self.num_vars()]]
    }

    /// Objective-row entry of `col`.
    pub fn obj_coeff(&self, col: usize) -> f64 {
        self.mat[[self.num_constraints(), col]]
    }

    /// Right-hand side of the objective row.
    pub fn obj_rhs(&self) -> f64 {
        self.mat[[self.num_constraints(), self.num_vars()]]
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn basis_names(&self) -> Vec<String> {
        self.basis
            .iter()
            .map(|&col| self.registry.name(col).to_string())
            .collect()
    }

    pub fn basic_var_name(&self, row: usize) -> &str {
        self.registry.name(self.basis[row])
    }

    /// Row in which `col` is basic.
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&c| c == col)
    }

    pub fn is_basic(&self, col: usize) -> bool {
        self.basic_row(col).is_some()
    }

    pub fn aux_col(&self, constraint: usize) -> usize {
        self.aux_cols[constraint]
    }

    pub fn row_sign(&self, constraint: usize) -> f64 {
        self.row_signs[constraint]
    }

    /// Current value of the variable in `col`.
    pub fn value(&self, col: usize) -> f64 {
        self.basic_row(col).map_or(0.0, |row| self.rhs(row))
    }

    /// Values of the structural columns, in column order.
    pub fn structural_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.registry.count(VarKind::Structural)];
        for (row, &col) in self.basis.iter().enumerate() {
            if col < values.len() {
                values[col] = self.rhs(row);
            }
        }
        values
    }

    /// Sum of the magnitudes of negative right-hand sides.
    pub fn primal_infeasibility(&self) -> f64 {
        (0..self.num_constraints())
            .map(|r| self.rhs(r))
            .filter(|&rhs| rhs < 0.0)
            .map(|rhs| -rhs)
            .sum()
    }

    /// Whether every basic column is the unit vector of its row among the constraint rows.
    pub fn is_canonical(&self, tol: f64) -> bool {
        self.basis.iter().enumerate().all(|(row, &col)| {
            (0..self.num_constraints()).all(|r| {
                let expected = if r == row { 1.0 } else { 0.0 };
                (self.mat[[r, col]] - expected).abs() <= tol
            })
        })
    }
}

/// Gauss-Jordan step on `(row, col)`: scales the pivot row to a leading 1 and eliminates the
/// column from every other row, the objective row included.
///
/// Panics if the pivot element is not larger than `EPS` in magnitude.
pub(crate) fn pivot_in_place(mat: &mut Matrix, row: usize, col: usize) {
    let pivot_elem = mat[[row, col]];
    assert!(
        pivot_elem.abs() > EPS,
        "pivot element {} at ({}, {}) is zero",
        pivot_elem,
        row,
        col
    );

    mat.row_mut(row).mapv_inplace(|x| x / pivot_elem);
    mat[[row, col]] = 1.0;
    let pivot_row = mat.row(row).to_owned();

    for (r, mut other) in mat.rows_mut().into_iter().enumerate() {
        if r == row {
            continue;
        }
        let factor = other[col];
        if factor != 0.0 {
            other.scaled_add(-factor, &pivot_row);
            other[col] = 0.0;
        }
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WIDTH: usize = 10;

        write!(f, "{:>8}", "")?;
        for name in self.registry.names() {
            write!(f, " {:>w$}", name, w = WIDTH)?;
        }
        writeln!(f, " {:>w$}", "RHS", w = WIDTH)?;

        for (r, row) in self.mat.rows().into_iter().enumerate() {
            let label = if r < self.num_constraints() {
                self.basic_var_name(r)
            } else {
                "Z"
            };
            write!(f, "{:>8}", label)?;
            for val in row.iter() {
                write!(f, " {:>w$.4}", val, w = WIDTH)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
