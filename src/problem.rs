use crate::{
    consts::EPS,
    datatype::{CsVec, Matrix},
    helpers::{to_dense, to_sparse},
    solution::Solution,
    solver::{Error, Method, Options, Solver, SolverTryNew},
    solvers::{big_m::BigM, dual_simplex::DualSimplex, primal_simplex::PrimalSimplex},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptimizationDirection {
    /// Minimize the objective function.
    Minimize,
    /// Maximize the objective function.
    Maximize,
}

impl OptimizationDirection {
    /// Factor turning the user's objective into the maximization form the tableau works in.
    pub(crate) fn sign(&self) -> f64 {
        match self {
            OptimizationDirection::Minimize => -1.0,
            OptimizationDirection::Maximize => 1.0,
        }
    }
}

/// A reference to a variable in a linear programming problem.
///
/// All variables are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Sequence number of the variable.
    ///
    /// Variables are referenced by their number in the addition sequence. The method returns
    /// this number, which is also the column of the variable in every tableau.
    pub fn idx(&self) -> usize {
        self.0
    }
}

/// A sum of variables multiplied by constant coefficients used as a left-hand side
/// when defining constraints.
#[derive(Clone, Debug)]
pub struct LinearExpr {
    vars: Vec<usize>,
    coeffs: Vec<f64>,
}

impl LinearExpr {
    /// Creates an empty linear expression.
    pub fn empty() -> Self {
        Self {
            vars: vec![],
            coeffs: vec![],
        }
    }

    /// Add a single term to the linear expression.
    ///
    /// Variables can be added to an expression in any order, but adding the same variable
    /// several times is forbidden (the [`Problem::add_constraint`] method will panic).
    pub fn add(&mut self, var: Variable, coeff: f64) {
        self.vars.push(var.0);
        self.coeffs.push(coeff);
    }

    fn into_sorted_terms(self) -> (Vec<usize>, Vec<f64>) {
        let mut terms: Vec<(usize, f64)> = self.vars.into_iter().zip(self.coeffs).collect();
        terms.sort_by_key(|&(var, _)| var);
        for pair in terms.windows(2) {
            assert!(
                pair[0].0 != pair[1].0,
                "variable {} appears twice in a linear expression",
                pair[0].0
            );
        }
        terms.into_iter().filter(|&(_, coeff)| coeff != 0.0).unzip()
    }
}

/// `(variable, coefficient)` pair accepted when building a [`LinearExpr`].
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct LinearTerm(Variable, f64);

impl From<(Variable, f64)> for LinearTerm {
    fn from(term: (Variable, f64)) -> Self {
        LinearTerm(term.0, term.1)
    }
}

impl<'a> From<&'a (Variable, f64)> for LinearTerm {
    fn from(term: &'a (Variable, f64)) -> Self {
        LinearTerm(term.0, term.1)
    }
}

impl<I: IntoIterator<Item = impl Into<LinearTerm>>> From<I> for LinearExpr {
    fn from(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for term in iter {
            let LinearTerm(var, coeff) = term.into();
            expr.add(var, coeff);
        }
        expr
    }
}

impl std::iter::FromIterator<(Variable, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::empty();
        for term in iter {
            expr.add(term.0, term.1)
        }
        expr
    }
}

impl std::iter::Extend<(Variable, f64)> for LinearExpr {
    fn extend<I: IntoIterator<Item = (Variable, f64)>>(&mut self, iter: I) {
        for term in iter {
            self.add(term.0, term.1)
        }
    }
}

/// Relation between the left-hand side and the right-hand side of a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`, needs an artificial variable.
    Eq,
    /// `<=`, gets a slack variable.
    Le,
    /// `>=`, gets a surplus variable.
    Ge,
}

impl ComparisonOp {
    pub fn evaluate<T: PartialEq + PartialOrd>(&self, a: T, b: T) -> bool {
        match self {
            ComparisonOp::Eq => a == b,
            ComparisonOp::Le => a <= b,
            ComparisonOp::Ge => a >= b,
        }
    }

    /// The operator after multiplying both sides by -1.
    pub fn flipped(&self) -> ComparisonOp {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Le,
        }
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let op = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
        };
        f.write_str(op)
    }
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub name: String,
    pub coeffs: CsVec,
    pub cmp_op: ComparisonOp,
    pub rhs: f64,
}

/// A specification of a linear programming problem over non-negative variables.
#[derive(Clone)]
pub struct Problem {
    pub direction: OptimizationDirection,
    pub var_names: Vec<String>,
    /// Objective coefficients as given, in the problem's own direction.
    pub obj_coeffs: Vec<f64>,
    pub constraints: Vec<Constraint>,
}

impl std::fmt::Debug for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Problem")
            .field("direction", &self.direction)
            .field("num_vars", &self.obj_coeffs.len())
            .field("num_constraints", &self.constraints.len())
            .finish()
    }
}

impl Problem {
    /// Create a new problem instance.
    pub fn new(direction: OptimizationDirection) -> Self {
        Problem {
            direction,
            var_names: vec![],
            obj_coeffs: vec![],
            constraints: vec![],
        }
    }

    /// Build a problem from dense coefficients: `a` holds one row per constraint, `ops` and
    /// `b` the operator and right-hand side of each row.
    pub fn from_dense(
        direction: OptimizationDirection,
        var_names: &[&str],
        c: &[f64],
        a: &[Vec<f64>],
        b: &[f64],
        ops: &[ComparisonOp],
    ) -> Result<Self, Error> {
        check_len("objective coefficients", var_names.len(), c.len())?;
        check_len("right-hand sides", a.len(), b.len())?;
        check_len("constraint operators", a.len(), ops.len())?;

        let mut problem = Problem::new(direction);
        let vars: Vec<Variable> = var_names
            .iter()
            .zip(c)
            .map(|(name, &coeff)| problem.add_var(*name, coeff))
            .collect();

        for ((row, &op), &rhs) in a.iter().zip(ops).zip(b) {
            check_len("constraint row", vars.len(), row.len())?;
            let sparse = to_sparse(row);
            let expr: LinearExpr = sparse.iter().map(|(i, &coeff)| (vars[i], coeff)).collect();
            problem.add_constraint(expr, op, rhs);
        }

        Ok(problem)
    }

    /// Add a new non-negative variable to the problem.
    ///
    /// `obj_coeff` is a coefficient of the term in the objective function corresponding to this
    /// variable.
    pub fn add_var(&mut self, name: impl Into<String>, obj_coeff: f64) -> Variable {
        let var = Variable(self.obj_coeffs.len());
        self.var_names.push(name.into());
        self.obj_coeffs.push(obj_coeff);
        var
    }

    /// Add a linear constraint to the problem, named after its position (`c1`, `c2`, ...).
    ///
    /// A constraint `x >= 0` on a single variable only restates the implicit bound and is
    /// dropped, as is a constraint without terms that holds trivially.
    ///
    /// # Panics
    ///
    /// Will panic if a variable was added more than once to the left-hand side expression.
    ///
    /// # Examples
    ///
    /// Left-hand side of the constraint can be specified in several ways:
    /// ```
    /// use tabula::problem::*;
    ///
    /// let mut problem = Problem::new(OptimizationDirection::Minimize);
    /// let x = problem.add_var("x", 1.0);
    /// let y = problem.add_var("y", 1.0);
    ///
    /// // Add an x + y >= 2 constraint, specifying the left-hand side expression:
    ///
    /// // * by passing a slice of pairs (useful when explicitly enumerating variables)
    /// problem.add_constraint(&[(x, 1.0), (y, 1.0)], ComparisonOp::Ge, 2.0);
    ///
    /// // * by passing an iterator of variable-coefficient pairs.
    /// let vars = [x, y];
    /// problem.add_constraint(vars.iter().map(|&v| (v, 1.0)), ComparisonOp::Ge, 2.0);
    ///
    /// // * by manually constructing a LinearExpr.
    /// let mut lhs = LinearExpr::empty();
    /// for &v in &vars {
    ///     lhs.add(v, 1.0);
    /// }
    /// problem.add_constraint(lhs, ComparisonOp::Ge, 2.0);
    ///
    /// assert_eq!(problem.constraints.len(), 3);
    /// ```
    pub fn add_constraint(&mut self, expr: impl Into<LinearExpr>, cmp_op: ComparisonOp, rhs: f64) {
        let name = format!("c{}", self.constraints.len() + 1);
        self.add_named_constraint(name, expr, cmp_op, rhs)
    }

    pub fn add_named_constraint(
        &mut self,
        name: impl Into<String>,
        expr: impl Into<LinearExpr>,
        cmp_op: ComparisonOp,
        rhs: f64,
    ) {
        let name = name.into();
        let (vars, coeffs) = expr.into().into_sorted_terms();

        if vars.is_empty() && cmp_op.evaluate(0.0, rhs) {
            debug!("dropping trivially satisfied constraint {}", name);
            return;
        }
        if vars.len() == 1 && coeffs[0] > 0.0 && cmp_op == ComparisonOp::Ge && rhs == 0.0 {
            debug!("dropping non-negativity constraint {}", name);
            return;
        }

        self.constraints.push(Constraint {
            name,
            coeffs: CsVec::new(self.obj_coeffs.len(), vars, coeffs),
            cmp_op,
            rhs,
        });
    }

    pub fn num_vars(&self) -> usize {
        self.obj_coeffs.len()
    }

    /// Checks whether `method` can start from this problem.
    pub fn check_applicable(&self, method: Method) -> Result<(), Error> {
        if self.constraints.is_empty() {
            return Err(Error::NoStructuralConstraints);
        }

        let not_applicable = |reason: String| Err(Error::NotApplicable { method, reason });

        match method {
            Method::PrimalSimplex => {
                for constr in &self.constraints {
                    match constr.cmp_op {
                        ComparisonOp::Eq => {
                            return not_applicable(format!("{} is an equality", constr.name));
                        }
                        ComparisonOp::Le if constr.rhs < 0.0 => {
                            return not_applicable(format!(
                                "{} has a negative right-hand side",
                                constr.name
                            ));
                        }
                        ComparisonOp::Ge if constr.rhs > 0.0 => {
                            return not_applicable(format!(
                                "{} needs a surplus variable",
                                constr.name
                            ));
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
            Method::BigM => Ok(()),
            Method::DualSimplex => {
                if let Some(constr) = self
                    .constraints
                    .iter()
                    .find(|constr| constr.cmp_op == ComparisonOp::Eq)
                {
                    return not_applicable(format!("{} is an equality", constr.name));
                }
                let sign = self.direction.sign();
                if let Some(idx) = self.obj_coeffs.iter().position(|&c| sign * c > EPS) {
                    return not_applicable(format!(
                        "objective row is not dual feasible in column {}",
                        self.var_names[idx]
                    ));
                }
                Ok(())
            }
        }
    }

    /// Methods that can start from this problem, in the order of [`Method::ALL`].
    pub fn applicable_methods(&self) -> Vec<Method> {
        Method::ALL
            .iter()
            .copied()
            .filter(|&method| self.check_applicable(method).is_ok())
            .collect()
    }

    /// Solves the problem with `method` and default [`Options`].
    pub fn solve(&self, method: Method) -> Result<Solution, Error> {
        self.solve_with(method, &Options::default())
    }

    pub fn solve_with(&self, method: Method, options: &Options) -> Result<Solution, Error> {
        match method {
            Method::PrimalSimplex => PrimalSimplex::try_new_with(self, options)?.solve(),
            Method::BigM => BigM::try_new_with(self, options)?.solve(),
            Method::DualSimplex => DualSimplex::try_new_with(self, options)?.solve(),
        }
    }

    /// The LP dual of this problem.
    ///
    /// A maximization is brought to `A x <= b` and dualized to `min b·y, Aᵀ y >= c`; a
    /// minimization is brought to `A x >= b` and dualized to `max b·y, Aᵀ y <= c`. Dual
    /// variables are named `y1..ym`, dual constraints carry the names of the primal variables.
    pub fn dual(&self) -> Result<Problem, Error> {
        if self.constraints.is_empty() {
            return Err(Error::NoStructuralConstraints);
        }

        let (primal_op, dual_direction, dual_op) = match self.direction {
            OptimizationDirection::Maximize => (
                ComparisonOp::Le,
                OptimizationDirection::Minimize,
                ComparisonOp::Ge,
            ),
            OptimizationDirection::Minimize => (
                ComparisonOp::Ge,
                OptimizationDirection::Maximize,
                ComparisonOp::Le,
            ),
        };

        let model = self.to_dense()?;
        let mut dual = Problem::new(dual_direction);
        let mut dual_vars = vec![];
        for (r, constr) in self.constraints.iter().enumerate() {
            let sign = if constr.cmp_op == primal_op {
                1.0
            } else if constr.cmp_op == ComparisonOp::Eq {
                return Err(Error::NotApplicable {
                    method: Method::DualSimplex,
                    reason: format!("{} is an equality and has a free dual variable", constr.name),
                });
            } else {
                -1.0
            };
            dual_vars.push((dual.add_var(format!("y{}", r + 1), sign * model.b[r]), sign));
        }

        for (j, name) in self.var_names.iter().enumerate() {
            let expr: LinearExpr = dual_vars
                .iter()
                .enumerate()
                .map(|(r, &(var, sign))| (var, sign * model.a[[r, j]]))
                .collect();
            dual.add_named_constraint(name.clone(), expr, dual_op, self.obj_coeffs[j]);
        }

        Ok(dual)
    }

    /// Dense view of the problem used to build tableaux.
    pub fn to_dense(&self) -> Result<DenseModel, Error> {
        if self.constraints.is_empty() {
            return Err(Error::NoStructuralConstraints);
        }

        let num_vars = self.num_vars();
        let mut a = Matrix::zeros((self.constraints.len(), num_vars));
        for (r, constr) in self.constraints.iter().enumerate() {
            for (j, val) in to_dense(&constr.coeffs, num_vars).into_iter().enumerate() {
                a[[r, j]] = val;
            }
        }

        Ok(DenseModel {
            direction: self.direction,
            var_names: self.var_names.clone(),
            constraint_names: self.constraints.iter().map(|c| c.name.clone()).collect(),
            c: self.obj_coeffs.clone(),
            a,
            b: self.constraints.iter().map(|c| c.rhs).collect(),
            ops: self.constraints.iter().map(|c| c.cmp_op).collect(),
        })
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Dense coefficients of a problem: objective `c`, constraint matrix `a` (one row per
/// constraint), right-hand sides `b` and operators.
#[derive(Clone, Debug)]
pub struct DenseModel {
    pub direction: OptimizationDirection,
    pub var_names: Vec<String>,
    pub constraint_names: Vec<String>,
    pub c: Vec<f64>,
    pub a: Matrix,
    pub b: Vec<f64>,
    pub ops: Vec<ComparisonOp>,
}

impl DenseModel {
    pub fn num_vars(&self) -> usize {
        self.c.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.b.len()
    }

    /// Objective coefficients of the equivalent maximization.
    pub fn max_form_obj(&self) -> Vec<f64> {
        let sign = self.direction.sign();
        self.c.iter().map(|&c| sign * c).collect()
    }
}
