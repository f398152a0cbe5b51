use crate::{
    problem::{DenseModel, OptimizationDirection, Variable},
    sensitivity::SensitivityReport,
    solver::{Error, Method, Status},
    tableau::{
        trace::{IterationStep, StepKind},
        Tableau,
    },
};

/// Outcome of a solve: terminal status, variable values, the final tableau and the full
/// iteration trace.
///
/// Values and objective describe the basis the solve stopped at, they are an optimum only
/// when [`Solution::status`] is [`Status::Optimal`].
#[derive(Debug)]
pub struct Solution {
    method: Method,
    status: Status,
    model: DenseModel,
    objective_val: f64,
    var_vals: Vec<f64>,
    tableau: Tableau,
    trace: Vec<IterationStep>,
}

impl Solution {
    pub(crate) fn new(
        method: Method,
        status: Status,
        model: DenseModel,
        tableau: Tableau,
        trace: Vec<IterationStep>,
    ) -> Self {
        let var_vals = tableau.structural_values();
        let objective_val = model.c.iter().zip(&var_vals).map(|(c, x)| c * x).sum();
        Solution {
            method,
            status,
            model,
            objective_val,
            var_vals,
            tableau,
            trace,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.model.direction
    }

    /// Objective value in the user's direction.
    pub fn objective_value(&self) -> f64 {
        self.objective_val
    }

    pub fn var_value(&self, var: Variable) -> &f64 {
        assert!(var.0 < self.var_vals.len());
        &self.var_vals[var.0]
    }

    /// Value of the structural variable called `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.model
            .var_names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.var_vals[idx])
    }

    /// Structural variables and their values, in the order they were added.
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.model
            .var_names
            .iter()
            .map(|n| n.as_str())
            .zip(self.var_vals.iter().copied())
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Initial step, one step per pivot and the final step, in order.
    pub fn trace(&self) -> &[IterationStep] {
        &self.trace
    }

    /// Number of pivots performed.
    pub fn iterations(&self) -> usize {
        self.trace
            .iter()
            .filter(|step| step.kind == StepKind::Pivot)
            .count()
    }

    pub(crate) fn model(&self) -> &DenseModel {
        &self.model
    }

    /// Post-optimal analysis of the final tableau.
    pub fn sensitivity(&self) -> Result<SensitivityReport, Error> {
        if self.status != Status::Optimal {
            return Err(Error::NotOptimal(self.status));
        }
        Ok(SensitivityReport::new(self))
    }
}
