use std::collections::HashMap;

use crate::solver::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// A decision variable of the problem.
    Structural,
    /// Added to a `<=` row with coefficient +1.
    Slack,
    /// Added to a `>=` row with coefficient -1.
    Surplus,
    /// Added to a `>=` or `=` row with coefficient +1 to obtain a starting basis.
    Artificial,
}

/// Column ownership of a tableau: every column has exactly one name and one kind.
#[derive(Clone, Debug, Default)]
pub struct VariableRegistry {
    names: Vec<String>,
    kinds: Vec<VarKind>,
    by_name: HashMap<String, usize>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the next column.
    pub fn push(&mut self, name: impl Into<String>, kind: VarKind) -> Result<usize, Error> {
        let name = name.into();
        let col = self.names.len();
        if self.by_name.contains_key(&name) {
            return Err(Error::DuplicateVariable(name));
        }
        self.push_unchecked(name, kind);
        Ok(col)
    }

    /// Registers a generated column under `base`, or under `base_1`, `base_2`, ... when a
    /// user variable already owns that name.
    pub fn push_generated(&mut self, base: &str, kind: VarKind) -> usize {
        let mut name = base.to_string();
        let mut suffix = 0;
        while self.by_name.contains_key(&name) {
            suffix += 1;
            name = format!("{}_{}", base, suffix);
        }
        let col = self.names.len();
        self.push_unchecked(name, kind);
        col
    }

    fn push_unchecked(&mut self, name: String, kind: VarKind) {
        if let Some(&last) = self.kinds.last() {
            assert!(
                layout_rank(last) <= layout_rank(kind),
                "{:?} column registered after {:?} columns",
                kind,
                last
            );
        }
        self.by_name.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.kinds.push(kind);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, col: usize) -> &str {
        &self.names[col]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kind(&self, col: usize) -> VarKind {
        self.kinds[col]
    }

    pub fn col(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn count(&self, kind: VarKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }

    /// Columns of the given kind, ascending.
    pub fn cols_of(&self, kind: VarKind) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|&(_, &k)| k == kind)
            .map(|(col, _)| col)
            .collect()
    }
}

// Structural, then slack/surplus (interleaved in row order), then artificial.
fn layout_rank(kind: VarKind) -> u8 {
    match kind {
        VarKind::Structural => 0,
        VarKind::Slack | VarKind::Surplus => 1,
        VarKind::Artificial => 2,
    }
}
