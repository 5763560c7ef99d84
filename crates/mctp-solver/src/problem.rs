use std::fmt;

use thiserror::Error;

/// A linear program in canonical form:
///
/// minimize `c . x` subject to `A_ub . x <= b_ub`, `A_eq . x = b_eq`,
/// and the implicit bound `x >= 0` on every variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Objective function coefficients (costs), always minimized
    pub objective: Vec<f64>,
    /// Inequality constraint rows
    pub a_ub: Vec<Vec<f64>>,
    /// Inequality bounds, one per row of `a_ub`
    pub b_ub: Vec<f64>,
    /// Equality constraint rows
    pub a_eq: Vec<Vec<f64>>,
    /// Equality bounds, one per row of `a_eq`
    pub b_eq: Vec<f64>,
}

/// Which constraint system a [`ProblemError`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Inequality,
    Equality,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Inequality => write!(f, "inequality"),
            ConstraintKind::Equality => write!(f, "equality"),
        }
    }
}

/// A structurally malformed problem, rejected before any solving starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Objective vector is empty")]
    EmptyObjective,
    #[error("Row {row} of the {kind} system has {found} coefficients, expected {expected}")]
    RowWidth {
        kind: ConstraintKind,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Bound count mismatch in the {kind} system: {rows} rows but {bounds} bounds")]
    BoundCount {
        kind: ConstraintKind,
        rows: usize,
        bounds: usize,
    },
}

impl LpProblem {
    /// Create a problem with the given objective and no constraints yet.
    pub fn new(objective: Vec<f64>) -> Self {
        Self {
            objective,
            a_ub: Vec::new(),
            b_ub: Vec::new(),
            a_eq: Vec::new(),
            b_eq: Vec::new(),
        }
    }

    /// Append the inequality constraint `coefficients . x <= rhs`.
    pub fn add_ub_constraint(&mut self, coefficients: Vec<f64>, rhs: f64) {
        self.a_ub.push(coefficients);
        self.b_ub.push(rhs);
    }

    /// Append the equality constraint `coefficients . x = rhs`.
    pub fn add_eq_constraint(&mut self, coefficients: Vec<f64>, rhs: f64) {
        self.a_eq.push(coefficients);
        self.b_eq.push(rhs);
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_ub_constraints(&self) -> usize {
        self.a_ub.len()
    }

    pub fn num_eq_constraints(&self) -> usize {
        self.a_eq.len()
    }

    /// Check that every constraint row is as wide as the objective and
    /// that each constraint system has one bound per row.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.objective.is_empty() {
            return Err(ProblemError::EmptyObjective);
        }
        if self.b_ub.len() != self.a_ub.len() {
            return Err(ProblemError::BoundCount {
                kind: ConstraintKind::Inequality,
                rows: self.a_ub.len(),
                bounds: self.b_ub.len(),
            });
        }
        if self.b_eq.len() != self.a_eq.len() {
            return Err(ProblemError::BoundCount {
                kind: ConstraintKind::Equality,
                rows: self.a_eq.len(),
                bounds: self.b_eq.len(),
            });
        }
        let width = self.num_variables();
        for (row, coefficients) in self.a_ub.iter().enumerate() {
            if coefficients.len() != width {
                return Err(ProblemError::RowWidth {
                    kind: ConstraintKind::Inequality,
                    row,
                    found: coefficients.len(),
                    expected: width,
                });
            }
        }
        for (row, coefficients) in self.a_eq.iter().enumerate() {
            if coefficients.len() != width {
                return Err(ProblemError::RowWidth {
                    kind: ConstraintKind::Equality,
                    row,
                    found: coefficients.len(),
                    expected: width,
                });
            }
        }
        Ok(())
    }
}
