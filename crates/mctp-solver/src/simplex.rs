use log::debug;

use crate::problem::{LpProblem, ProblemError};
use crate::solution::{Solution, SolutionStatus};

/// Two-phase simplex solver for canonical-form problems
pub struct Solver {
    /// Maximum pivots across both phases before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Solve the LP problem using the two-phase simplex method.
    ///
    /// `Err` is reserved for structurally malformed problems. Solver
    /// outcomes, infeasibility included, come back as the status of the
    /// returned [`Solution`].
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, ProblemError> {
        problem.validate()?;

        let mut tableau = self.build_tableau(problem);
        let mut iterations = 0;

        // Phase 1: drive the artificial variables out of the basis
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau, &mut iterations) {
                Phase1Result::Feasible => {}
                Phase1Result::Infeasible => return Ok(Solution::infeasible(iterations)),
                Phase1Result::IterationLimit => return Ok(Solution::iteration_limit(iterations)),
            }
            debug!("phase 1 reached a feasible basis after {} iterations", iterations);
        }

        // Phase 2: optimize the real objective
        match self.phase2(&mut tableau, &mut iterations) {
            SimplexResult::Optimal => {}
            SimplexResult::Unbounded => return Ok(Solution::unbounded(iterations)),
            SimplexResult::IterationLimit => return Ok(Solution::iteration_limit(iterations)),
        }

        let solution = self.extract_solution(&tableau, problem, iterations);
        debug!(
            "optimum {} after {} iterations",
            solution.objective_value, solution.iterations
        );
        Ok(solution)
    }

    fn build_tableau(&self, problem: &LpProblem) -> Tableau {
        let n_vars = problem.num_variables();
        let n_ub = problem.num_ub_constraints();
        let n_eq = problem.num_eq_constraints();
        let n_constraints = n_ub + n_eq;

        // One slack per inequality row. Artificials cover every equality
        // row plus the inequality rows with a negative bound: those flip
        // sign to keep the RHS non-negative, which turns their slack into
        // a surplus that cannot start in the basis.
        let n_slack = n_ub;
        let n_artificial = n_eq + problem.b_ub.iter().filter(|&&b| b < 0.0).count();

        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; total_rows],
            basic_vars: vec![0; n_constraints],
            n_vars,
            n_slack,
            n_artificial,
        };

        let rhs_col = total_cols - 1;
        let mut artificial_idx = n_vars + n_slack;

        for (i, (coefficients, &rhs)) in problem.a_ub.iter().zip(&problem.b_ub).enumerate() {
            let sign = if rhs < 0.0 { -1.0 } else { 1.0 };
            for (j, &coef) in coefficients.iter().enumerate() {
                tableau.data[i][j] = sign * coef;
            }
            tableau.data[i][rhs_col] = sign * rhs;

            let slack_idx = n_vars + i;
            tableau.data[i][slack_idx] = sign;
            if rhs < 0.0 {
                tableau.data[i][artificial_idx] = 1.0;
                tableau.basic_vars[i] = artificial_idx;
                artificial_idx += 1;
            } else {
                tableau.basic_vars[i] = slack_idx;
            }
        }

        for (row, (coefficients, &rhs)) in problem.a_eq.iter().zip(&problem.b_eq).enumerate() {
            let i = n_ub + row;
            let sign = if rhs < 0.0 { -1.0 } else { 1.0 };
            for (j, &coef) in coefficients.iter().enumerate() {
                tableau.data[i][j] = sign * coef;
            }
            tableau.data[i][rhs_col] = sign * rhs;
            tableau.data[i][artificial_idx] = 1.0;
            tableau.basic_vars[i] = artificial_idx;
            artificial_idx += 1;
        }

        // Objective row (last row), negated: the pivot rules below
        // maximize, and maximizing -c.x minimizes c.x
        let obj_row = n_constraints;
        for (j, &coef) in problem.objective.iter().enumerate() {
            tableau.data[obj_row][j] = -coef;
        }

        tableau
    }

    fn phase1(&self, tableau: &mut Tableau, iterations: &mut usize) -> Phase1Result {
        let n_constraints = tableau.data.len() - 1;
        let n_cols = tableau.data[0].len();
        let rhs_col = n_cols - 1;
        let art_start = tableau.n_vars + tableau.n_slack;

        // Save the real objective; phase 1 maximizes -(sum of artificials)
        let orig_obj = tableau.data[n_constraints].clone();
        for j in 0..n_cols {
            tableau.data[n_constraints][j] = 0.0;
        }
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_constraints][j] = -1.0;
        }

        // Cancel the -1 entries of basic artificials so the objective row
        // starts consistent with the basis
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] += tableau.data[i][j];
                }
            }
        }

        loop {
            let Some(pivot_col) = self.find_pivot_column(tableau, rhs_col) else {
                break;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col) else {
                // The auxiliary objective is bounded above by zero, so a
                // missing ratio row leaves no feasible basis to find
                return Phase1Result::Infeasible;
            };
            if *iterations >= self.max_iterations {
                return Phase1Result::IterationLimit;
            }
            self.pivot(tableau, pivot_row, pivot_col);
            *iterations += 1;
        }

        // Feasible only if every artificial variable sits at zero
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > self.tolerance
            {
                return Phase1Result::Infeasible;
            }
        }

        // A degenerate phase 1 can end with an artificial still basic at
        // level zero. Phase 2 only bars artificial columns from entering,
        // so pivot each one out here on a real or slack column of its
        // row. A row offering no such column is redundant and keeps its
        // artificial pinned at zero.
        for i in 0..n_constraints {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            let exit_col = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance);
            if let Some(col) = exit_col {
                self.pivot(tableau, i, col);
            }
        }

        // Restore the original objective and adjust for basic variables
        tableau.data[n_constraints] = orig_obj;
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            if tableau.data[n_constraints][basic].abs() > self.tolerance {
                let ratio = tableau.data[n_constraints][basic];
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        Phase1Result::Feasible
    }

    fn phase2(&self, tableau: &mut Tableau, iterations: &mut usize) -> SimplexResult {
        // Artificial variable columns never re-enter the basis
        let art_start = tableau.n_vars + tableau.n_slack;

        loop {
            let Some(pivot_col) = self.find_pivot_column(tableau, art_start) else {
                return SimplexResult::Optimal;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col) else {
                return SimplexResult::Unbounded;
            };
            if *iterations >= self.max_iterations {
                return SimplexResult::IterationLimit;
            }
            self.pivot(tableau, pivot_row, pivot_col);
            *iterations += 1;
        }
    }

    /// Column with the most positive objective-row entry among `0..limit`,
    /// if any exceeds the tolerance
    fn find_pivot_column(&self, tableau: &Tableau, limit: usize) -> Option<usize> {
        let obj_row = tableau.data.len() - 1;

        let mut max_val = self.tolerance;
        let mut max_col = None;

        for j in 0..limit {
            if tableau.data[obj_row][j] > max_val {
                max_val = tableau.data[obj_row][j];
                max_col = Some(j);
            }
        }

        max_col
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<usize> {
        let n_constraints = tableau.data.len() - 1;
        let rhs_col = tableau.data[0].len() - 1;

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;

        for i in 0..n_constraints {
            let val = tableau.data[i][col];
            if val > self.tolerance {
                let ratio = tableau.data[i][rhs_col] / val;
                if ratio >= 0.0 && ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_rows = tableau.data.len();
        let n_cols = tableau.data[0].len();

        tableau.basic_vars[row] = col;

        // Scale pivot row
        let pivot_val = tableau.data[row][col];
        for j in 0..n_cols {
            tableau.data[row][j] /= pivot_val;
        }

        // Eliminate column in other rows
        for i in 0..n_rows {
            if i != row {
                let factor = tableau.data[i][col];
                for j in 0..n_cols {
                    tableau.data[i][j] -= factor * tableau.data[row][j];
                }
            }
        }
    }

    fn extract_solution(
        &self,
        tableau: &Tableau,
        problem: &LpProblem,
        iterations: usize,
    ) -> Solution {
        let n_vars = problem.num_variables();
        let n_constraints = tableau.basic_vars.len();
        let rhs_col = tableau.data[0].len() - 1;

        let mut values = vec![0.0; n_vars];
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            if basic < n_vars {
                // Clamp roundoff noise below the x >= 0 bound
                values[basic] = tableau.data[i][rhs_col].max(0.0);
            }
        }

        let mut objective_value = 0.0;
        for (j, &val) in values.iter().enumerate() {
            objective_value += problem.objective[j] * val;
        }

        Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            iterations,
        }
    }
}

struct Tableau {
    /// Constraint rows followed by the objective row
    data: Vec<Vec<f64>>,
    /// Basic variable (column index) per constraint row
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
}

enum Phase1Result {
    Feasible,
    Infeasible,
    IterationLimit,
}

enum SimplexResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    #[test]
    fn test_minimization_with_inequalities() {
        // Minimize: -x - 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 2
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=1, y=3, obj=-7
        let mut problem = LpProblem::new(vec![-1.0, -2.0]);
        problem.add_ub_constraint(vec![1.0, 1.0], 4.0);
        problem.add_ub_constraint(vec![1.0, 0.0], 2.0);
        problem.add_ub_constraint(vec![0.0, 1.0], 3.0);

        let solver = Solver::new();
        let solution = solver.solve(&problem).unwrap();

        println!("Status: {:?}", solution.status);
        println!("Values: {:?}", solution.values);
        println!("Objective: {}", solution.objective_value);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 1.0).abs() < 1e-6, "x = {} (expected 1)", solution.values[0]);
        assert!((solution.values[1] - 3.0).abs() < 1e-6, "y = {} (expected 3)", solution.values[1]);
        assert!((solution.objective_value + 7.0).abs() < 1e-6, "obj = {} (expected -7)", solution.objective_value);
    }

    #[test]
    fn test_minimization_with_equality() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y = 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec![2.0, 3.0]);
        problem.add_ub_constraint(vec![1.0, 0.0], 3.0);
        problem.add_ub_constraint(vec![0.0, 1.0], 3.0);
        problem.add_eq_constraint(vec![1.0, 1.0], 4.0);

        let solver = Solver::new();
        let solution = solver.solve(&problem).unwrap();

        println!("Status: {:?}", solution.status);
        println!("Values: {:?}", solution.values);
        println!("Objective: {}", solution.objective_value);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);
    }

    #[test]
    fn test_equality_only() {
        // Minimize x + y subject to x + y = 2
        let mut problem = LpProblem::new(vec![1.0, 1.0]);
        problem.add_eq_constraint(vec![1.0, 1.0], 2.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 2.0).abs() < 1e-6);
        let sum: f64 = solution.values.iter().sum();
        assert!((sum - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        // x <= 3 while x = 5
        let mut problem = LpProblem::new(vec![1.0]);
        problem.add_ub_constraint(vec![1.0], 3.0);
        problem.add_eq_constraint(vec![1.0], 5.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(!solution.status.is_optimal());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_unbounded() {
        // Minimize -x with no constraints at all
        let problem = LpProblem::new(vec![-1.0]);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Unbounded);
    }

    #[test]
    fn test_iteration_limit() {
        let mut problem = LpProblem::new(vec![-1.0, -2.0]);
        problem.add_ub_constraint(vec![1.0, 1.0], 4.0);
        problem.add_ub_constraint(vec![1.0, 0.0], 2.0);
        problem.add_ub_constraint(vec![0.0, 1.0], 3.0);

        let solution = Solver::new()
            .with_max_iterations(1)
            .solve(&problem)
            .unwrap();

        assert_eq!(solution.status, SolutionStatus::IterationLimit);
        assert_eq!(solution.iterations, 1);
    }

    #[test]
    fn test_negative_inequality_bound() {
        // -x <= -2 encodes x >= 2; minimize x lands on the bound
        let mut problem = LpProblem::new(vec![1.0]);
        problem.add_ub_constraint(vec![-1.0], -2.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!((solution.objective_value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_equality_bound() {
        // -x - y = -2 encodes x + y = 2
        let mut problem = LpProblem::new(vec![1.0, 1.0]);
        problem.add_eq_constraint(vec![-1.0, -1.0], -2.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_equality_constraints_hold() {
        // Minimize: 2a + b + 3d
        // Subject to:
        //   a <= 1, b <= 0, c <= 2, d <= 3
        //   a + c = 3
        //   b + d = 0
        //   a, b, c, d >= 0
        // Optimal: a=1, b=0, c=2, d=0, obj=2. The b <= 0 bound makes
        // phase 1 finish with an artificial still basic at zero; both
        // equalities must survive phase 2.
        let mut problem = LpProblem::new(vec![2.0, 1.0, 0.0, 3.0]);
        problem.add_ub_constraint(vec![1.0, 0.0, 0.0, 0.0], 1.0);
        problem.add_ub_constraint(vec![0.0, 1.0, 0.0, 0.0], 0.0);
        problem.add_ub_constraint(vec![0.0, 0.0, 1.0, 0.0], 2.0);
        problem.add_ub_constraint(vec![0.0, 0.0, 0.0, 1.0], 3.0);
        problem.add_eq_constraint(vec![1.0, 0.0, 1.0, 0.0], 3.0);
        problem.add_eq_constraint(vec![0.0, 1.0, 0.0, 1.0], 0.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.objective_value - 2.0).abs() < 1e-6, "obj = {} (expected 2)", solution.objective_value);
        assert!((solution.values[0] - 1.0).abs() < 1e-6, "a = {} (expected 1)", solution.values[0]);
        assert!(solution.values[1].abs() < 1e-6, "b = {} (expected 0)", solution.values[1]);
        assert!((solution.values[2] - 2.0).abs() < 1e-6, "c = {} (expected 2)", solution.values[2]);
        assert!(solution.values[3].abs() < 1e-6, "d = {} (expected 0)", solution.values[3]);
    }

    #[test]
    fn test_malformed_problem_is_an_error() {
        let mut problem = LpProblem::new(vec![1.0, 2.0]);
        problem.add_ub_constraint(vec![1.0], 4.0);

        assert!(Solver::new().solve(&problem).is_err());
    }
}
