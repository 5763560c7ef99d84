pub mod builder;
pub mod input;
pub mod instance;
pub mod report;

use thiserror::Error;

use mctp_solver::{ProblemError, Solver};

pub use input::{ParseError, Section};
pub use instance::{CostTensor, DemandLimits, DimensionError, Dimensions, Instance, SupplyLimits};

/// A failure of the parse -> build -> solve pipeline.
///
/// A solver that runs and reports a non-optimal outcome is not an error
/// here: that outcome becomes the failure report returned by [`solve`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid dimensions: {0}")]
    Dimension(#[from] DimensionError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Malformed model: {0}")]
    Problem(#[from] ProblemError),
}

/// Solve a multi-commodity transportation problem end to end.
///
/// `supply_text` holds one `;`-separated row per supply center with
/// `,`-separated per-good capacities; `demand_text` is shaped the same
/// with one row per demand center; `costs_text` adds a `:`-separated
/// segment per demand center inside each supply row. The report always
/// comes back `Ok` once the input parses, whether or not the solver found
/// an optimum.
pub fn solve(
    supply_centers: usize,
    demand_centers: usize,
    goods: usize,
    supply_text: &str,
    demand_text: &str,
    costs_text: &str,
) -> Result<String, ModelError> {
    let dims = Dimensions::new(supply_centers, demand_centers, goods)?;
    let instance = Instance::parse(dims, supply_text, demand_text, costs_text)?;
    let problem = builder::build(&instance);
    let solution = Solver::new().solve(&problem)?;
    Ok(report::render(dims, &solution))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: &str = "10,15;20,5";
    const DEMAND: &str = "15,10;15,10";
    const COSTS: &str = "2,3:3,2;4,1:1,4";

    #[test]
    fn test_balanced_two_good_instance() {
        let dims = Dimensions::new(2, 2, 2).unwrap();
        let instance = Instance::parse(dims, SUPPLY, DEMAND, COSTS).unwrap();
        let problem = builder::build(&instance);
        let solution = Solver::new().solve(&problem).unwrap();

        assert!(solution.status.is_optimal());
        assert!((solution.objective_value - 95.0).abs() < 1e-6);

        let expected = [10.0, 5.0, 0.0, 10.0, 5.0, 5.0, 15.0, 0.0];
        assert_eq!(solution.values.len(), expected.len());
        for (index, (&value, &want)) in solution.values.iter().zip(&expected).enumerate() {
            assert!(
                (value - want).abs() < 1e-6,
                "route {}: {} (expected {})",
                index,
                value,
                want
            );
        }
    }

    #[test]
    fn test_solution_satisfies_every_constraint() {
        let dims = Dimensions::new(2, 2, 2).unwrap();
        let instance = Instance::parse(dims, SUPPLY, DEMAND, COSTS).unwrap();
        let problem = builder::build(&instance);
        let solution = Solver::new().solve(&problem).unwrap();

        for (row, &bound) in problem.a_ub.iter().zip(&problem.b_ub) {
            let shipped: f64 = row.iter().zip(&solution.values).map(|(c, x)| c * x).sum();
            assert!(shipped <= bound + 1e-6, "{} > {}", shipped, bound);
        }
        for (row, &bound) in problem.a_eq.iter().zip(&problem.b_eq) {
            let shipped: f64 = row.iter().zip(&solution.values).map(|(c, x)| c * x).sum();
            assert!((shipped - bound).abs() < 1e-6, "{} != {}", shipped, bound);
        }
        for &value in &solution.values {
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_report_pipeline() {
        let report = solve(2, 2, 2, SUPPLY, DEMAND, COSTS).unwrap();
        assert!(report.contains("Status: OPTIMAL"));
        assert!(report.contains("Total cost: 95.00"));
    }

    #[test]
    fn test_unbalanced_instance() {
        // Total capacity exceeds total demand; the surplus stays home
        let report = solve(2, 2, 2, "50,60;70,80", "40,30;50,60", COSTS).unwrap();
        assert!(report.contains("Status: OPTIMAL"));
        assert!(report.contains("Total cost: 280.00"));
    }

    #[test]
    fn test_single_good_instance() {
        let report = solve(
            2,
            5,
            1,
            "60000;60000",
            "30000;23000;15000;32000;16000",
            "1.75:2.25:1.5:2:1.5;2:2.5:2.5:1.5:1",
        )
        .unwrap();
        assert!(report.contains("Status: OPTIMAL"));
        assert!(report.contains("Total cost: 192750.00"));
    }

    #[test]
    fn test_zero_capacity_supply_center() {
        // Center 1 holds no stock and the rest exactly covers demand, so
        // the optimum must still meet every requirement in full
        let dims = Dimensions::new(3, 2, 1).unwrap();
        let instance = Instance::parse(dims, "0;5;4", "4;5", "1:2;3:1;2:2").unwrap();
        let problem = builder::build(&instance);
        let solution = Solver::new().solve(&problem).unwrap();

        assert!(solution.status.is_optimal());
        assert!((solution.objective_value - 13.0).abs() < 1e-6);
        for j in 0..dims.demand() {
            let shipped: f64 = (0..dims.supply())
                .map(|i| solution.values[dims.flatten(i, j, 0)])
                .sum();
            let required = instance.demand().requirement(j, 0);
            assert!(
                (shipped - required).abs() < 1e-6,
                "demand {}: {} (expected {})",
                j,
                shipped,
                required
            );
        }
    }

    #[test]
    fn test_excess_demand_reports_infeasible() {
        // Good 1 demand totals 31 against 30 units of capacity
        let report = solve(2, 2, 2, SUPPLY, "15,10;16,10", COSTS).unwrap();
        assert!(report.contains("Status: INFEASIBLE"));
        assert!(!report.contains("Total cost"));
    }

    #[test]
    fn test_malformed_supply_is_a_parse_error() {
        let result = solve(2, 2, 2, "10,abc;20,5", DEMAND, COSTS);
        assert!(matches!(
            result,
            Err(ModelError::Parse(ParseError::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn test_zero_dimension_is_a_dimension_error() {
        let result = solve(0, 2, 2, SUPPLY, DEMAND, COSTS);
        assert!(matches!(result, Err(ModelError::Dimension(_))));
    }

    #[test]
    fn test_error_messages_name_the_block() {
        let err = solve(2, 2, 2, SUPPLY, "15,10", COSTS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error: Expected 2 rows in demand limits, found 1"
        );
    }
}
