use itertools::iproduct;
use mctp_solver::{Solution, SolutionStatus};

use crate::instance::Dimensions;

/// Render the solver outcome as a human-readable report.
///
/// Centers and goods are numbered from 1. The shipment plan lists only
/// routes that carry flow; the full solution vector follows in flat route
/// order for consumers that want every variable.
pub fn render(dims: Dimensions, solution: &Solution) -> String {
    match solution.status {
        SolutionStatus::Optimal => render_optimal(dims, solution),
        SolutionStatus::Infeasible => failure(
            "INFEASIBLE",
            "No shipment plan can meet every demand requirement within the supply limits.",
        ),
        SolutionStatus::Unbounded => failure("UNBOUNDED", "The problem has no finite optimal cost."),
        SolutionStatus::IterationLimit => failure(
            "ITERATION LIMIT",
            "The solver hit its iteration limit before proving optimality.",
        ),
    }
}

fn failure(status: &str, message: &str) -> String {
    format!("Status: {}\n{}\n", status, message)
}

fn render_optimal(dims: Dimensions, solution: &Solution) -> String {
    let mut out = String::new();
    out.push_str("Status: OPTIMAL\n");
    out.push_str(&format!("Total cost: {:.2}\n", solution.objective_value));
    out.push('\n');
    out.push_str("Shipment plan:\n");
    for (i, j, k) in iproduct!(0..dims.supply(), 0..dims.demand(), 0..dims.goods()) {
        let amount = solution.values[dims.flatten(i, j, k)];
        if amount > 0.001 {
            out.push_str(&format!(
                "  supply {} -> demand {}  good {}  {:>10.2}\n",
                i + 1,
                j + 1,
                k + 1,
                amount
            ));
        }
    }
    out.push('\n');
    out.push_str(&format!("Solution vector: {:?}\n", solution.values));
    out
}
