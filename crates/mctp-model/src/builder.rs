use itertools::iproduct;
use log::{debug, info};
use mctp_solver::LpProblem;

use crate::instance::Instance;

/// Build the canonical-form LP for an instance.
///
/// The decision variable at flat index `flatten(i, j, k)` is the amount of
/// good `k` shipped from supply center `i` to demand center `j`. One
/// inequality row per (supply center, good) caps total outbound shipment
/// at the center's capacity; one equality row per (demand center, good)
/// pins total inbound shipment to the center's requirement. Construction
/// is deterministic: the same instance always yields an equal problem.
pub fn build(instance: &Instance) -> LpProblem {
    let dims = instance.dims();
    let (m, n, p) = (dims.supply(), dims.demand(), dims.goods());
    info!("Building transportation LP: {}x{}x{}", m, n, p);

    let mut objective = vec![0.0; dims.variables()];
    for (i, j, k) in iproduct!(0..m, 0..n, 0..p) {
        objective[dims.flatten(i, j, k)] = instance.costs().cost(i, j, k);
    }
    let mut problem = LpProblem::new(objective);

    // Supply capacity: outbound flow of each good from each center stays
    // within the center's limit
    for (i, k) in iproduct!(0..m, 0..p) {
        let mut row = vec![0.0; dims.variables()];
        for j in 0..n {
            row[dims.flatten(i, j, k)] = 1.0;
        }
        problem.add_ub_constraint(row, instance.supply().limit(i, k));
    }

    // Demand requirement: inbound flow of each good to each center meets
    // the requirement exactly
    for (j, k) in iproduct!(0..n, 0..p) {
        let mut row = vec![0.0; dims.variables()];
        for i in 0..m {
            row[dims.flatten(i, j, k)] = 1.0;
        }
        problem.add_eq_constraint(row, instance.demand().requirement(j, k));
    }

    debug!(
        "LP has {} variables, {} supply rows, {} demand rows",
        problem.num_variables(),
        problem.num_ub_constraints(),
        problem.num_eq_constraints()
    );
    problem
}
