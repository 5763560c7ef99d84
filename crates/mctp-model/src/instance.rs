use thiserror::Error;

use crate::input::{self, ParseError};

/// Problem dimensions: the number of supply centers, demand centers, and
/// goods. All three must be at least 1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    supply: usize,
    demand: usize,
    goods: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Dimensions must all be at least 1, got {supply} supply centers, {demand} demand centers, {goods} goods")]
pub struct DimensionError {
    pub supply: usize,
    pub demand: usize,
    pub goods: usize,
}

impl Dimensions {
    pub fn new(supply: usize, demand: usize, goods: usize) -> Result<Self, DimensionError> {
        if supply == 0 || demand == 0 || goods == 0 {
            return Err(DimensionError {
                supply,
                demand,
                goods,
            });
        }
        Ok(Self {
            supply,
            demand,
            goods,
        })
    }

    pub fn supply(&self) -> usize {
        self.supply
    }

    pub fn demand(&self) -> usize {
        self.demand
    }

    pub fn goods(&self) -> usize {
        self.goods
    }

    /// Number of decision variables, one per (supply, demand, good) route
    pub fn variables(&self) -> usize {
        self.supply * self.demand * self.goods
    }

    /// Number of supply capacity constraints, one per (supply, good) pair
    pub fn supply_rows(&self) -> usize {
        self.supply * self.goods
    }

    /// Number of demand requirement constraints, one per (demand, good) pair
    pub fn demand_rows(&self) -> usize {
        self.demand * self.goods
    }

    /// Flat index of the (supply, demand, good) route. The supply center
    /// is the outermost axis and the good the innermost; every flat
    /// structure in the model (objective, constraint rows, solution
    /// vector) is laid out in this exact order.
    pub fn flatten(&self, supply: usize, demand: usize, good: usize) -> usize {
        debug_assert!(supply < self.supply && demand < self.demand && good < self.goods);
        (supply * self.demand + demand) * self.goods + good
    }

    /// Inverse of [`flatten`](Self::flatten)
    pub fn unflatten(&self, index: usize) -> (usize, usize, usize) {
        debug_assert!(index < self.variables());
        let good = index % self.goods;
        let rest = index / self.goods;
        (rest / self.demand, rest % self.demand, good)
    }
}

/// Per-(supply center, good) shipping capacities, shape m x p
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyLimits {
    rows: Vec<Vec<f64>>,
}

impl SupplyLimits {
    pub(crate) fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Capacity of supply center `supply` for good `good`
    pub fn limit(&self, supply: usize, good: usize) -> f64 {
        self.rows[supply][good]
    }
}

/// Per-(demand center, good) requirements, shape n x p
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DemandLimits {
    rows: Vec<Vec<f64>>,
}

impl DemandLimits {
    pub(crate) fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Requirement of demand center `demand` for good `good`
    pub fn requirement(&self, demand: usize, good: usize) -> f64 {
        self.rows[demand][good]
    }
}

/// Per-route unit transportation costs, shape m x n x p
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CostTensor {
    rows: Vec<Vec<Vec<f64>>>,
}

impl CostTensor {
    pub(crate) fn new(rows: Vec<Vec<Vec<f64>>>) -> Self {
        Self { rows }
    }

    /// Unit cost of shipping good `good` from `supply` to `demand`
    pub fn cost(&self, supply: usize, demand: usize, good: usize) -> f64 {
        self.rows[supply][demand][good]
    }
}

/// A fully parsed problem instance: dimensions plus the three data
/// tables, all checked against each other
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    dims: Dimensions,
    supply: SupplyLimits,
    demand: DemandLimits,
    costs: CostTensor,
}

impl Instance {
    /// Parse the three delimited text blocks against `dims`. Parsing is
    /// all-or-nothing: the first malformed block aborts with an error and
    /// nothing partial is returned.
    pub fn parse(
        dims: Dimensions,
        supply_text: &str,
        demand_text: &str,
        costs_text: &str,
    ) -> Result<Self, ParseError> {
        let supply = input::parse_supply_limits(dims, supply_text)?;
        let demand = input::parse_demand_limits(dims, demand_text)?;
        let costs = input::parse_costs(dims, costs_text)?;
        Ok(Self {
            dims,
            supply,
            demand,
            costs,
        })
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn supply(&self) -> &SupplyLimits {
        &self.supply
    }

    pub fn demand(&self) -> &DemandLimits {
        &self.demand
    }

    pub fn costs(&self) -> &CostTensor {
        &self.costs
    }
}
