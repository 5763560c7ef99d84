use std::fmt;

use thiserror::Error;

use crate::instance::{CostTensor, DemandLimits, Dimensions, SupplyLimits};

/// Separates center rows in every block
pub const CENTER_SEPARATOR: char = ';';
/// Separates per-demand-center segments inside a cost row
pub const DEMAND_SEPARATOR: char = ':';
/// Separates per-good values
pub const GOOD_SEPARATOR: char = ',';

/// Which input block a [`ParseError`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    SupplyLimits,
    DemandLimits,
    TransportCosts,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::SupplyLimits => write!(f, "supply limits"),
            Section::DemandLimits => write!(f, "demand limits"),
            Section::TransportCosts => write!(f, "transportation costs"),
        }
    }
}

/// A malformed input block. Row numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected} rows in {section}, found {found}")]
    RowCount {
        section: Section,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} demand segments in {section} row {row}, found {found}")]
    SegmentCount {
        section: Section,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} values in {section} row {row}, found {found}")]
    ValueCount {
        section: Section,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid number in {section} row {row}: {token:?}")]
    InvalidNumber {
        section: Section,
        row: usize,
        token: String,
    },
    #[error("Negative value in {section} row {row}: {value}")]
    NegativeValue {
        section: Section,
        row: usize,
        value: f64,
    },
}

/// Parse the m x p supply capacity block: `;`-separated center rows of
/// `,`-separated per-good values.
pub fn parse_supply_limits(dims: Dimensions, text: &str) -> Result<SupplyLimits, ParseError> {
    let rows = parse_table(Section::SupplyLimits, text, dims.supply(), dims.goods())?;
    Ok(SupplyLimits::new(rows))
}

/// Parse the n x p demand requirement block, shaped like the supply block
/// but with one row per demand center.
pub fn parse_demand_limits(dims: Dimensions, text: &str) -> Result<DemandLimits, ParseError> {
    let rows = parse_table(Section::DemandLimits, text, dims.demand(), dims.goods())?;
    Ok(DemandLimits::new(rows))
}

/// Parse the m x n x p cost block: `;`-separated supply rows, each made of
/// `:`-separated demand segments of `,`-separated per-good costs.
pub fn parse_costs(dims: Dimensions, text: &str) -> Result<CostTensor, ParseError> {
    let section = Section::TransportCosts;
    let rows = split_rows(section, text, dims.supply())?;

    let mut tensor = Vec::with_capacity(dims.supply());
    for (index, row) in rows.iter().enumerate() {
        let segments: Vec<&str> = row.split(DEMAND_SEPARATOR).collect();
        if segments.len() != dims.demand() {
            return Err(ParseError::SegmentCount {
                section,
                row: index + 1,
                expected: dims.demand(),
                found: segments.len(),
            });
        }
        let mut per_demand = Vec::with_capacity(dims.demand());
        for segment in segments {
            per_demand.push(parse_values(section, index + 1, segment, dims.goods())?);
        }
        tensor.push(per_demand);
    }

    Ok(CostTensor::new(tensor))
}

fn split_rows<'t>(
    section: Section,
    text: &'t str,
    expected: usize,
) -> Result<Vec<&'t str>, ParseError> {
    let rows: Vec<&str> = text.split(CENTER_SEPARATOR).collect();
    if rows.len() != expected {
        return Err(ParseError::RowCount {
            section,
            expected,
            found: rows.len(),
        });
    }
    Ok(rows)
}

fn parse_table(
    section: Section,
    text: &str,
    expected_rows: usize,
    expected_values: usize,
) -> Result<Vec<Vec<f64>>, ParseError> {
    split_rows(section, text, expected_rows)?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_values(section, index + 1, row, expected_values))
        .collect()
}

fn parse_values(
    section: Section,
    row: usize,
    text: &str,
    expected: usize,
) -> Result<Vec<f64>, ParseError> {
    let tokens: Vec<&str> = text.split(GOOD_SEPARATOR).collect();
    if tokens.len() != expected {
        return Err(ParseError::ValueCount {
            section,
            row,
            expected,
            found: tokens.len(),
        });
    }

    let mut values = Vec::with_capacity(expected);
    for token in tokens {
        let trimmed = token.trim();
        let value: f64 = trimmed.parse().map_err(|_| ParseError::InvalidNumber {
            section,
            row,
            token: trimmed.to_string(),
        })?;
        // parse() accepts "inf" and "NaN" spellings; neither belongs in a
        // capacity, requirement, or cost
        if !value.is_finite() {
            return Err(ParseError::InvalidNumber {
                section,
                row,
                token: trimmed.to_string(),
            });
        }
        if value < 0.0 {
            return Err(ParseError::NegativeValue {
                section,
                row,
                value,
            });
        }
        values.push(value);
    }

    Ok(values)
}
