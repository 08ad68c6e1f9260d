use crate::data::Cell;
use crate::error::{PlotError, PlotResult};
use std::collections::BTreeSet;

/// A column after classification: plotted values plus any category labels.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical {
        /// Rank of each row's value within `categories`
        ranks: Vec<f64>,
        /// Sorted distinct labels; index == rank
        categories: Vec<String>,
    },
}

impl ColumnData {
    /// Values to place on the axis (raw numbers or ranks)
    pub fn values(&self) -> &[f64] {
        match self {
            ColumnData::Numeric(v) => v,
            ColumnData::Categorical { ranks, .. } => ranks,
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            ColumnData::Numeric(_) => None,
            ColumnData::Categorical { categories, .. } => Some(categories),
        }
    }

    /// Observed (min, max) of the plotted values
    pub fn min_max(&self) -> PlotResult<(f64, f64)> {
        let values = self.values();
        if values.is_empty() {
            return Err(PlotError::EmptyTable);
        }
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok((min, max))
    }
}

/// Classify a fresh column. A column is numeric only if every cell coerces.
pub fn classify(column: &[&Cell]) -> ColumnData {
    let numeric: Option<Vec<f64>> = column.iter().map(|c| c.as_number()).collect();
    if let Some(values) = numeric {
        return ColumnData::Numeric(values);
    }

    let labels: Vec<String> = column.iter().map(|c| c.label()).collect();
    let categories: Vec<String> = labels
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    // `categories` is sorted, so binary search gives the rank
    let ranks = labels
        .iter()
        .map(|l| categories.binary_search(l).unwrap_or_default() as f64)
        .collect();

    ColumnData::Categorical { ranks, categories }
}

/// Encode a column against an axis created by an earlier call.
///
/// Categorical axes look each value up by label; numeric axes only accept
/// cells that coerce to numbers.
pub fn encode_with(
    column_idx: usize,
    column: &[&Cell],
    categories: Option<&[String]>,
) -> PlotResult<ColumnData> {
    match categories {
        Some(categories) => {
            let ranks = column
                .iter()
                .map(|cell| {
                    let label = cell.label();
                    categories
                        .iter()
                        .position(|c| *c == label)
                        .map(|rank| rank as f64)
                        .ok_or(PlotError::Lookup {
                            column: column_idx,
                            value: label,
                        })
                })
                .collect::<PlotResult<Vec<_>>>()?;
            Ok(ColumnData::Categorical {
                ranks,
                categories: categories.to_vec(),
            })
        }
        None => column
            .iter()
            .map(|cell| {
                cell.as_number().ok_or_else(|| PlotError::Lookup {
                    column: column_idx,
                    value: cell.label(),
                })
            })
            .collect::<PlotResult<Vec<_>>>()
            .map(ColumnData::Numeric),
    }
}
