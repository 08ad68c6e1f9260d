use crate::csv_reader::CsvData;
use crate::error::{PlotError, PlotResult};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// A single table cell: numeric or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Finite numeric value of the cell, coercing text that parses as a float
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }

    /// Text shown for this cell on a categorical axis
    pub fn label(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Build a row of cells from heterogeneous literals: `row![0.1, 10, "smote"]`
#[macro_export]
macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$($crate::data::Cell::from($cell)),*]
    };
}

/// Selects a column either by position or by label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColumnSelector {
    Index(usize),
    Label(String),
}

impl ColumnSelector {
    /// Resolve to a column index. Labels need a label list to resolve against.
    pub fn resolve(&self, labels: Option<&[String]>, ncols: usize) -> Option<usize> {
        match self {
            ColumnSelector::Index(idx) => (*idx < ncols).then_some(*idx),
            ColumnSelector::Label(name) => labels?.iter().position(|l| l == name),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(idx) => write!(f, "{}", idx),
            ColumnSelector::Label(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for ColumnSelector {
    fn from(value: usize) -> Self {
        ColumnSelector::Index(value)
    }
}

impl From<&str> for ColumnSelector {
    fn from(value: &str) -> Self {
        ColumnSelector::Label(value.to_string())
    }
}

/// Row-major table of observations. Every row has the same number of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Option<Vec<String>>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table, rejecting rows of unequal length.
    pub fn new(rows: Vec<Vec<Cell>>) -> PlotResult<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(PlotError::Configuration(format!(
                    "row {} has {} cells but row 0 has {}",
                    idx,
                    row.len(),
                    width
                )));
            }
        }
        Ok(Self { headers: None, rows })
    }

    /// Attach column headers, used as axis labels when the options carry none.
    pub fn with_headers(mut self, headers: Vec<String>) -> PlotResult<Self> {
        if !self.rows.is_empty() && headers.len() != self.ncols() {
            return Err(PlotError::Configuration(format!(
                "{} headers given for {} columns",
                headers.len(),
                self.ncols()
            )));
        }
        self.headers = Some(headers);
        Ok(self)
    }

    /// Create a table from CSV contents; headers become labels
    pub fn from_csv(csv: CsvData) -> PlotResult<Self> {
        let rows = csv
            .rows
            .into_iter()
            .map(|r| r.into_iter().map(Cell::Text).collect())
            .collect();
        Table::new(rows)?.with_headers(csv.headers)
    }

    /// Create a table from a JSON array of arrays, or an array of objects
    /// whose first element's keys become the headers.
    pub fn from_json(value: &Value) -> PlotResult<Self> {
        let array = value.as_array().ok_or_else(|| {
            PlotError::Configuration("Input data must be a JSON array".to_string())
        })?;

        match array.first() {
            Some(Value::Object(first)) => {
                let headers: Vec<String> = first.keys().cloned().collect();
                let mut rows = Vec::with_capacity(array.len());
                for item in array {
                    let obj = item.as_object().ok_or_else(|| {
                        PlotError::Configuration("Items in array must all be objects".to_string())
                    })?;
                    let row = headers
                        .iter()
                        .map(|h| json_cell(obj.get(h).unwrap_or(&Value::Null), h))
                        .collect::<PlotResult<Vec<_>>>()?;
                    rows.push(row);
                }
                Table::new(rows)?.with_headers(headers)
            }
            Some(_) => {
                let mut rows = Vec::with_capacity(array.len());
                for (idx, item) in array.iter().enumerate() {
                    let cells = item.as_array().ok_or_else(|| {
                        PlotError::Configuration("Items in array must all be arrays".to_string())
                    })?;
                    let row = cells
                        .iter()
                        .map(|v| json_cell(v, &format!("row {}", idx)))
                        .collect::<PlotResult<Vec<_>>>()?;
                    rows.push(row);
                }
                Table::new(rows)
            }
            None => Table::new(Vec::new()),
        }
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.rows
            .first()
            .map(|r| r.len())
            .or_else(|| self.headers.as_ref().map(|h| h.len()))
            .unwrap_or(0)
    }

    /// Transpose rows into columns.
    pub fn columns(&self) -> Vec<Vec<&Cell>> {
        (0..self.ncols())
            .map(|c| self.rows.iter().map(|row| &row[c]).collect())
            .collect()
    }
}

fn json_cell(value: &Value, field: &str) -> PlotResult<Cell> {
    match value {
        Value::Number(n) => n.as_f64().map(Cell::Number).ok_or_else(|| {
            PlotError::Configuration(format!("Number out of range in '{}'", field))
        }),
        Value::String(s) => Ok(Cell::Text(s.clone())),
        Value::Bool(b) => Ok(Cell::Text(b.to_string())),
        Value::Null => Ok(Cell::Text(String::new())),
        _ => Err(PlotError::Configuration(format!(
            "Unsupported value type for field '{}'",
            field
        ))),
    }
}
