//! Per-column axis configuration.
//!
//! An [`Axes`] collection holds one [`AxisSpec`] per column. Axis `i` for
//! `i < n - 1` is the left spine of panel `i`; the final axis is the twin of
//! the last panel and sits on its right edge. Once created, ranges, scales
//! and category mappings never change, so later overlays can reuse them.

use crate::error::{PlotError, PlotResult};
use crate::scale::ScaleKind;
use crate::transform::ColumnData;

/// Column labels sit this many axis heights above the axis bottom
pub const LABEL_HEIGHT: f64 = 1.07;

/// Which side of its panel an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

/// Frozen configuration of a single axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub column: usize,
    pub label: Option<String>,
    /// (bottom, top) in data units; bottom > top draws an inverted axis
    pub limits: (f64, f64),
    pub scale: ScaleKind,
    /// Rank -> label for categorical columns
    pub categories: Option<Vec<String>>,
}

impl AxisSpec {
    /// Build an axis for a freshly classified column.
    ///
    /// Explicit `limits` win over the observed range. A zero-width observed
    /// range is widened; zero-width explicit limits are rejected.
    pub fn build(
        column: usize,
        data: &ColumnData,
        limits: Option<(f64, f64)>,
        scale: ScaleKind,
        label: Option<String>,
    ) -> PlotResult<Self> {
        let limits = match limits {
            Some((lo, hi)) => {
                if lo == hi || !lo.is_finite() || !hi.is_finite() {
                    return Err(PlotError::Configuration(format!(
                        "y_limits for column {} must be two distinct finite values, got ({}, {})",
                        column, lo, hi
                    )));
                }
                (lo, hi)
            }
            None => {
                let (lo, hi) = data.min_max()?;
                if lo == hi {
                    scale.widen(lo)
                } else {
                    (lo, hi)
                }
            }
        };

        if !scale.accepts(limits.0) || !scale.accepts(limits.1) {
            return Err(PlotError::Configuration(format!(
                "range ({}, {}) of column {} is outside the domain of the {} scale",
                limits.0, limits.1, column, scale
            )));
        }

        Ok(AxisSpec {
            column,
            label,
            limits,
            scale,
            categories: data.categories().map(|c| c.to_vec()),
        })
    }

    /// Position of `value` in the axis' own coordinates: 0 at the bottom
    /// limit, 1 at the top, after applying the scale transform.
    pub fn normalize(&self, value: f64) -> f64 {
        let lo = self.scale.transform(self.limits.0);
        let hi = self.scale.transform(self.limits.1);
        (self.scale.transform(value) - lo) / (hi - lo)
    }

    /// Tick marks as (normalized position, label)
    pub fn ticks(&self) -> Vec<(f64, String)> {
        let (lo, hi) = if self.limits.0 <= self.limits.1 {
            self.limits
        } else {
            (self.limits.1, self.limits.0)
        };

        match &self.categories {
            Some(categories) => categories
                .iter()
                .enumerate()
                .filter(|(rank, _)| (*rank as f64) >= lo && (*rank as f64) <= hi)
                .map(|(rank, label)| (self.normalize(rank as f64), label.clone()))
                .collect(),
            None => self
                .scale
                .ticks(lo, hi)
                .into_iter()
                .map(|t| (self.normalize(t), format_tick(t)))
                .collect(),
        }
    }

    pub fn is_categorical(&self) -> bool {
        self.categories.is_some()
    }
}

/// Format a tick value without floating-point noise
pub fn format_tick(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Ordered axis collection, one entry per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    axes: Vec<AxisSpec>,
}

impl Axes {
    pub(crate) fn new(axes: Vec<AxisSpec>) -> Self {
        Self { axes }
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&AxisSpec> {
        self.axes.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisSpec> {
        self.axes.iter()
    }

    /// Number of side-by-side panels (one fewer than axes)
    pub fn panels(&self) -> usize {
        self.axes.len().saturating_sub(1)
    }

    /// Index of the panel an axis belongs to
    pub fn panel_of(&self, idx: usize) -> usize {
        idx.min(self.panels().saturating_sub(1))
    }

    /// The last axis is the right-hand twin of the last panel.
    pub fn side(&self, idx: usize) -> AxisSide {
        if idx + 1 == self.axes.len() {
            AxisSide::Right
        } else {
            AxisSide::Left
        }
    }

    /// Horizontal span in figure units: axis `i` covers `[i, i + 1]`,
    /// the twin shares the last panel's span.
    pub fn span(&self, idx: usize) -> (f64, f64) {
        let panel = self.panel_of(idx) as f64;
        (panel, panel + 1.0)
    }

    /// Where an axis' label is centered: (panel, x within the panel, y in
    /// axis heights). The twin's label sits over the panel's right edge.
    pub fn label_anchor(&self, idx: usize) -> (usize, f64, f64) {
        let x = match self.side(idx) {
            AxisSide::Left => 0.0,
            AxisSide::Right => 1.0,
        };
        (self.panel_of(idx), x, LABEL_HEIGHT)
    }

    /// Frozen (bottom, top) limits of every axis
    pub fn limits(&self) -> Vec<(f64, f64)> {
        self.axes.iter().map(|a| a.limits).collect()
    }
}
