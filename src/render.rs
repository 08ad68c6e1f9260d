//! Parallel coordinates renderer.
//!
//! [`plot_parcoords`] creates a figure and one axis per column;
//! [`overlay_parcoords`] draws more rows onto axes returned by an earlier
//! call, reusing their frozen ranges, scales and category mappings.

use crate::axes::{AxisSpec, Axes};
use crate::colormap::{self, Colormap, Normalize};
use crate::data::{ColumnSelector, Table};
use crate::error::{PlotError, PlotResult, Warning};
use crate::figure::{Figure, FigureSize, Segment};
use crate::scale::{ScaleKind, ScaleSpec};
use crate::transform::{self, ColumnData};
use plotters::style::RGBColor;
use serde::Deserialize;
use tracing::debug;

/// Options accepted by the renderer. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParcoordsOptions {
    /// One label per column; falls back to the table headers
    pub labels: Option<Vec<String>>,
    pub title: Option<String>,
    /// Column whose normalized value picks each line's color
    pub color_field: Option<ColumnSelector>,
    /// Line color when no color field is active
    pub color: String,
    pub scale: Option<ScaleSpec>,
    pub figsize: Option<FigureSize>,
    pub colormap: Colormap,
    /// Explicit (min, max) for every axis
    pub y_limits: Option<Vec<(f64, f64)>>,
}

impl Default for ParcoordsOptions {
    fn default() -> Self {
        Self {
            labels: None,
            title: None,
            color_field: None,
            color: "grey".to_string(),
            scale: None,
            figsize: None,
            colormap: Colormap::default(),
            y_limits: None,
        }
    }
}

/// Render `table` onto a new figure with freshly computed axes.
pub fn plot_parcoords(table: &Table, options: &ParcoordsOptions) -> PlotResult<(Figure, Axes)> {
    let ncols = validate_shape(table)?;
    let labels = resolve_labels(table, options, ncols)?;
    let data: Vec<ColumnData> = table.columns().iter().map(|c| transform::classify(c)).collect();

    let mut warnings = Vec::new();

    let limits: Vec<Option<(f64, f64)>> = match &options.y_limits {
        Some(limits) if limits.len() != ncols => {
            return Err(PlotError::Configuration(format!(
                "y_limits has {} entries for {} columns",
                limits.len(),
                ncols
            )));
        }
        Some(limits) => limits.iter().copied().map(Some).collect(),
        None => vec![None; ncols],
    };

    let scales = match &options.scale {
        None => vec![ScaleKind::Linear; ncols],
        Some(spec) => spec.resolve(labels.as_deref(), ncols).unwrap_or_else(|| {
            warnings.push(Warning::InvalidScale(spec.to_string()));
            vec![ScaleKind::Linear; ncols]
        }),
    };

    let axes = data
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let label = labels.as_ref().map(|l| l[i].clone());
            AxisSpec::build(i, column, limits[i], scales[i], label)
        })
        .collect::<PlotResult<Vec<_>>>()?;
    let axes = Axes::new(axes);
    debug!(axes = axes.len(), limits = ?axes.limits(), "created axes");

    let line_color = resolve_line_color(options, labels.as_deref(), &data, &mut warnings)?;
    let segments = build_segments(&axes, &data, &line_color)?;

    let mut figure = Figure::new(options.figsize.unwrap_or_default());
    figure.title = options.title.clone();
    for warning in warnings {
        figure.warn(warning);
    }
    debug!(segments = segments.len(), "drawing rows");
    for segment in segments {
        figure.push_segment(segment);
    }

    Ok((figure, axes))
}

/// Draw `table` onto existing axes.
///
/// Axis configuration is frozen: `y_limits`, `scale`, `figsize` and `title`
/// are ignored with a warning. Categorical values must already be present
/// on their axis.
pub fn overlay_parcoords(
    figure: &mut Figure,
    axes: &Axes,
    table: &Table,
    options: &ParcoordsOptions,
) -> PlotResult<()> {
    let ncols = validate_shape(table)?;
    if ncols != axes.len() {
        return Err(PlotError::Configuration(format!(
            "table has {} columns but the existing axes have {}",
            ncols,
            axes.len()
        )));
    }
    let labels = resolve_labels(table, options, ncols)?.or_else(|| {
        axes.iter().map(|a| a.label.clone()).collect::<Option<Vec<_>>>()
    });

    let data = table
        .columns()
        .iter()
        .zip(axes.iter())
        .enumerate()
        .map(|(i, (column, axis))| transform::encode_with(i, column, axis.categories.as_deref()))
        .collect::<PlotResult<Vec<_>>>()?;

    let mut warnings = Vec::new();
    let ignored = [
        ("y_limits", options.y_limits.is_some()),
        ("scale", options.scale.is_some()),
        ("figsize", options.figsize.is_some()),
        ("title", options.title.is_some()),
    ];
    for &(option, given) in ignored.iter() {
        if given {
            warnings.push(Warning::IgnoredOption { option });
        }
    }

    let line_color = resolve_line_color(options, labels.as_deref(), &data, &mut warnings)?;
    let segments = build_segments(axes, &data, &line_color)?;

    for warning in warnings {
        figure.warn(warning);
    }
    debug!(segments = segments.len(), "drawing rows onto existing axes");
    for segment in segments {
        figure.push_segment(segment);
    }
    Ok(())
}

fn validate_shape(table: &Table) -> PlotResult<usize> {
    if table.nrows() == 0 {
        return Err(PlotError::EmptyTable);
    }
    let ncols = table.ncols();
    if ncols < 2 {
        return Err(PlotError::Configuration(format!(
            "parallel coordinates need at least 2 columns, got {}",
            ncols
        )));
    }
    Ok(ncols)
}

fn resolve_labels(
    table: &Table,
    options: &ParcoordsOptions,
    ncols: usize,
) -> PlotResult<Option<Vec<String>>> {
    match &options.labels {
        Some(labels) if labels.len() != ncols => Err(PlotError::Configuration(format!(
            "{} labels given for {} columns",
            labels.len(),
            ncols
        ))),
        Some(labels) => Ok(Some(labels.clone())),
        None => Ok(table.headers().map(|h| h.to_vec())),
    }
}

enum LineColor {
    Fixed(RGBColor),
    Field {
        column: usize,
        norm: Normalize,
        colormap: Colormap,
    },
}

fn resolve_line_color(
    options: &ParcoordsOptions,
    labels: Option<&[String]>,
    data: &[ColumnData],
    warnings: &mut Vec<Warning>,
) -> PlotResult<LineColor> {
    if let Some(selector) = &options.color_field {
        match selector.resolve(labels, data.len()) {
            Some(column) => {
                return Ok(LineColor::Field {
                    column,
                    norm: Normalize::from_values(data[column].values()),
                    colormap: options.colormap,
                })
            }
            None => warnings.push(Warning::InvalidColorField(selector.to_string())),
        }
    }

    colormap::parse_color(&options.color)
        .map(LineColor::Fixed)
        .ok_or_else(|| PlotError::Configuration(format!("unknown color '{}'", options.color)))
}

/// One segment per row and adjacent column pair.
fn build_segments(axes: &Axes, data: &[ColumnData], line_color: &LineColor) -> PlotResult<Vec<Segment>> {
    for (column, axis) in data.iter().zip(axes.iter()) {
        if let Some(bad) = column.values().iter().find(|v| !axis.scale.accepts(**v)) {
            return Err(PlotError::Configuration(format!(
                "value {} in column {} is outside the domain of the {} scale",
                bad, axis.column, axis.scale
            )));
        }
    }

    let nrows = data.first().map(|c| c.values().len()).unwrap_or(0);
    let mut segments = Vec::with_capacity(nrows * axes.panels());

    for row in 0..nrows {
        let (color, color_value) = match line_color {
            LineColor::Fixed(color) => (*color, None),
            LineColor::Field {
                column,
                norm,
                colormap,
            } => {
                let t = norm.apply(data[*column].values()[row]);
                (colormap.color(t), Some(t))
            }
        };

        for panel in 0..axes.panels() {
            let (left, right) = match (axes.get(panel), axes.get(panel + 1)) {
                (Some(left), Some(right)) => (left, right),
                _ => continue,
            };
            segments.push(Segment {
                panel,
                row,
                y0: left.normalize(data[panel].values()[row]),
                y1: right.normalize(data[panel + 1].values()[row]),
                color,
                color_value,
            });
        }
    }

    Ok(segments)
}
