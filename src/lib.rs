// Library exports for parcoords

pub mod axes;
pub mod backend;
pub mod colormap;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod figure;
pub mod parser;
pub mod render;
pub mod scale;
pub mod transform;

pub use axes::{AxisSpec, Axes};
pub use backend::{render_png, render_svg};
pub use colormap::Colormap;
pub use data::{Cell, ColumnSelector, Table};
pub use error::{PlotError, PlotResult, Warning};
pub use figure::{Figure, FigureSize, Segment};
pub use render::{overlay_parcoords, plot_parcoords, ParcoordsOptions};
pub use scale::{ScaleKind, ScaleSpec};

use serde::Deserialize;

/// Encoding written by the command-line driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}
