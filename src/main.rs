use anyhow::{Context, Result};
use clap::Parser;
use parcoords::csv_reader;
use parcoords::parser::{parse_limits_arg, parse_scale_arg, parse_selector_arg};
use parcoords::{
    overlay_parcoords, plot_parcoords, render_png, render_svg, Colormap, FigureSize,
    OutputFormat, ParcoordsOptions, Table,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Limits = Vec<(f64, f64)>;

#[derive(Parser, Debug)]
#[command(name = "parcoords")]
#[command(about = "Draw a parallel coordinates chart from CSV data on stdin", long_about = None)]
struct Args {
    /// Figure title
    #[arg(long)]
    title: Option<String>,

    /// Column (label or 0-based index) that drives line color
    #[arg(long, value_parser = parse_selector_arg)]
    color_field: Option<parcoords::ColumnSelector>,

    /// Line color when no color field is used (name or #rrggbb)
    #[arg(long)]
    color: Option<String>,

    /// Axis scales: 'log', 'log,linear,log' or 'lr=log,2=symlog'
    #[arg(long)]
    scale: Option<String>,

    /// Colormap for --color-field
    #[arg(long, value_parser = |s: &str| s.parse::<Colormap>())]
    colormap: Option<Colormap>,

    /// Per-axis limits, e.g. '0:1,8:16'
    #[arg(long, value_parser = parse_limits_arg)]
    y_limits: Option<Limits>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// JSON file with renderer options; flags override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// CSV file drawn onto the same axes after stdin
    #[arg(long)]
    overlay: Option<PathBuf>,
}

impl Args {
    fn renderer_options(&self) -> Result<ParcoordsOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open options file {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("Failed to parse options file {}", path.display()))?
            }
            None => ParcoordsOptions::default(),
        };

        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        }
        if let Some(field) = &self.color_field {
            options.color_field = Some(field.clone());
        }
        if let Some(color) = &self.color {
            options.color = color.clone();
        }
        if let Some(scale) = &self.scale {
            options.scale = Some(parse_scale_arg(scale));
        }
        if let Some(colormap) = self.colormap {
            options.colormap = colormap;
        }
        if let Some(limits) = &self.y_limits {
            options.y_limits = Some(limits.clone());
        }
        if self.width.is_some() || self.height.is_some() {
            let base = options.figsize.unwrap_or_default();
            options.figsize = Some(FigureSize {
                width: self.width.unwrap_or(base.width),
                height: self.height.unwrap_or(base.height),
            });
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = args.renderer_options()?;

    // Read CSV from stdin
    let csv_data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    let table = Table::from_csv(csv_data).context("Invalid table")?;
    info!(rows = table.nrows(), columns = table.ncols(), "loaded table");

    let (mut figure, axes) = plot_parcoords(&table, &options).context("Failed to render plot")?;

    if let Some(path) = &args.overlay {
        let file = File::open(path)
            .with_context(|| format!("Failed to open overlay file {}", path.display()))?;
        let overlay = Table::from_csv(csv_reader::read_csv(file)?).context("Invalid overlay table")?;
        let overlay_options = ParcoordsOptions {
            color_field: options.color_field.clone(),
            color: options.color.clone(),
            colormap: options.colormap,
            labels: options.labels.clone(),
            ..Default::default()
        };
        overlay_parcoords(&mut figure, &axes, &overlay, &overlay_options)
            .context("Failed to render overlay")?;
    }

    let bytes = match args.format {
        OutputFormat::Png => render_png(&figure, &axes).context("Failed to encode PNG")?,
        OutputFormat::Svg => render_svg(&figure, &axes)
            .context("Failed to render SVG")?
            .into_bytes(),
    };

    // Write image to stdout
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write image to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
