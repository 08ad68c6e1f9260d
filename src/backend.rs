//! Raster and vector output for a populated figure.

use crate::axes::{AxisSide, Axes};
use crate::error::{PlotError, PlotResult};
use crate::figure::Figure;
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

const TICK_LENGTH: i32 = 4;
/// Largest accepted width or height of a bitmap, in pixels
const MAX_DIMENSION: u32 = 16_384;

/// Encode the figure as a PNG image.
pub fn render_png(figure: &Figure, axes: &Axes) -> PlotResult<Vec<u8>> {
    let (width, height) = (figure.size.width, figure.size.height);
    let mut buffer = vec![0u8; rgb_buffer_len(width, height)?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure, axes)?;
        root.present().map_err(backend_error)?;
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(&buffer, width, height, image::ColorType::Rgb8)
        .map_err(|e| PlotError::Backend(format!("Failed to encode PNG: {}", e)))?;
    debug!(bytes = png_bytes.len(), "encoded png");
    Ok(png_bytes)
}

/// Render the figure as an SVG document.
pub fn render_svg(figure: &Figure, axes: &Axes) -> PlotResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (figure.size.width, figure.size.height))
            .into_drawing_area();
        draw_figure(&root, figure, axes)?;
        root.present().map_err(backend_error)?;
    }
    Ok(svg)
}

/// Bytes needed for an RGB bitmap of the given size
fn rgb_buffer_len(width: u32, height: u32) -> PlotResult<usize> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(PlotError::Configuration(format!(
            "figure size {}x{} must be between 1 and {} pixels per side",
            width, height, MAX_DIMENSION
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| {
            PlotError::Configuration(format!("figure size {}x{} is too large", width, height))
        })
}

fn backend_error<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

/// Pixel geometry of the panel grid.
struct Frame {
    left: f64,
    top: f64,
    bottom: f64,
    panel_width: f64,
}

impl Frame {
    fn new(figure: &Figure, panels: usize) -> Self {
        let (w, h) = (figure.size.width as f64, figure.size.height as f64);
        let layout = figure.layout;
        let left = layout.left * w;
        let right = layout.right * w;
        Frame {
            left,
            top: (1.0 - layout.top) * h,
            bottom: (1.0 - layout.bottom) * h,
            panel_width: (right - left) / panels.max(1) as f64,
        }
    }

    /// Pixel position of a point given in panel units
    fn point(&self, panel: usize, x: f64, y: f64) -> (i32, i32) {
        let px = self.left + (panel as f64 + x) * self.panel_width;
        let py = self.bottom - y * (self.bottom - self.top);
        (px.round() as i32, py.round() as i32)
    }
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    axes: &Axes,
) -> PlotResult<()> {
    root.fill(&WHITE).map_err(backend_error)?;
    let frame = Frame::new(figure, axes.panels());

    if let Some(title) = &figure.title {
        let style = TextStyle::from(("sans-serif", 20).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        root.draw_text(title, &style, ((figure.size.width / 2) as i32, 10))
            .map_err(backend_error)?;
    }

    let tick_style = TextStyle::from(("sans-serif", 11).into_font()).color(&BLACK);
    let label_style = TextStyle::from(("sans-serif", 13).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (idx, axis) in axes.iter().enumerate() {
        let panel = axes.panel_of(idx);
        let side = axes.side(idx);
        let edge = if side == AxisSide::Right { 1.0 } else { 0.0 };

        root.draw(&PathElement::new(
            vec![frame.point(panel, edge, 0.0), frame.point(panel, edge, 1.0)],
            BLACK.stroke_width(1),
        ))
        .map_err(backend_error)?;

        for (pos, text) in axis.ticks() {
            if !(0.0..=1.0).contains(&pos) {
                continue;
            }
            let (x, y) = frame.point(panel, edge, pos);
            let (outward, anchor) = match side {
                AxisSide::Left => (-TICK_LENGTH, HPos::Right),
                AxisSide::Right => (TICK_LENGTH, HPos::Left),
            };
            root.draw(&PathElement::new(
                vec![(x, y), (x + outward, y)],
                BLACK.stroke_width(1),
            ))
            .map_err(backend_error)?;
            root.draw_text(
                &text,
                &tick_style.pos(Pos::new(anchor, VPos::Center)),
                (x + outward * 2, y),
            )
            .map_err(backend_error)?;
        }

        if let Some(label) = &axis.label {
            let (panel, x, y) = axes.label_anchor(idx);
            root.draw_text(label, &label_style, frame.point(panel, x, y))
                .map_err(backend_error)?;
        }
    }

    let mut drawn = 0usize;
    for segment in figure.segments() {
        if let Some(((x0, y0), (x1, y1))) = segment.clipped() {
            root.draw(&PathElement::new(
                vec![
                    frame.point(segment.panel, x0, y0),
                    frame.point(segment.panel, x1, y1),
                ],
                segment.color.stroke_width(1),
            ))
            .map_err(backend_error)?;
            drawn += 1;
        }
    }
    debug!(drawn, total = figure.segments().len(), "drew segments");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{plot_parcoords, ParcoordsOptions};
    use crate::row;
    use crate::data::Table;
    use crate::figure::FigureSize;

    fn figure() -> (Figure, Axes) {
        let table = Table::new(vec![row![1.0, 2.0, 3.0], row![2.0, 1.0, 5.0]]).unwrap();
        plot_parcoords(&table, &ParcoordsOptions::default()).unwrap()
    }

    #[test]
    fn test_frame_geometry() {
        let (figure, axes) = figure();
        let frame = Frame::new(&figure, axes.panels());
        assert_eq!(frame.point(0, 0.0, 0.0), (100, 534));
        assert_eq!(frame.point(1, 1.0, 1.0), (720, 90));
    }

    #[test]
    fn test_svg_contains_segments() {
        let (figure, axes) = figure();
        let svg = render_svg(&figure, &axes).unwrap();
        assert!(svg.starts_with("<svg"));
        // 3 spines + 4 segments, plus one tick mark per visible tick
        assert!(svg.matches("<polyline").count() >= 3 + 4);
    }

    #[test]
    fn test_png_output() {
        let (mut figure, axes) = figure();
        figure.title = Some("Runs".to_string());
        let png = render_png(&figure, &axes).unwrap();
        assert!(png.len() > 8);
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_png_rejects_bad_sizes() {
        let (mut figure, axes) = figure();
        figure.size = FigureSize { width: 0, height: 600 };
        assert!(matches!(render_png(&figure, &axes), Err(PlotError::Configuration(_))));
        figure.size = FigureSize { width: 40_000, height: 40_000 };
        assert!(matches!(render_png(&figure, &axes), Err(PlotError::Configuration(_))));
        assert_eq!(rgb_buffer_len(800, 600), Ok(800 * 600 * 3));
        assert!(rgb_buffer_len(u32::MAX, u32::MAX).is_err());
    }
}
