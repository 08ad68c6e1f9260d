use crate::error::Warning;
use plotters::style::RGBColor;
use serde::Deserialize;

/// Pixel size of a freshly created figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FigureSize {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Position of the plotting area as fractions of the figure size,
/// measured from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for Layout {
    fn default() -> Self {
        // Panels touch horizontally; the top leaves room for labels and title
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.85,
        }
    }
}

/// One drawn line between adjacent axes.
///
/// `y0` is the row's position on the panel's left axis and `y1` on the next
/// axis, both in axis-normalized units (0 = bottom limit, 1 = top limit).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub panel: usize,
    pub row: usize,
    pub y0: f64,
    pub y1: f64,
    pub color: RGBColor,
    /// Normalized color-field value the color was looked up with
    pub color_value: Option<f64>,
}

impl Segment {
    /// Clip to the panel's unit box. Returns the visible
    /// `((x0, y0), (x1, y1))` in panel units, or `None` when fully outside.
    pub fn clipped(&self) -> Option<((f64, f64), (f64, f64))> {
        let (y0, y1) = (self.y0, self.y1);
        if !y0.is_finite() || !y1.is_finite() {
            return None;
        }

        // Parametrise y(t) = y0 + t * (y1 - y0), t == x in [0, 1]
        let dy = y1 - y0;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dy, y0), (dy, 1.0 - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
        if t0 > t1 {
            return None;
        }
        Some(((t0, y0 + t0 * dy), (t1, y0 + t1 * dy)))
    }
}

/// A chart under construction: page setup plus everything drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub size: FigureSize,
    pub layout: Layout,
    pub title: Option<String>,
    segments: Vec<Segment>,
    warnings: Vec<Warning>,
}

impl Figure {
    pub fn new(size: FigureSize) -> Self {
        Self {
            size,
            layout: Layout::default(),
            title: None,
            segments: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Notices recorded while populating this figure, across all calls
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
