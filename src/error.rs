//! Error and warning types for the renderer.

use std::fmt;

/// Errors raised while building or drawing a chart.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// The table or the options cannot describe a chart.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// There are no rows to compute axis ranges from.
    #[error("Table has no rows; axis ranges cannot be computed")]
    EmptyTable,

    /// A value has no place on an existing axis.
    #[error("Value '{value}' not found on axis {column}")]
    Lookup { column: usize, value: String },

    /// The drawing backend or image encoder failed.
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type PlotResult<T> = Result<T, PlotError>;

/// Non-fatal notices recorded while populating a figure.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// An option was supplied where it has no effect.
    IgnoredOption { option: &'static str },
    /// `color_field` did not resolve to a column.
    InvalidColorField(String),
    /// `scale` had an unusable shape.
    InvalidScale(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IgnoredOption { option } => {
                write!(f, "setting `{}` when using existing axes has no effect", option)
            }
            Warning::InvalidColorField(value) => {
                write!(f, "invalid value '{}' passed to `color_field`; attribute is ignored", value)
            }
            Warning::InvalidScale(value) => {
                write!(f, "invalid value '{}' passed to `scale`; attribute is ignored", value)
            }
        }
    }
}
