// Command-line option grammars

pub mod lexer;
pub mod options;

// Public API re-exports
pub use options::{parse_limits_arg, parse_scale_arg, parse_selector_arg};
