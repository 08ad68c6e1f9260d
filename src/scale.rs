//! Axis scale kinds, the accepted shapes of the `scale` option, and tick placement.

use crate::data::ColumnSelector;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Functional mapping from raw value to vertical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    /// Base-10 logarithm
    Log,
    /// Symmetric log, linear within [-1, 1]
    Symlog,
    /// log10(p / (1 - p)), defined on (0, 1)
    Logit,
}

// Factor applied inside the symlog linear region (linscale 1, base 10).
const SYMLOG_LINSCALE: f64 = 1.0 / (1.0 - 1.0 / 10.0);

impl ScaleKind {
    pub fn transform(self, value: f64) -> f64 {
        match self {
            ScaleKind::Linear => value,
            ScaleKind::Log => value.log10(),
            ScaleKind::Symlog => {
                if value.abs() <= 1.0 {
                    value * SYMLOG_LINSCALE
                } else {
                    value.signum() * (SYMLOG_LINSCALE + value.abs().log10())
                }
            }
            ScaleKind::Logit => (value / (1.0 - value)).log10(),
        }
    }

    /// Whether `value` lies in the scale's domain
    pub fn accepts(self, value: f64) -> bool {
        match self {
            ScaleKind::Linear | ScaleKind::Symlog => value.is_finite(),
            ScaleKind::Log => value.is_finite() && value > 0.0,
            ScaleKind::Logit => value > 0.0 && value < 1.0,
        }
    }

    /// Widen a zero-width range so the transform has a non-zero span.
    pub fn widen(self, value: f64) -> (f64, f64) {
        match self {
            ScaleKind::Log => (value / 10.0, value * 10.0),
            ScaleKind::Logit => ((value / 2.0), (value + 1.0) / 2.0),
            ScaleKind::Linear | ScaleKind::Symlog => (value - 1.0, value + 1.0),
        }
    }

    /// Tick positions for an axis spanning `a..b` (either order).
    pub fn ticks(self, a: f64, b: f64) -> Vec<f64> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let ticks: Vec<f64> = match self {
            ScaleKind::Linear => nice_ticks(lo, hi, 5),
            ScaleKind::Log => decades(lo, hi),
            ScaleKind::Symlog => {
                let mut ticks: Vec<f64> = Vec::new();
                if hi > 0.0 {
                    ticks.extend(decades(lo.max(1.0), hi));
                }
                if lo < 0.0 {
                    ticks.extend(decades((-hi).max(1.0), -lo).into_iter().map(|t| -t));
                }
                if lo <= 0.0 && hi >= 0.0 {
                    ticks.push(0.0);
                }
                ticks.sort_by(|x, y| x.total_cmp(y));
                ticks
            }
            ScaleKind::Logit => [0.001, 0.01, 0.1, 0.5, 0.9, 0.99, 0.999]
                .into_iter()
                .filter(|t| *t >= lo && *t <= hi)
                .collect(),
        };
        if ticks.len() < 2 {
            vec![lo, hi]
        } else {
            ticks
        }
    }
}

impl FromStr for ScaleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(ScaleKind::Linear),
            "log" => Ok(ScaleKind::Log),
            "symlog" => Ok(ScaleKind::Symlog),
            "logit" => Ok(ScaleKind::Logit),
            other => Err(format!("unknown scale '{}'", other)),
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleKind::Linear => "linear",
            ScaleKind::Log => "log",
            ScaleKind::Symlog => "symlog",
            ScaleKind::Logit => "logit",
        };
        f.write_str(name)
    }
}

/// The accepted shapes of the `scale` option.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleSpec {
    /// One kind for every axis
    Uniform(ScaleKind),
    /// One kind per axis, in order
    Positional(Vec<ScaleKind>),
    /// Explicit (column, kind) pairs; other axes stay linear
    Targeted(Vec<(ColumnSelector, ScaleKind)>),
    /// Input that matched none of the shapes above
    Unrecognized(String),
}

impl ScaleSpec {
    /// Resolve to one kind per axis. `None` means the shape is unusable.
    pub fn resolve(&self, labels: Option<&[String]>, ncols: usize) -> Option<Vec<ScaleKind>> {
        let mut kinds = vec![ScaleKind::Linear; ncols];
        match self {
            ScaleSpec::Uniform(kind) => kinds.fill(*kind),
            ScaleSpec::Positional(list) if !list.is_empty() => {
                for (slot, kind) in kinds.iter_mut().zip(list) {
                    *slot = *kind;
                }
            }
            ScaleSpec::Targeted(pairs) if !pairs.is_empty() => {
                for (selector, kind) in pairs {
                    let idx = selector.resolve(labels, ncols)?;
                    kinds[idx] = *kind;
                }
            }
            _ => return None,
        }
        Some(kinds)
    }

    /// Interpret a loosely-typed value (e.g. from a JSON options file).
    pub fn from_value(value: &Value) -> ScaleSpec {
        let unrecognized = || ScaleSpec::Unrecognized(value.to_string());
        match value {
            Value::String(s) => s.parse().map(ScaleSpec::Uniform).unwrap_or_else(|_| unrecognized()),
            Value::Array(items) if !items.is_empty() => {
                if items.iter().all(Value::is_string) {
                    items
                        .iter()
                        .map(|v| v.as_str().unwrap_or_default().parse::<ScaleKind>())
                        .collect::<Result<Vec<_>, _>>()
                        .map(ScaleSpec::Positional)
                        .unwrap_or_else(|_| unrecognized())
                } else {
                    items
                        .iter()
                        .map(target_pair)
                        .collect::<Option<Vec<_>>>()
                        .map(ScaleSpec::Targeted)
                        .unwrap_or_else(unrecognized)
                }
            }
            _ => unrecognized(),
        }
    }
}

fn target_pair(value: &Value) -> Option<(ColumnSelector, ScaleKind)> {
    let pair = value.as_array().filter(|p| p.len() == 2)?;
    let selector = match &pair[0] {
        Value::String(s) => ColumnSelector::Label(s.clone()),
        Value::Number(n) => ColumnSelector::Index(n.as_u64()? as usize),
        _ => return None,
    };
    let kind = pair[1].as_str()?.parse().ok()?;
    Some((selector, kind))
}

impl<'de> Deserialize<'de> for ScaleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ScaleSpec::from_value(&value))
    }
}

impl fmt::Display for ScaleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleSpec::Uniform(kind) => write!(f, "{}", kind),
            ScaleSpec::Positional(kinds) => {
                let parts: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ScaleSpec::Targeted(pairs) => {
                let parts: Vec<String> = pairs.iter().map(|(s, k)| format!("({}, {})", s, k)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ScaleSpec::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Round `range` to 1, 2, 5 or 10 times a power of ten.
fn nice_number(range: f64, round: bool) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10_f64.powf(exponent);

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * 10_f64.powf(exponent)
}

/// Evenly spaced round tick values within `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, num_ticks: usize) -> Vec<f64> {
    if num_ticks < 2 || max <= min {
        return vec![min];
    }

    let range = nice_number(max - min, false);
    let spacing = nice_number(range / (num_ticks - 1) as f64, true);
    let first = (min / spacing).ceil() as i64;
    let last = (max / spacing).floor() as i64;

    (first..=last)
        .map(|i| i as f64 * spacing)
        // snap values like 0.30000000000000004
        .map(|t| (t / spacing).round() * spacing)
        .collect()
}

/// Powers of ten within `[lo, hi]`, both positive.
fn decades(lo: f64, hi: f64) -> Vec<f64> {
    if lo <= 0.0 || hi < lo {
        return Vec::new();
    }
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    (first..=last).map(|e| 10_f64.powi(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels() -> Vec<String> {
        vec!["lr".to_string(), "epochs".to_string(), "accuracy".to_string()]
    }

    #[test]
    fn test_targeted_scale_only_touches_named_axis() {
        let spec = ScaleSpec::Targeted(vec![(ColumnSelector::from("accuracy"), ScaleKind::Log)]);
        let kinds = spec.resolve(Some(&labels()), 3).unwrap();
        assert_eq!(kinds, vec![ScaleKind::Linear, ScaleKind::Linear, ScaleKind::Log]);
    }

    #[test]
    fn test_targeted_unknown_label_is_invalid() {
        let spec = ScaleSpec::Targeted(vec![(ColumnSelector::from("loss"), ScaleKind::Log)]);
        assert!(spec.resolve(Some(&labels()), 3).is_none());
    }

    #[test]
    fn test_positional_shorter_than_axes() {
        let spec = ScaleSpec::Positional(vec![ScaleKind::Log]);
        let kinds = spec.resolve(None, 3).unwrap();
        assert_eq!(kinds, vec![ScaleKind::Log, ScaleKind::Linear, ScaleKind::Linear]);
    }

    #[test]
    fn test_uniform_and_empty() {
        let kinds = ScaleSpec::Uniform(ScaleKind::Symlog).resolve(None, 2).unwrap();
        assert_eq!(kinds, vec![ScaleKind::Symlog; 2]);
        assert!(ScaleSpec::Positional(vec![]).resolve(None, 2).is_none());
        assert!(ScaleSpec::Unrecognized("x".into()).resolve(None, 2).is_none());
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(ScaleSpec::from_value(&json!("log")), ScaleSpec::Uniform(ScaleKind::Log));
        assert_eq!(
            ScaleSpec::from_value(&json!(["log", "linear"])),
            ScaleSpec::Positional(vec![ScaleKind::Log, ScaleKind::Linear])
        );
        assert_eq!(
            ScaleSpec::from_value(&json!([["lr", "log"], [2, "logit"]])),
            ScaleSpec::Targeted(vec![
                (ColumnSelector::from("lr"), ScaleKind::Log),
                (ColumnSelector::from(2), ScaleKind::Logit),
            ])
        );
        assert!(matches!(ScaleSpec::from_value(&json!(42)), ScaleSpec::Unrecognized(_)));
        assert!(matches!(ScaleSpec::from_value(&json!(["log", 3])), ScaleSpec::Unrecognized(_)));
        assert!(matches!(ScaleSpec::from_value(&json!("cubic")), ScaleSpec::Unrecognized(_)));
    }

    #[test]
    fn test_symlog_is_continuous_and_odd() {
        let inside = ScaleKind::Symlog.transform(1.0);
        let outside = ScaleKind::Symlog.transform(1.0 + 1e-9);
        assert!((inside - outside).abs() < 1e-6);
        assert_eq!(ScaleKind::Symlog.transform(-50.0), -ScaleKind::Symlog.transform(50.0));
    }

    #[test]
    fn test_domains() {
        assert!(!ScaleKind::Log.accepts(0.0));
        assert!(ScaleKind::Log.accepts(0.01));
        assert!(!ScaleKind::Logit.accepts(1.0));
        assert!(ScaleKind::Symlog.accepts(-3.0));
    }

    #[test]
    fn test_nice_ticks() {
        let ticks = nice_ticks(0.0, 1.0, 5);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0], 0.0);
        assert!((ticks[5] - 1.0).abs() < 1e-12);

        let ticks = nice_ticks(8.0, 16.0, 5);
        assert_eq!(ticks, vec![8.0, 10.0, 12.0, 14.0, 16.0]);
    }

    #[test]
    fn test_log_ticks() {
        let ticks = ScaleKind::Log.ticks(0.01, 0.2);
        assert_eq!(ticks.len(), 2);
        assert!((ticks[0] - 0.01).abs() < 1e-15);
        assert!((ticks[1] - 0.1).abs() < 1e-15);
        // fewer than two decades falls back to the endpoints
        assert_eq!(ScaleKind::Log.ticks(2.0, 5.0), vec![2.0, 5.0]);
    }
}
