use parcoords::csv_reader::read_csv;
use parcoords::{
    overlay_parcoords, plot_parcoords, render_png, render_svg, row, Cell, ColumnSelector, ParcoordsOptions,
    PlotError, ScaleKind, ScaleSpec, Table, Warning,
};
use proptest::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::process::{Command, Stdio};

fn load(path: &str) -> Table {
    let file = File::open(path).expect("Failed to open test CSV");
    Table::from_csv(read_csv(file).expect("Failed to read test CSV")).expect("Invalid test table")
}

/// Helper function to run parcoords with CSV on stdin
fn run_parcoords(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_parcoords"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_axes_and_segment_counts() {
    let table = load("tests/data/hyperparameters.csv");
    let (figure, axes) = plot_parcoords(&table, &ParcoordsOptions::default()).unwrap();
    assert_eq!(axes.len(), 4);
    assert_eq!(figure.segments().len(), 10 * 3);
    assert_eq!(axes.get(1).unwrap().label.as_deref(), Some("# epochs"));
}

#[test]
fn test_categorical_ranks_and_overlay_lookup() {
    let table = Table::new(vec![row!["a", 0.0], row!["b", 1.0], row!["c", 2.0]]).unwrap();
    let (mut figure, axes) = plot_parcoords(&table, &ParcoordsOptions::default()).unwrap();
    let first: Vec<f64> = figure.segments().iter().map(|s| s.y0).collect();
    assert_eq!(first, vec![0.0, 0.5, 1.0]);

    let more = Table::new(vec![row!["b", 1.0]]).unwrap();
    overlay_parcoords(&mut figure, &axes, &more, &ParcoordsOptions::default()).unwrap();
    assert_eq!(figure.segments().last().unwrap().y0, 0.5);
}

#[test]
fn test_explicit_limits_are_exact() {
    let table = Table::new(vec![row![0.1, 1.0], row![0.5, 2.0], row![0.9, 3.0]]).unwrap();
    let options = ParcoordsOptions {
        y_limits: Some(vec![(0.0, 1.0), (0.0, 4.0)]),
        ..Default::default()
    };
    let (_, axes) = plot_parcoords(&table, &options).unwrap();
    assert_eq!(axes.limits(), vec![(0.0, 1.0), (0.0, 4.0)]);
}

#[test]
fn test_targeted_log_scale() {
    let table = Table::new(vec![row![0.1, 10, 0.5], row![0.2, 12, 0.9]]).unwrap();
    let options = ParcoordsOptions {
        labels: Some(vec!["lr".into(), "epochs".into(), "accuracy".into()]),
        scale: Some(ScaleSpec::Targeted(vec![(
            ColumnSelector::from("accuracy"),
            ScaleKind::Log,
        )])),
        ..Default::default()
    };
    let (_, axes) = plot_parcoords(&table, &options).unwrap();
    let scales: Vec<ScaleKind> = axes.iter().map(|a| a.scale).collect();
    assert_eq!(scales, vec![ScaleKind::Linear, ScaleKind::Linear, ScaleKind::Log]);
}

#[test]
fn test_color_follows_accuracy() {
    let table = load("tests/data/hyperparameters.csv");
    let options = ParcoordsOptions {
        color_field: Some(ColumnSelector::from("accuracy")),
        ..Default::default()
    };
    let (figure, _) = plot_parcoords(&table, &options).unwrap();

    let mut pairs: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let accuracy = cells[3].as_number().unwrap();
            let segment = figure.segments().iter().find(|s| s.row == row).unwrap();
            (accuracy, segment.color_value.unwrap())
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    assert!(pairs.windows(2).all(|w| w[0].1 <= w[1].1));
    assert_eq!(pairs[0].1, 0.0);
    assert_eq!(pairs[pairs.len() - 1].1, 1.0);
}

#[test]
fn test_overlay_with_limits_warns() {
    let table = load("tests/data/hyperparameters.csv");
    let (mut figure, axes) = plot_parcoords(&table, &ParcoordsOptions::default()).unwrap();
    let before = axes.limits();

    let options = ParcoordsOptions {
        y_limits: Some(vec![(0.0, 1.0); 4]),
        ..Default::default()
    };
    overlay_parcoords(&mut figure, &axes, &load("tests/data/overlay.csv"), &options).unwrap();

    assert_eq!(axes.limits(), before);
    assert_eq!(figure.warnings(), &[Warning::IgnoredOption { option: "y_limits" }]);
    assert_eq!(figure.segments().len(), 12 * 3);
}

#[test]
fn test_ragged_rows_rejected() {
    let result = Table::new(vec![row![1, 2, 3], row![1, 2, 3, 4]]);
    assert!(matches!(result, Err(PlotError::Configuration(_))));
}

#[test]
fn test_numeric_text_is_coerced() {
    let table = Table::new(vec![
        vec![Cell::from("1.5"), Cell::from(2.0)],
        vec![Cell::from("3"), Cell::from(4.0)],
    ])
    .unwrap();
    let (_, axes) = plot_parcoords(&table, &ParcoordsOptions::default()).unwrap();
    assert!(!axes.get(0).unwrap().is_categorical());
    assert_eq!(axes.get(0).unwrap().limits, (1.5, 3.0));
}

#[test]
fn test_svg_output() {
    let table = load("tests/data/hyperparameters.csv");
    let options = ParcoordsOptions {
        title: Some("Hyperparameter search".to_string()),
        ..Default::default()
    };
    let (figure, axes) = plot_parcoords(&table, &options).unwrap();
    let svg = render_svg(&figure, &axes).unwrap();
    assert!(svg.contains("Hyperparameter search"));
    assert!(svg.contains("sampling method"));
    assert!(svg.contains("rand_over"));
}

#[test]
fn test_png_output() {
    let table = load("tests/data/hyperparameters.csv");
    let options = ParcoordsOptions {
        title: Some("Hyperparameter search".to_string()),
        color_field: Some(ColumnSelector::from("accuracy")),
        ..Default::default()
    };
    let (figure, axes) = plot_parcoords(&table, &options).unwrap();
    let png = render_png(&figure, &axes).unwrap();
    assert!(is_valid_png(&png), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_png_default_format() {
    let csv = fs::read_to_string("tests/data/hyperparameters.csv").expect("Failed to read test CSV");
    let result = run_parcoords(&["--title", "Runs", "--color-field", "0"], &csv);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_oversized_png_fails() {
    let csv = fs::read_to_string("tests/data/hyperparameters.csv").expect("Failed to read test CSV");
    let result = run_parcoords(&["--width", "40000", "--height", "40000"], &csv);
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_svg() {
    let csv = fs::read_to_string("tests/data/hyperparameters.csv").expect("Failed to read test CSV");
    let result = run_parcoords(
        &[
            "--format",
            "svg",
            "--color-field",
            "accuracy",
            "--scale",
            "lr=log",
            "--overlay",
            "tests/data/overlay.csv",
        ],
        &csv,
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let svg = String::from_utf8(result.unwrap()).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn test_end_to_end_bad_color_fails() {
    let csv = fs::read_to_string("tests/data/hyperparameters.csv").expect("Failed to read test CSV");
    let result = run_parcoords(&["--format", "svg", "--color", "nope"], &csv);
    assert!(result.is_err());
}

proptest! {
    #[test]
    fn prop_segment_count_and_unit_positions(
        rows in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 4), 1..20),
        ncols in 2usize..=4,
    ) {
        let table = Table::new(
            rows.iter()
                .map(|r| r[..ncols].iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
        .unwrap();
        let (figure, axes) = plot_parcoords(&table, &ParcoordsOptions::default()).unwrap();

        prop_assert_eq!(axes.len(), ncols);
        prop_assert_eq!(figure.segments().len(), rows.len() * (ncols - 1));
        for segment in figure.segments() {
            prop_assert!((0.0..=1.0).contains(&segment.y0));
            prop_assert!((0.0..=1.0).contains(&segment.y1));
        }
    }
}
