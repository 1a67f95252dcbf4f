use std::fs;
use std::path::{Path, PathBuf};

use dxfsvg_engine::{ConversionOptions, LayerSelection};
use dxfsvg_frontend::batch::{BatchRequest, run_batch};
use dxfsvg_frontend::errors::FrontendError;

fn io_fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../dxfsvg-io/tests/data");
    path.push(name);
    path
}

fn stage(dir: &Path, fixture: &str, name: &str) -> PathBuf {
    let target = dir.join(name);
    fs::copy(io_fixture(fixture), &target).expect("copy fixture");
    target
}

#[test]
fn batch_writes_svgs_and_keeps_going_after_failures() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let plan = stage(dir.path(), "floorplan.dxf", "plan.DXF");
    let broken = stage(dir.path(), "truncated.dxf", "broken.dxf");
    let json = stage(dir.path(), "sample.json", "sample.json");

    let request = BatchRequest {
        inputs: vec![plan.clone(), broken.clone(), json.clone()],
        output_dir: None,
        options: ConversionOptions::default(),
        threads: 2,
    };
    let report = run_batch(&request).expect("batch should run");

    let inputs: Vec<_> = report.outcomes.iter().map(|o| o.input.clone()).collect();
    assert_eq!(inputs, vec![plan, broken.clone(), json]);
    assert_eq!(report.failure_count(), 1);
    let (failed_path, err) = report.failed().next().expect("one failure");
    assert_eq!(failed_path, broken.as_path());
    assert!(matches!(err, FrontendError::Load { .. }));

    let plan_svg = fs::read_to_string(dir.path().join("plan.svg")).expect("plan.svg");
    assert!(plan_svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg "));
    assert!(plan_svg.contains("Dimension: Living Room | Measurement: 3000"));

    let json_svg = fs::read_to_string(dir.path().join("sample.svg")).expect("sample.svg");
    assert!(json_svg.contains(r#"<path d="M 0 0 L 10 5"/>"#));
    assert!(json_svg.contains("Dimension: Bathroom | Measurement: 1800 | Group Id: patch-A1"));
    assert!(!dir.path().join("broken.svg").exists());
}

#[test]
fn output_directory_and_layers_are_honoured() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("svg");
    fs::create_dir(&out).expect("create output dir");
    let plan = stage(dir.path(), "floorplan.dxf", "plan.dxf");

    let request = BatchRequest {
        inputs: vec![plan],
        output_dir: Some(out.clone()),
        options: ConversionOptions::default().with_layers(LayerSelection::only(["WALLS"])),
        threads: 0,
    };
    let report = run_batch(&request).expect("batch should run");
    assert!(!report.has_failures());

    let converted = report.succeeded().next().expect("one success");
    assert_eq!(converted.output, out.join("plan.svg"));
    assert_eq!(converted.groups, 2);
    assert_eq!(converted.annotated, 2);
    assert_eq!(converted.dimensions, 3);

    let svg = fs::read_to_string(out.join("plan.svg")).expect("plan.svg");
    assert!(svg.contains(r#"<g id="patch-1D""#));
    assert!(svg.contains(r#"<g id="patch-1F""#));
    assert!(!svg.contains(r#"<g id="patch-1A""#));
}

#[test]
fn missing_output_directory_is_a_write_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let plan = stage(dir.path(), "floorplan.dxf", "plan.dxf");

    let request = BatchRequest {
        inputs: vec![plan],
        output_dir: Some(dir.path().join("nowhere")),
        options: ConversionOptions::default(),
        threads: 1,
    };
    let report = run_batch(&request).expect("batch should run");
    let (_, err) = report.failed().next().expect("one failure");
    assert!(matches!(err, FrontendError::Write { .. }));
}

#[test]
fn inputs_sharing_an_output_path_are_not_overwritten() {
    let dir = tempfile::tempdir().expect("create temp dir");
    for sub in ["a", "b", "out"] {
        fs::create_dir(dir.path().join(sub)).expect("create dir");
    }
    let first = stage(dir.path(), "floorplan.dxf", "a/plan.dxf");
    let second = stage(dir.path(), "sample.json", "b/plan.json");
    let out = dir.path().join("out");

    let request = BatchRequest {
        inputs: vec![first.clone(), second.clone()],
        output_dir: Some(out.clone()),
        options: ConversionOptions::default(),
        threads: 2,
    };
    let report = run_batch(&request).expect("batch should run");

    assert_eq!(report.failure_count(), 1);
    let (failed_path, err) = report.failed().next().expect("one failure");
    assert_eq!(failed_path, second.as_path());
    match err {
        FrontendError::OutputConflict { path, first: owner } => {
            assert_eq!(path, &out.join("plan.svg"));
            assert_eq!(owner, &first);
        }
        other => panic!("unexpected error: {other}"),
    }

    let svg = fs::read_to_string(out.join("plan.svg")).expect("plan.svg");
    assert!(svg.contains("Dimension: Living Room | Measurement: 3000"));
    assert_eq!(fs::read_dir(&out).expect("list out").count(), 1);
}

#[test]
fn directories_expand_to_their_dxf_files_in_name_order() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let plans = dir.path().join("plans");
    fs::create_dir_all(plans.join("nested")).expect("create dirs");
    stage(&plans, "floorplan.dxf", "upper.DXF");
    stage(&plans, "floorplan.dxf", "lower.dxf");
    stage(&plans, "sample.json", "notes.json");
    stage(&plans, "floorplan.dxf", "nested/deep.dxf");

    let request = BatchRequest {
        inputs: vec![plans.clone()],
        output_dir: None,
        options: ConversionOptions::default(),
        threads: 1,
    };
    let report = run_batch(&request).expect("batch should run");

    assert!(!report.has_failures());
    let inputs: Vec<_> = report.outcomes.iter().map(|o| o.input.clone()).collect();
    assert_eq!(inputs, vec![plans.join("lower.dxf"), plans.join("upper.DXF")]);
    assert!(plans.join("lower.svg").exists());
    assert!(plans.join("upper.svg").exists());
    assert!(!plans.join("notes.svg").exists());
    assert!(!plans.join("nested/deep.svg").exists());
}
