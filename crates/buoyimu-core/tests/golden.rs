use std::fs;
use std::path::{Path, PathBuf};

use buoyimu_core::{
    DecodeInfo, DecodeOptions, FrameLayout, MotionSummary, Termination, decode_imu_file,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ExpectedSummary {
    decode: DecodeInfo,
    summary: MotionSummary,
}

fn golden_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn input_file(dir: &Path) -> PathBuf {
    fs::read_dir(dir)
        .expect("read golden dir")
        .map(|entry| entry.expect("dir entry").path())
        .find(|path| path.extension().is_some_and(|ext| ext == "bin"))
        .expect("golden input .bin")
}

fn load_expected(dir: &str) -> Value {
    let path = golden_dir(dir).join("expected_summary.json");
    let json = fs::read_to_string(&path).expect("read expected_summary.json");
    serde_json::from_str(&json).expect("parse expected summary")
}

fn run_golden(dir: &str) {
    let input = input_file(&golden_dir(dir));
    let expected = load_expected(dir);

    let report = decode_imu_file(&input, &DecodeOptions::default()).expect("decode imu file");
    let actual = serde_json::json!({
        "decode": report.decode,
        "summary": report.summary,
    });

    assert_eq!(actual, expected, "golden mismatch in {dir}");
}

#[test]
fn golden_morro() {
    run_golden("tests/golden/morro");
}

#[test]
fn golden_morro_truncated() {
    run_golden("tests/golden/morro_truncated");
}

#[test]
fn golden_humboldt() {
    run_golden("tests/golden/humboldt");
}

#[test]
fn golden_humboldt_truncated() {
    run_golden("tests/golden/humboldt_truncated");
}

#[test]
fn golden_morro_truncated_pads_after_gyro_x() {
    let expected: ExpectedSummary =
        serde_json::from_value(load_expected("tests/golden/morro_truncated"))
            .expect("typed expected summary");
    assert_eq!(expected.decode.layout, FrameLayout::Morro);
    assert_eq!(
        expected.decode.termination,
        Termination::Truncated { offset: 60 * 82 }
    );
    assert_eq!(expected.decode.padding.gyro, 1);
    assert_eq!(expected.decode.padding.roll, 0);
    assert_eq!(expected.summary.samples, 61);
}

#[test]
fn golden_humboldt_truncated_has_full_last_sample() {
    let expected: ExpectedSummary =
        serde_json::from_value(load_expected("tests/golden/humboldt_truncated"))
            .expect("typed expected summary");
    assert_eq!(expected.decode.layout, FrameLayout::Humboldt);
    assert_eq!(expected.decode.frames_complete, 60);
    assert_eq!(expected.decode.padding.total(), 0);
    assert_eq!(expected.summary.samples, 61);
}

#[test]
fn golden_inputs_match_generator() {
    use buoyimu_core::synth::{SyntheticFrame, encode_frames};

    let input = input_file(&golden_dir("tests/golden/humboldt"));
    let frames: Vec<_> = (0..60).map(SyntheticFrame::numbered).collect();
    let bytes = fs::read(input).expect("read golden input");
    assert_eq!(bytes, encode_frames(FrameLayout::Humboldt, &frames));
}
