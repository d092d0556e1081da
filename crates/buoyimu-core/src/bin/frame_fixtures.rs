use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use buoyimu_core::synth::{SyntheticFrame, encode_frames};
use buoyimu_core::{DecodeOptions, FrameLayout, decode_imu_file};

const FRAMES_PER_FILE: usize = 60;

struct FixtureSpec {
    dir: &'static str,
    file_name: &'static str,
    layout: FrameLayout,
    /// Bytes kept from an extra trailing frame, if any.
    tail: Option<usize>,
}

const FIXTURES: &[FixtureSpec] = &[
    FixtureSpec {
        dir: "morro",
        file_name: "buoy.z06.00.20201201.000000.imu.bin",
        layout: FrameLayout::Morro,
        tail: None,
    },
    FixtureSpec {
        dir: "morro_truncated",
        file_name: "buoy.z06.00.20201201.001000.imu.bin",
        layout: FrameLayout::Morro,
        tail: Some(40),
    },
    FixtureSpec {
        dir: "humboldt",
        file_name: "buoy.z05.00.20201201.000000.imu.bin",
        layout: FrameLayout::Humboldt,
        tail: None,
    },
    FixtureSpec {
        dir: "humboldt_truncated",
        file_name: "buoy.z05.00.20201201.001000.imu.bin",
        layout: FrameLayout::Humboldt,
        tail: Some(90),
    },
];

fn main() -> ExitCode {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests").join("golden"));
    if let Err(err) = run(&root) {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run(root: &Path) -> Result<(), String> {
    for spec in FIXTURES {
        let dir = root.join(spec.dir);
        fs::create_dir_all(&dir)
            .map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
        let input = dir.join(spec.file_name);
        fs::write(&input, fixture_bytes(spec))
            .map_err(|err| format!("failed to write {}: {}", input.display(), err))?;
        write_expected(&input, &dir.join("expected_summary.json"))?;
    }
    Ok(())
}

fn fixture_bytes(spec: &FixtureSpec) -> Vec<u8> {
    let count = FRAMES_PER_FILE + usize::from(spec.tail.is_some());
    let frames: Vec<_> = (0..count).map(SyntheticFrame::numbered).collect();
    let mut bytes = encode_frames(spec.layout, &frames);
    if let Some(tail) = spec.tail {
        bytes.truncate(FRAMES_PER_FILE * spec.layout.frame_size() + tail);
    }
    bytes
}

fn write_expected(input: &Path, output: &Path) -> Result<(), String> {
    let report = decode_imu_file(input, &DecodeOptions::default())
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    let expected = serde_json::json!({
        "decode": report.decode,
        "summary": report.summary,
    });
    let json = serde_json::to_string_pretty(&expected)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    fs::write(output, json).map_err(|err| format!("failed to write {}: {}", output.display(), err))
}
