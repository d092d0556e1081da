use std::fs;

use buoyimu_core::synth::{SyntheticFrame, encode_frames};
use buoyimu_core::{
    DecodeOptions, FILL_VALUE, FrameLayout, Termination, decode_bytes, decode_imu_file,
};
use time::macros::datetime;

fn frames(count: usize) -> Vec<SyntheticFrame> {
    (0..count).map(SyntheticFrame::numbered).collect()
}

#[test]
fn exact_multiple_consumes_whole_file() {
    let bytes = encode_frames(FrameLayout::Morro, &frames(12));
    let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();

    assert_eq!(output.layout, FrameLayout::Morro);
    assert_eq!(output.termination, Termination::Clean);
    assert_eq!(
        output.dataset.len(),
        bytes.len() / FrameLayout::Morro.frame_size()
    );
    assert_eq!(output.padding.total(), 0);
}

#[test]
fn short_tail_before_gps_keeps_frame_count() {
    let frame_size = FrameLayout::Morro.frame_size();
    for extra in [1, 4, 10, 17] {
        let mut bytes = encode_frames(FrameLayout::Morro, &frames(6));
        bytes.truncate(5 * frame_size + extra);

        let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(output.dataset.len(), 5, "extra={extra}");
        assert_eq!(output.frames_complete, 5);
        assert_eq!(
            output.termination,
            Termination::Truncated {
                offset: 5 * frame_size
            }
        );
        assert_eq!(output.padding.total(), 0);
    }
}

#[test]
fn tail_past_gps_pads_later_channels() {
    let frame_size = FrameLayout::Morro.frame_size();
    let mut bytes = encode_frames(FrameLayout::Morro, &frames(6));
    // header, gps_time, rpy, then half of the gyro record
    bytes.truncate(5 * frame_size + 4 + 14 + 14 + 6);

    let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
    let dataset = &output.dataset;
    assert_eq!(dataset.len(), 6);
    let last = SyntheticFrame::numbered(5);
    assert_eq!(dataset.gyro[5], [last.gyro[0], FILL_VALUE, FILL_VALUE]);
    assert_eq!(dataset.roll[5], last.roll);
    assert_eq!(dataset.accel[5], [FILL_VALUE; 3]);
    assert_eq!(dataset.mag[5], [FILL_VALUE; 3]);
    assert_eq!(dataset.pres[5], FILL_VALUE);
    assert_eq!(dataset.pres[4], SyntheticFrame::numbered(4).pres);
    assert_eq!(output.padding.gyro, 1);
    assert_eq!(output.padding.pres, 1);
    assert_eq!(output.padding.roll, 0);
}

#[test]
fn humboldt_only_input_falls_back_with_correct_counts() {
    let bytes = encode_frames(FrameLayout::Humboldt, &frames(9));
    let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();

    assert_eq!(output.layout, FrameLayout::Humboldt);
    assert_eq!(output.frames_complete, 9);
    assert_eq!(output.dataset.len(), 9);
    assert_eq!(output.dataset.mag.len(), 9);
    assert_eq!(output.padding.total(), 0);
}

#[test]
fn five_known_frames_round_trip() {
    for layout in FrameLayout::CANDIDATES {
        let known = frames(5);
        let bytes = encode_frames(layout, &known);
        let dataset = decode_bytes(&bytes, &DecodeOptions::default())
            .unwrap()
            .dataset;

        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.time[0], datetime!(1980-01-06 0:00 UTC));
        assert_eq!(dataset.time[4], datetime!(1980-01-06 0:00:04 UTC));
        for (i, frame) in known.iter().enumerate() {
            assert_eq!(dataset.roll[i], frame.roll);
            assert_eq!(dataset.pitch[i], frame.pitch);
            assert_eq!(dataset.yaw[i], frame.yaw);
            assert_eq!(dataset.pres[i], frame.pres);
            assert_eq!(dataset.gyro[i], frame.gyro);
            assert_eq!(dataset.accel[i], frame.accel);
            assert_eq!(dataset.mag[i], frame.mag);
        }
    }
}

#[test]
fn week_number_advances_time_by_weeks() {
    let mut frame = SyntheticFrame::numbered(0);
    frame.week_number = 2139;
    frame.tow = 18.0 + 86_400.0;
    let bytes = encode_frames(FrameLayout::Morro, &[frame]);
    let dataset = decode_bytes(&bytes, &DecodeOptions::default())
        .unwrap()
        .dataset;
    assert_eq!(dataset.time[0], datetime!(2021-01-04 0:00 UTC));
}

#[test]
fn decoding_twice_is_identical() {
    let mut bytes = encode_frames(FrameLayout::Humboldt, &frames(8));
    bytes.truncate(bytes.len() - 30);

    let first = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
    let second = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first.dataset).unwrap();
    let second_json = serde_json::to_string(&second.dataset).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn fill_value_serializes_verbatim() {
    let frame_size = FrameLayout::Morro.frame_size();
    let mut bytes = encode_frames(FrameLayout::Morro, &frames(5));
    // the fifth frame stops right before the pressure value
    bytes.truncate(4 * frame_size + frame_size - 2 - 4);

    let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(output.dataset.len(), 5);
    assert_eq!(output.dataset.pres[4], -9999.0);

    let value = serde_json::to_value(&output.dataset).unwrap();
    assert_eq!(value["pres"][4], -9999.0);
    assert_eq!(value["time"][4], "1980-01-06T00:00:04Z");
}

#[test]
fn decode_file_builds_report() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("buoy.z05.00.20201201.000000.imu.bin");
    fs::write(&path, encode_frames(FrameLayout::Humboldt, &frames(4))).unwrap();

    let report = decode_imu_file(&path, &DecodeOptions::default()).unwrap();
    assert_eq!(report.input.bytes, 4 * 96);
    assert_eq!(
        report.input.file_name.as_ref().map(|n| n.station.as_str()),
        Some("z05")
    );
    let decode = report.decode.as_ref().unwrap();
    assert_eq!(decode.layout, FrameLayout::Humboldt);
    assert_eq!(decode.frame_size, 96);
    assert_eq!(decode.leap_seconds, 18);
    assert_eq!(report.summary.samples, 4);
    assert_eq!(report.summary.roll_mean, Some(2.5));
    assert_eq!(
        report.summary.time_end.as_deref(),
        Some("1980-01-06T00:00:03Z")
    );
    assert_eq!(report.dataset.as_ref().map(|d| d.len()), Some(4));
}

#[test]
fn corrupt_header_mid_file_keeps_every_sample() {
    let frame_size = FrameLayout::Morro.frame_size();
    let mut bytes = encode_frames(FrameLayout::Morro, &frames(3));
    bytes[frame_size] = 0x00;

    let output = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();
    assert_eq!(output.dataset.len(), 3);
    assert_eq!(output.termination, Termination::Clean);
    assert_eq!(output.header_warnings, 1);
    assert_eq!(output.padding.total(), 0);
    assert_eq!(output.dataset.roll[2], SyntheticFrame::numbered(2).roll);
}

#[test]
fn forced_primary_decodes_frames_without_header_bytes() {
    let mut bytes = encode_frames(FrameLayout::Morro, &frames(5));
    for frame in bytes.chunks_mut(FrameLayout::Morro.frame_size()) {
        frame[..4].fill(0);
    }
    let options = DecodeOptions {
        layout: Some(FrameLayout::Morro),
        ..DecodeOptions::default()
    };

    let output = decode_bytes(&bytes, &options).unwrap();
    assert_eq!(output.dataset.len(), bytes.len() / FrameLayout::Morro.frame_size());
    assert_eq!(output.termination, Termination::Clean);
}

#[test]
fn decode_file_rejects_input_shorter_than_a_frame() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("noise.bin");
    fs::write(&path, vec![0x42u8; 60]).unwrap();

    let err = decode_imu_file(&path, &DecodeOptions::default()).unwrap_err();
    assert!(err.to_string().contains("no frame layout matches"));
}
