// Copyright (c) 2024 Mike Tsao

use voxcurve::{
    converter::interpolate_lines,
    interpolate_in_place, interpolate_to_named_output,
    prelude::*,
    util::CurveSettingsBuilder,
};

const CURVE: &str = "001,01,00\t0.000000\tA\tB\n001,02,00\t1.000000\tC\tD\n";

#[test]
fn in_place_rewrites_the_curve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lasers.txt");
    std::fs::write(&path, CURVE).unwrap();

    let settings = CurveSettings::in_place(
        Interpolation::Eased(Easing::Sharp),
        TimeSignature::COMMON_TIME,
    );
    interpolate_in_place(&path, &settings).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 17);
    assert_eq!(rows[0], "001,01,00\t0.000000\tA\tB");
    assert_eq!(rows[8], "001,01,24\t0.500000\t0\tB");
    assert_eq!(rows[16], "001,02,00\t1.000000\tC\tD");
}

#[test]
fn named_output_leaves_the_input_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lasers.txt");
    let curve = "001,01,00\t0.0\t1\n001,02,00\t0.5\t2\n001,03,00\t0.0\t3\n";
    std::fs::write(&path, curve).unwrap();

    let output = interpolate_to_named_output(&path, &CurveSettings::ksh(TimeSignature::COMMON_TIME))
        .unwrap();
    assert_eq!(output, dir.path().join("kshcurve.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), curve);

    // 96 ticks split into 8-tick steps.
    let text = std::fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0], "001,01,00\t0.000000\t1");
    assert_eq!(rows[1].split('\t').nth(2), Some("2"));
    assert_eq!(rows[6], "001,02,00\t0.500000\t2");
    assert_eq!(rows[12], "001,03,00\t0.000000\t3");
}

#[test]
fn named_output_refuses_to_overwrite_its_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kshcurve.txt");
    std::fs::write(&path, CURVE).unwrap();
    assert!(interpolate_to_named_output(&path, &CurveSettings::ksh(TimeSignature::COMMON_TIME))
        .is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), CURVE);
}

#[test]
fn failed_runs_leave_the_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lasers.txt");
    let curve = "001,01,00\t0.0\n001,02,00\t1.0\n";
    std::fs::write(&path, curve).unwrap();

    // Two points aren't enough for a spline.
    let settings = CurveSettings::in_place(Interpolation::CubicSpline, TimeSignature::COMMON_TIME);
    let e = interpolate_in_place(&path, &settings).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<CurveError>(),
        Some(CurveError::InsufficientPoints {
            required: 3,
            actual: 2,
            ..
        })
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), curve);
}

#[test]
fn bad_settings_fail_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.txt");
    let settings = CurveSettingsBuilder::default()
        .base_ticks_per_quarter(5_usize)
        .time_signature(TimeSignature::new_with(3, 8).unwrap())
        .build()
        .unwrap();
    let e = interpolate_in_place(&missing, &settings).unwrap_err();
    assert!(matches!(
        e.downcast_ref::<CurveError>(),
        Some(CurveError::UnknownMode {
            what: "time signature",
            ..
        })
    ));
    assert!("spline".parse::<Interpolation>().is_err());
}

#[test]
fn every_mode_keeps_the_endpoints() {
    let lines = ["001,01,00\t0.2\tx", "001,02,00\t0.4\ty", "001,03,00\t0.9\tz"];
    for mode in Interpolation::all().filter(|m| *m != Interpolation::CubicHermite) {
        let settings = CurveSettingsBuilder::default()
            .mode(mode)
            .aux_policy(AuxPolicy::Positional)
            .build()
            .unwrap();
        let rows = interpolate_lines(lines, &settings).unwrap();
        let first = rows.first().unwrap();
        let last = rows.last().unwrap();
        assert_eq!(first, "001,01,00\t0.200000\tx\n", "{mode}");
        assert_eq!(last, "001,03,00\t0.900000\tz\n", "{mode}");
    }
}

#[test]
fn full_width_laser_rows_survive_every_converter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lasers.txt");
    let curve = "001,01,00\t0.000000\t1\t0\t0\t2\t0\t0\t7\tend\n\
                 001,02,00\t0.500000\t0\t0\t0\t2\t0\t0\t8\tend\n\
                 001,03,00\t1.000000\t2\t0\t0\t2\t0\t0\t9\tend\n";
    std::fs::write(&path, curve).unwrap();

    let output = interpolate_to_named_output(&path, &CurveSettings::ksh(TimeSignature::COMMON_TIME))
        .unwrap();
    let text = std::fs::read_to_string(output).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0], "001,01,00\t0.000000\t1\t0\t0\t2\t0\t0\t7\tend");
    assert_eq!(rows[6], "001,02,00\t0.500000\t0\t0\t0\t2\t0\t0\t8\tend");
    assert_eq!(rows[12], "001,03,00\t1.000000\t2\t0\t0\t2\t0\t0\t9\tend");

    let settings = CurveSettings::in_place(
        Interpolation::Eased(Easing::EaseInSine),
        TimeSignature::COMMON_TIME,
    );
    interpolate_in_place(&path, &settings).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 33);
    assert!(rows[0].ends_with("\t1\t0\t0\t2\t0\t0\t7\tend"));
    assert!(rows[1..32]
        .iter()
        .all(|row| row.ends_with("\t0\t0\t0\t2\t0\t0\t7\tend")));
    assert!(rows[32].ends_with("\t2\t0\t0\t2\t0\t0\t9\tend"));
}
