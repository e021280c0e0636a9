use std::time::Duration;
use tidal_astro::{Astro, JulianDate};
use tidal_core::constants::DEG_TO_RAD;
use tidal_harmonics::{
    resolve, Datum, Error, HarmonicConstituent, Harmonics, PointKind, TidePredOffsets, Units,
};

fn constituent(name: &str, amplitude: f64, phase_utc: f64) -> HarmonicConstituent {
    HarmonicConstituent {
        name: name.to_string(),
        model: resolve(name).unwrap(),
        amplitude,
        phase_utc,
        phase_local: 0.0,
        speed: 0.0,
    }
}

fn reference_station() -> Harmonics {
    Harmonics {
        constituents: vec![
            constituent("M2", 1.00, 0.0),
            constituent("S2", 0.30, 45.0),
            constituent("K1", 0.20, 120.0),
            constituent("O1", 0.15, 200.0),
        ],
        datums: vec![
            Datum {
                name: "MTL".to_string(),
                value: 1.30,
            },
            Datum {
                name: "MLLW".to_string(),
                value: 0.45,
            },
        ],
        offsets: None,
    }
}

fn subordinate_station() -> Harmonics {
    let mut harmonics = reference_station();
    harmonics.offsets = Some(TidePredOffsets {
        ref_station_id: String::new(),
        height_offset_high_tide: 1.1,
        height_offset_low_tide: 0.9,
        time_offset_high_tide: -12.0,
        time_offset_low_tide: -18.0,
    });
    harmonics
}

fn start() -> JulianDate {
    JulianDate::from_calendar(2023, 4, 10, 0, 0, 0.0)
}

// --- dense synthesis ---

#[test]
fn dense_prediction_starts_at_window_start() {
    let harmonics = reference_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(6.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    // 36 samples over [start, start+6h), plus any spliced extrema
    assert!(points.len() >= 36);
    assert!(points[0].time.hours_since(&start()).abs() < 1e-6);
    for pair in points.windows(2) {
        let gap = pair[1].time.hours_since(&pair[0].time);
        assert!(gap >= 0.0 && gap <= 1.0 / 6.0 + 1e-9);
    }
}

#[test]
fn dense_prediction_is_continuous() {
    let harmonics = reference_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    // |dL/dt| is bounded by sum of sigma*H*f; f stays below 1.3 for these
    // constituents. Spliced extrema are skipped: their levels come from the
    // partition-midpoint factors, not the per-sample ones.
    let astro = Astro::new(start());
    let max_rate: f64 = harmonics
        .constituents
        .iter()
        .map(|c| DEG_TO_RAD * c.model.speed(&astro) * c.amplitude * 1.3)
        .sum();

    let samples: Vec<_> = points
        .iter()
        .filter(|p| p.kind == PointKind::Intermediate)
        .collect();
    for pair in samples.windows(2) {
        let dt = pair[1].time.hours_since(&pair[0].time);
        let dl = (pair[1].level - pair[0].level).abs();
        assert!(
            dl <= max_rate * dt * 1.01 + 1e-12,
            "jump of {dl} over {dt} h exceeds rate bound {max_rate}"
        );
    }
}

#[test]
fn dense_prediction_includes_spliced_extrema() {
    let harmonics = reference_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    let extrema: Vec<_> = points.iter().filter(|p| p.kind.is_extremum()).collect();
    assert!(
        extrema.len() >= 3,
        "expected at least 3 extrema inside a day, found {}",
        extrema.len()
    );
}

#[test]
fn extrema_are_local_extremes_of_the_dense_curve() {
    let harmonics = reference_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    for (i, p) in points.iter().enumerate() {
        if i == 0 || i + 1 == points.len() {
            continue;
        }
        // node factors differ slightly between the dense pass and the
        // extremum pass, so the comparison carries a small slack
        match p.kind {
            PointKind::High => {
                assert!(p.level >= points[i - 1].level - 0.02);
                assert!(p.level >= points[i + 1].level - 0.02);
            }
            PointKind::Low => {
                assert!(p.level <= points[i - 1].level + 0.02);
                assert!(p.level <= points[i + 1].level + 0.02);
            }
            PointKind::Intermediate => {}
        }
    }
}

// --- extrema sequence ---

#[test]
fn extrema_alternate_high_low() {
    let harmonics = reference_station();
    let extrema = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .predict_extrema()
        .unwrap();

    // a semidiurnal station sees 3-5 extrema per day
    assert!((3..=5).contains(&extrema.len()), "got {}", extrema.len());
    for pair in extrema.windows(2) {
        assert_ne!(pair[0].kind, pair[1].kind, "extrema must alternate");
        let gap = pair[1].time.hours_since(&pair[0].time);
        assert!(gap > 3.0, "extrema {gap} h apart");
    }
    for e in &extrema {
        let offset = e.time.hours_since(&start());
        assert!((0.0..24.0).contains(&offset));
    }
}

#[test]
fn highs_and_lows_partition_the_extrema() {
    let harmonics = reference_station();
    let prediction = harmonics.range_prediction(start(), start().add_hours(24.0));
    let all = prediction.predict_extrema().unwrap();
    let highs = prediction.predict_highs().unwrap();
    let lows = prediction.predict_lows().unwrap();

    assert_eq!(all.len(), highs.len() + lows.len());
    assert!(highs.iter().all(|p| p.kind == PointKind::High));
    assert!(lows.iter().all(|p| p.kind == PointKind::Low));
}

// --- neighbor linking ---

#[test]
fn intermediates_link_to_bracketing_extrema() {
    let harmonics = reference_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    let mut linked = 0;
    for p in &points {
        if p.kind.is_extremum() {
            continue;
        }
        if let (Some(prev), Some(next)) = (p.prev_extremum, p.next_extremum) {
            linked += 1;
            assert!(points[prev].kind.is_extremum());
            assert!(points[next].kind.is_extremum());
            assert!(points[prev].time.hours_since(&p.time) <= 0.0);
            assert!(points[next].time.hours_since(&p.time) >= 0.0);
        }
    }
    assert!(linked > 0, "no intermediate carried both extremum links");
}

// --- datum and units ---

#[test]
fn datum_conversion_is_a_constant_shift() {
    let harmonics = reference_station();
    let window = (start(), start().add_hours(3.0));
    let mtl = harmonics
        .range_prediction(window.0, window.1)
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();
    let mllw = harmonics
        .range_prediction(window.0, window.1)
        .interval(Duration::from_secs(600))
        .datum("MLLW")
        .predict()
        .unwrap();

    assert_eq!(mtl.len(), mllw.len());
    let shift = 1.30 - 0.45;
    for (a, b) in mtl.iter().zip(&mllw) {
        assert!((b.level - (a.level + shift)).abs() < 1e-9);
    }
}

#[test]
fn unknown_datum_fails_the_run() {
    let harmonics = reference_station();
    let err = harmonics
        .range_prediction(start(), start().add_hours(3.0))
        .datum("NAVD88")
        .predict()
        .unwrap_err();
    assert!(matches!(err, Error::UnknownDatum(name) if name == "NAVD88"));
}

#[test]
fn feet_scale_meters() {
    let harmonics = reference_station();
    let window = (start(), start().add_hours(3.0));
    let meters = harmonics
        .range_prediction(window.0, window.1)
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();
    let feet = harmonics
        .range_prediction(window.0, window.1)
        .interval(Duration::from_secs(600))
        .units(Units::Feet)
        .predict()
        .unwrap();

    assert_eq!(meters.len(), feet.len());
    for (m, f) in meters.iter().zip(&feet) {
        assert!((f.level - m.level * 3.28084).abs() < 1e-9);
    }
}

// --- subordinate stations ---

#[test]
fn subordinate_extrema_shift_and_scale() {
    let harmonics = subordinate_station();
    let extrema = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .predict_extrema()
        .unwrap();

    assert!(!extrema.is_empty());
    for e in &extrema {
        let (time_offset_minutes, height_mult) = match e.kind {
            PointKind::High => (-12.0, 1.1),
            PointKind::Low => (-18.0, 0.9),
            PointKind::Intermediate => panic!("extrema output holds an intermediate"),
        };
        let shift = e.time.hours_since(&e.uncorrected_time) * 60.0;
        assert!(
            (shift - time_offset_minutes).abs() < 1e-6,
            "time shifted by {shift} min"
        );
        assert!((e.level - e.uncorrected_level * height_mult).abs() < 1e-9);
    }
}

#[test]
fn subordinate_matches_reference_before_correction() {
    let reference = reference_station();
    let subordinate = subordinate_station();

    // the reference window is padded past the subordinate's: offsets shift
    // corrected times earlier, so uncorrected anchors can sit past hour 20
    let ref_extrema = reference
        .range_prediction(start(), start().add_hours(21.0))
        .predict_extrema()
        .unwrap();
    let sub_extrema = subordinate
        .range_prediction(start(), start().add_hours(20.0))
        .predict_extrema()
        .unwrap();

    // corrected times move the window edges, so compare the overlap
    for sub in &sub_extrema {
        let matched = ref_extrema.iter().any(|r| {
            r.kind == sub.kind && r.time.hours_since(&sub.uncorrected_time).abs() < 1e-6
        });
        assert!(matched, "no reference extremum matches {:?}", sub.kind);
    }
}

#[test]
fn subordinate_intermediates_stay_ordered() {
    let harmonics = subordinate_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    for pair in points.windows(2) {
        assert!(pair[1].time.hours_since(&pair[0].time) > -1e-9);
    }
}

#[test]
fn subordinate_intermediates_interpolate_between_corrected_extrema() {
    let harmonics = subordinate_station();
    let points = harmonics
        .range_prediction(start(), start().add_hours(24.0))
        .interval(Duration::from_secs(600))
        .predict()
        .unwrap();

    for p in &points {
        if p.kind.is_extremum() {
            continue;
        }
        let (Some(prev), Some(next)) = (p.prev_extremum, p.next_extremum) else {
            continue;
        };
        let lo = points[prev].level.min(points[next].level);
        let hi = points[prev].level.max(points[next].level);
        assert!(
            p.level >= lo - 0.05 && p.level <= hi + 0.05,
            "interpolated level {} outside [{lo}, {hi}]",
            p.level
        );
    }
}

#[test]
fn point_prediction_has_half_open_window() {
    // a single-instant request still runs the full pipeline; the half-open
    // [start, start) window just keeps no points
    let harmonics = reference_station();
    let points = harmonics.time_prediction(start()).predict().unwrap();
    assert!(points.is_empty());
}

// --- degenerate stations ---

#[test]
fn station_without_constituents_cannot_bracket() {
    let harmonics = Harmonics::default();
    let err = harmonics
        .range_prediction(start(), start().add_hours(6.0))
        .predict()
        .unwrap_err();
    assert!(matches!(err, Error::EmptyPrediction));
}

#[test]
fn constant_level_station_cannot_bracket() {
    let harmonics = Harmonics {
        constituents: vec![constituent("Z0", 0.5, 0.0)],
        datums: Vec::new(),
        offsets: None,
    };
    let err = harmonics
        .range_prediction(start(), start().add_hours(6.0))
        .predict()
        .unwrap_err();
    assert!(matches!(err, Error::EmptyPrediction));
}
