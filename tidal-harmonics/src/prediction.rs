//! The tide prediction engine.
//!
//! A [`Prediction`] synthesizes water levels over a requested window from a
//! station's harmonic constituents:
//!
//! 1. The window is padded by 24 hours on both sides so the extrema nearest
//!    the endpoints are always found.
//! 2. Levels are synthesized densely at the requested interval. Speeds and
//!    equilibrium arguments are fixed at the padded start; node and form
//!    factors are re-sampled at every step because they drift with the lunar
//!    node.
//! 3. Extrema are located by walking the padded window in partitions,
//!    bracketing sign changes of the analytic first derivative, and refining
//!    each bracket with Newton-Raphson. Refined extrema are spliced into the
//!    flat result vector and classified by the sign of the second derivative.
//! 4. The result is trimmed to the closed interval between the extremum
//!    preceding the window and the one following it, and every intermediate
//!    point is linked by index to its neighboring extrema.
//! 5. Datum and unit conversion apply after classification, so typing
//!    depends only on the shape of the curve.
//! 6. For subordinate stations, extrema are shifted and scaled by the
//!    station offsets, and intermediate points are re-interpolated between
//!    the corrected extrema so the curve keeps its shape.
//!
//! The raw synthesis is relative to Mean Tide Level; any other datum is an
//! additive shift through the station's datum table.

use crate::error::{Error, Result};
use crate::harmonics::{HarmonicConstituent, Harmonics};
use std::str::FromStr;
use std::time::Duration;
use tidal_astro::{Astro, JulianDate};
use tidal_core::constants::{DEG_TO_RAD, METERS_TO_FEET};
use tidal_core::wrap_0_360;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// The datum of the raw synthesis.
const PREDICTION_DATUM: &str = "MTL";

/// Padding on each side of the requested window, hours.
const WINDOW_PAD_HOURS: f64 = 24.0;

/// Node and form factors are treated as constant across one partition of the
/// extremum search.
const PARTITION_HOURS: f64 = 2400.0;

const NEWTON_TOLERANCE: f64 = 1e-6;
const NEWTON_MAX_ITERATIONS: u32 = 100;

/// Slack for float comparison of sample times, hours (3.6 microseconds).
const TIME_EPSILON: f64 = 1e-9;

/// Output units for levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Meters,
    Feet,
}

impl Units {
    pub fn suffix(&self) -> &'static str {
        match self {
            Units::Meters => "m",
            Units::Feet => "ft",
        }
    }
}

impl FromStr for Units {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "m" => Ok(Units::Meters),
            "ft" => Ok(Units::Feet),
            other => Err(Error::Parse(format!("unknown units: {other}"))),
        }
    }
}

/// Classification of a prediction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Intermediate,
    High,
    Low,
}

impl PointKind {
    /// The single-letter code used in tabular output.
    pub fn code(&self) -> &'static str {
        match self {
            PointKind::Intermediate => "I",
            PointKind::High => "H",
            PointKind::Low => "L",
        }
    }

    pub fn is_extremum(&self) -> bool {
        !matches!(self, PointKind::Intermediate)
    }
}

/// One synthesized point. For subordinate stations `uncorrected_time` and
/// `uncorrected_level` hold the values before the station offsets were
/// applied; for reference stations they equal `time` and `level`.
///
/// `prev_extremum` and `next_extremum` are indices into the vector the point
/// was returned in; they are `None` for extrema themselves and for points
/// whose neighboring extremum fell outside the returned window.
#[derive(Debug, Clone, Copy)]
pub struct PredictionPoint {
    pub time: JulianDate,
    pub level: f64,
    pub kind: PointKind,
    pub uncorrected_time: JulianDate,
    pub uncorrected_level: f64,
    pub prev_extremum: Option<usize>,
    pub next_extremum: Option<usize>,
}

/// A configured prediction run over one station's harmonics. Construction
/// is cheap; all computation happens in [`predict`](Self::predict) and the
/// extrema variants, each of which owns its own working buffer, so one
/// `Harmonics` can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct Prediction<'a> {
    harmonics: &'a Harmonics,
    start: JulianDate,
    end: JulianDate,
    interval: Duration,
    datum: String,
    units: Units,
}

impl<'a> Prediction<'a> {
    pub(crate) fn new(harmonics: &'a Harmonics, start: JulianDate, end: JulianDate) -> Self {
        Self {
            harmonics,
            start,
            end,
            interval: DEFAULT_INTERVAL,
            datum: PREDICTION_DATUM.to_string(),
            units: Units::Meters,
        }
    }

    /// Sample spacing for the dense synthesis. A zero duration falls back to
    /// the one-minute default.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };
        self
    }

    /// Vertical datum of the output; must exist in the station's datum table
    /// unless it is MTL.
    pub fn datum(mut self, datum: impl Into<String>) -> Self {
        self.datum = datum.into();
        self
    }

    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Dense water levels over `[start, end)`, including any refined extrema
    /// that fall inside the window.
    pub fn predict(&self) -> Result<Vec<PredictionPoint>> {
        let raw = self.run()?;
        Ok(self.filter_window(&raw, |_| true))
    }

    /// The high/low sequence over `[start, end)`.
    pub fn predict_extrema(&self) -> Result<Vec<PredictionPoint>> {
        let raw = self.run()?;
        Ok(self.filter_window(&raw, |p| p.kind.is_extremum()))
    }

    /// Highs only.
    pub fn predict_highs(&self) -> Result<Vec<PredictionPoint>> {
        let raw = self.run()?;
        Ok(self.filter_window(&raw, |p| p.kind == PointKind::High))
    }

    /// Lows only.
    pub fn predict_lows(&self) -> Result<Vec<PredictionPoint>> {
        let raw = self.run()?;
        Ok(self.filter_window(&raw, |p| p.kind == PointKind::Low))
    }

    fn extended_start(&self) -> JulianDate {
        self.start.add_hours(-WINDOW_PAD_HOURS)
    }

    /// Runs the full pipeline. Point hours are relative to the padded start.
    fn run(&self) -> Result<Vec<RawPoint>> {
        let constituents = &self.harmonics.constituents;
        let extended_start = self.extended_start();
        let span = self.end.hours_since(&self.start);
        let total_hours = span + 2.0 * WINDOW_PAD_HOURS;
        let interval_hours = self.interval.as_secs_f64() / 3600.0;

        // dense synthesis against the padded start
        let base = base_states(constituents, extended_start);
        let mut points = Vec::new();
        let mut i = 0u64;
        loop {
            let hour = i as f64 * interval_hours;
            if hour >= total_hours {
                break;
            }
            let factors = factors_at(constituents, extended_start.add_hours(hour));
            points.push(RawPoint::intermediate(
                hour,
                level_at(&base, &factors, hour),
            ));
            i += 1;
        }

        // refined extrema, spliced into the sample vector
        points.extend(self.locate_extrema(total_hours));
        points.sort_by(|a, b| a.hour.total_cmp(&b.hour));

        self.trim_and_link(&mut points)?;
        self.convert_levels(&mut points)?;
        if self.harmonics.offsets.is_some() {
            self.apply_offsets(&mut points);
        }

        Ok(points)
    }

    /// Walks the padded window in partitions, bracketing sign changes of the
    /// first derivative and refining each with Newton-Raphson. Node and form
    /// factors are sampled once per partition, at its midpoint; speeds and
    /// equilibrium arguments at its start.
    fn locate_extrema(&self, total_hours: f64) -> Vec<RawPoint> {
        let constituents = &self.harmonics.constituents;
        let extended_start = self.extended_start();

        let Some(delta) = self.bracket_step(extended_start) else {
            return Vec::new();
        };

        let mut extrema: Vec<RawPoint> = Vec::new();
        let mut partition_start = 0.0;
        while partition_start < total_hours {
            let partition_epoch = extended_start.add_hours(partition_start);
            let base = base_states(constituents, partition_epoch);
            let factors = factors_at(
                constituents,
                partition_epoch.add_hours(PARTITION_HOURS * 0.5),
            );

            let slope = |t: f64| slope_at(&base, &factors, t);
            let curvature = |t: f64| curvature_at(&base, &factors, t);

            let bracket_count =
                ((PARTITION_HOURS + WINDOW_PAD_HOURS) / delta).ceil() as u64 + 1;
            for k in 0..bracket_count {
                let a = k as f64 * delta - WINDOW_PAD_HOURS;
                let b = a + delta;
                if partition_start + a > total_hours {
                    break;
                }
                if slope(a) * slope(b) >= 0.0 {
                    continue;
                }
                let midpoint = 0.5 * (a + b);
                // on divergence the coarse bracket midpoint stands in
                let root = newton_raphson(&slope, &curvature, midpoint).unwrap_or(midpoint);
                if root <= 0.0 || root > PARTITION_HOURS {
                    continue;
                }
                let kind = if curvature(root) < 0.0 {
                    PointKind::High
                } else {
                    PointKind::Low
                };
                let mut point =
                    RawPoint::intermediate(partition_start + root, level_at(&base, &factors, root));
                point.kind = kind;
                extrema.push(point);
            }

            partition_start += PARTITION_HOURS;
        }

        extrema.sort_by(|a, b| a.hour.total_cmp(&b.hour));
        extrema.dedup_by(|a, b| (a.hour - b.hour).abs() < 1e-6);
        extrema
    }

    /// Minimum expected spacing between extrema: a quarter period of the
    /// fastest constituent.
    fn bracket_step(&self, epoch: JulianDate) -> Option<f64> {
        let astro = Astro::new(epoch);
        self.harmonics
            .constituents
            .iter()
            .map(|c| c.model.speed(&astro))
            .filter(|&speed| speed > 0.0)
            .map(|speed| 90.0 / speed)
            .min_by(f64::total_cmp)
    }

    /// Trims to the closed interval between the extremum preceding the
    /// request and the one following it, then links every point to its
    /// neighboring extrema by index.
    fn trim_and_link(&self, points: &mut Vec<RawPoint>) -> Result<()> {
        let start_hour = WINDOW_PAD_HOURS;
        let end_hour = WINDOW_PAD_HOURS + self.end.hours_since(&self.start);

        let prior = points
            .iter()
            .filter(|p| p.kind.is_extremum() && p.hour <= start_hour)
            .map(|p| p.hour)
            .last()
            .ok_or(Error::EmptyPrediction)?;
        let next = points
            .iter()
            .filter(|p| p.kind.is_extremum() && p.hour > end_hour)
            .map(|p| p.hour)
            .next()
            .ok_or(Error::EmptyPrediction)?;

        points.retain(|p| p.hour >= prior && p.hour <= next);

        let mut last_extremum = None;
        for i in 0..points.len() {
            if points[i].kind.is_extremum() {
                last_extremum = Some(i);
            } else {
                points[i].prev = last_extremum;
            }
        }
        let mut next_extremum = None;
        for i in (0..points.len()).rev() {
            if points[i].kind.is_extremum() {
                next_extremum = Some(i);
            } else {
                points[i].next = next_extremum;
            }
        }

        Ok(())
    }

    /// Datum shift away from MTL, then unit conversion. Runs after
    /// classification so typing depends only on the shape of the curve.
    fn convert_levels(&self, points: &mut [RawPoint]) -> Result<()> {
        let shift = if self.datum.eq_ignore_ascii_case(PREDICTION_DATUM) {
            0.0
        } else {
            self.harmonics
                .convert_datum(PREDICTION_DATUM, &self.datum, 0.0)?
        };
        let scale = match self.units {
            Units::Meters => 1.0,
            Units::Feet => METERS_TO_FEET,
        };
        for p in points.iter_mut() {
            p.level = (p.level + shift) * scale;
            p.unc_level = p.level;
            p.unc_hour = p.hour;
        }
        Ok(())
    }

    /// Subordinate-station pass: extrema move by the station's time offsets
    /// and scale by its height multipliers; intermediate points keep their
    /// proportional position between the corrected extrema.
    fn apply_offsets(&self, points: &mut [RawPoint]) {
        let Some(offsets) = &self.harmonics.offsets else {
            return;
        };

        for p in points.iter_mut() {
            match p.kind {
                PointKind::High => {
                    p.hour += offsets.time_offset_high_tide / 60.0;
                    p.level *= offsets.height_offset_high_tide;
                }
                PointKind::Low => {
                    p.hour += offsets.time_offset_low_tide / 60.0;
                    p.level *= offsets.height_offset_low_tide;
                }
                PointKind::Intermediate => {}
            }
        }

        for i in 0..points.len() {
            if points[i].kind.is_extremum() {
                continue;
            }
            let (Some(prev_idx), Some(next_idx)) = (points[i].prev, points[i].next) else {
                continue;
            };
            let prev = points[prev_idx];
            let next = points[next_idx];

            let unc_time_span = next.unc_hour - prev.unc_hour;
            let unc_level_span = next.unc_level - prev.unc_level;
            if unc_time_span == 0.0 || unc_level_span == 0.0 {
                continue;
            }

            let alpha = (points[i].unc_hour - prev.unc_hour) / unc_time_span;
            let beta = (points[i].unc_level - prev.unc_level) / unc_level_span;
            points[i].hour = prev.hour + alpha * (next.hour - prev.hour);
            points[i].level = prev.level + beta * (next.level - prev.level);
        }
    }

    /// Restricts to `[start, end)` and rebuilds extremum indices against the
    /// filtered vector; links to extrema outside the window become `None`.
    fn filter_window(
        &self,
        points: &[RawPoint],
        keep: impl Fn(&RawPoint) -> bool,
    ) -> Vec<PredictionPoint> {
        let extended_start = self.extended_start();
        let start_hour = WINDOW_PAD_HOURS;
        let end_hour = WINDOW_PAD_HOURS + self.end.hours_since(&self.start);

        let mut remap = vec![None; points.len()];
        let mut kept = Vec::new();
        for (i, p) in points.iter().enumerate() {
            if p.hour >= start_hour - TIME_EPSILON && p.hour < end_hour - TIME_EPSILON && keep(p) {
                remap[i] = Some(kept.len());
                kept.push(i);
            }
        }

        kept.iter()
            .map(|&i| {
                let p = &points[i];
                PredictionPoint {
                    time: extended_start.add_hours(p.hour),
                    level: p.level,
                    kind: p.kind,
                    uncorrected_time: extended_start.add_hours(p.unc_hour),
                    uncorrected_level: p.unc_level,
                    prev_extremum: p.prev.and_then(|idx| remap[idx]),
                    next_extremum: p.next.and_then(|idx| remap[idx]),
                }
            })
            .collect()
    }
}

/// Working representation: times as hours relative to the padded start, so
/// window arithmetic never round-trips through the full Julian Date.
#[derive(Debug, Clone, Copy)]
struct RawPoint {
    hour: f64,
    level: f64,
    kind: PointKind,
    unc_hour: f64,
    unc_level: f64,
    prev: Option<usize>,
    next: Option<usize>,
}

impl RawPoint {
    fn intermediate(hour: f64, level: f64) -> Self {
        Self {
            hour,
            level,
            kind: PointKind::Intermediate,
            unc_hour: hour,
            unc_level: level,
            prev: None,
            next: None,
        }
    }
}

/// Per-constituent state fixed at a reference epoch: speed and equilibrium
/// argument in radians (per hour), amplitude and phase from the station.
struct BaseState {
    speed: f64,
    value: f64,
    amplitude: f64,
    phase: f64,
}

/// Slowly varying node corrections, sampled per step or per partition. The
/// phase correction is reduced to [0, 360) degrees before conversion.
struct Factors {
    node: f64,
    form: f64,
}

fn base_states(constituents: &[HarmonicConstituent], epoch: JulianDate) -> Vec<BaseState> {
    let astro = Astro::new(epoch);
    constituents
        .iter()
        .map(|c| BaseState {
            speed: DEG_TO_RAD * c.model.speed(&astro),
            value: DEG_TO_RAD * c.model.value(&astro),
            amplitude: c.amplitude,
            phase: DEG_TO_RAD * c.phase_utc,
        })
        .collect()
}

fn factors_at(constituents: &[HarmonicConstituent], epoch: JulianDate) -> Vec<Factors> {
    let astro = Astro::new(epoch);
    constituents
        .iter()
        .map(|c| Factors {
            node: DEG_TO_RAD * wrap_0_360(c.model.phase_correction(&astro)),
            form: c.model.form_factor(&astro),
        })
        .collect()
}

fn level_at(base: &[BaseState], factors: &[Factors], t: f64) -> f64 {
    base.iter()
        .zip(factors)
        .map(|(b, f)| b.amplitude * f.form * libm::cos(b.speed * t + (b.value + f.node) - b.phase))
        .sum()
}

fn slope_at(base: &[BaseState], factors: &[Factors], t: f64) -> f64 {
    base.iter()
        .zip(factors)
        .map(|(b, f)| {
            -b.speed * b.amplitude * f.form * libm::sin(b.speed * t + (b.value + f.node) - b.phase)
        })
        .sum()
}

fn curvature_at(base: &[BaseState], factors: &[Factors], t: f64) -> f64 {
    base.iter()
        .zip(factors)
        .map(|(b, f)| {
            -b.speed * b.speed
                * b.amplitude
                * f.form
                * libm::cos(b.speed * t + (b.value + f.node) - b.phase)
        })
        .sum()
}

/// Newton-Raphson root refinement on `f` with derivative `df`. Fails with
/// [`Error::NewtonDiverged`] when the derivative vanishes or the iteration
/// budget is exhausted.
fn newton_raphson(
    f: &impl Fn(f64) -> f64,
    df: &impl Fn(f64) -> f64,
    initial_guess: f64,
) -> Result<f64> {
    let mut x = initial_guess;
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let fx = f(x);
        if fx.abs() < NEWTON_TOLERANCE {
            return Ok(x);
        }
        let dfx = df(x);
        if dfx == 0.0 {
            return Err(Error::NewtonDiverged);
        }
        x -= fx / dfx;
    }
    Err(Error::NewtonDiverged)
}
