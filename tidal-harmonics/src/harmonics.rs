//! A station's harmonic record: constituents with amplitude and phase,
//! vertical datums, and optional subordinate-station offsets.

use crate::constituent::Constituent;
use crate::error::{Error, Result};
use crate::offsets::TidePredOffsets;
use crate::prediction::Prediction;
use serde::Deserialize;
use tidal_astro::JulianDate;

/// One constituent of a station's harmonic decomposition: the registry model
/// bound to the station's amplitude and Greenwich phase lag.
///
/// `phase_local` and `speed` are carried through from the station record for
/// round-trip fidelity; the synthesis uses only `amplitude` and `phase_utc`.
#[derive(Debug, Clone)]
pub struct HarmonicConstituent {
    pub name: String,
    pub model: Constituent,
    pub amplitude: f64,
    pub phase_utc: f64,
    pub phase_local: f64,
    pub speed: f64,
}

/// A named vertical datum offset in meters, relative to the station's
/// reference plane.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Datum {
    pub name: String,
    pub value: f64,
}

/// A station's full harmonic record, read-only after loading.
#[derive(Debug, Clone, Default)]
pub struct Harmonics {
    pub constituents: Vec<HarmonicConstituent>,
    pub datums: Vec<Datum>,
    pub offsets: Option<TidePredOffsets>,
}

impl Harmonics {
    /// Looks up a datum by name, case-insensitively.
    pub fn datum(&self, name: &str) -> Option<&Datum> {
        self.datums
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Shifts `val` from one named reference plane to another:
    /// `val + offset(from) - offset(to)`.
    pub fn convert_datum(&self, from: &str, to: &str, val: f64) -> Result<f64> {
        let from_datum = self
            .datum(from)
            .ok_or_else(|| Error::UnknownDatum(from.to_string()))?;
        let to_datum = self
            .datum(to)
            .ok_or_else(|| Error::UnknownDatum(to.to_string()))?;
        Ok(val + from_datum.value - to_datum.value)
    }

    /// A prediction over `[start, end)` with default options (1-minute
    /// interval, MTL datum, meters).
    pub fn range_prediction(&self, start: JulianDate, end: JulianDate) -> Prediction<'_> {
        Prediction::new(self, start, end)
    }

    /// A prediction anchored at a single instant.
    pub fn time_prediction(&self, t: JulianDate) -> Prediction<'_> {
        Prediction::new(self, t, t)
    }
}
