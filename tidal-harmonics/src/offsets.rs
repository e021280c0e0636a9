use serde::Deserialize;

/// Subordinate-station offsets: corrections applied to a reference station's
/// synthesized extrema to approximate a nearby station without its own
/// harmonic analysis. Height offsets are multiplicative; time offsets are in
/// minutes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TidePredOffsets {
    #[serde(default)]
    pub ref_station_id: String,
    pub height_offset_high_tide: f64,
    pub height_offset_low_tide: f64,
    pub time_offset_high_tide: f64,
    pub time_offset_low_tide: f64,
}
