//! Station JSON loading and constituent-name binding.
//!
//! Station files live in a data directory as `<station_id>.json`; see
//! [`StationDocument`] for the schema. A subordinate station names a
//! reference station in its offsets block, in which case the reference
//! station's constituents are loaded recursively while the offsets stay on
//! the subordinate.

use crate::constituent::{self, resolve, Constituent};
use crate::error::{Error, Result};
use crate::harmonics::{Datum, HarmonicConstituent, Harmonics};
use crate::offsets::TidePredOffsets;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The on-disk schema of a station file.
#[derive(Debug, Deserialize)]
pub struct StationDocument {
    #[serde(default)]
    pub harmonic_constituents: Vec<ConstituentRecord>,
    #[serde(default)]
    pub datums: Vec<Datum>,
    #[serde(default)]
    pub tide_pred_offsets: Option<TidePredOffsets>,
}

/// One harmonic constituent as it appears in the station file. `phase_local`
/// and `speed` are informational; the synthesis derives speed from the
/// constituent model.
#[derive(Debug, Deserialize)]
pub struct ConstituentRecord {
    pub name: String,
    pub amplitude: f64,
    #[serde(rename = "phase_UTC")]
    pub phase_utc: f64,
    #[serde(default)]
    pub phase_local: f64,
    #[serde(default)]
    pub speed: f64,
}

/// Loads a station's harmonics from `<data_dir>/<station_id>.json`,
/// following a subordinate station's reference link if present.
pub fn load_station(data_dir: &Path, station_id: &str) -> Result<Harmonics> {
    let path = data_dir.join(format!("{station_id}.json"));
    let file = File::open(&path)
        .map_err(|e| Error::Load(format!("cannot open {}: {e}", path.display())))?;
    let doc: StationDocument = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::Load(format!("invalid station file {}: {e}", path.display())))?;

    let constituents = match &doc.tide_pred_offsets {
        Some(offsets) if !offsets.ref_station_id.is_empty() => {
            let reference = load_station(data_dir, &offsets.ref_station_id).map_err(|e| {
                Error::Load(format!(
                    "reference station {} for {station_id}: {e}",
                    offsets.ref_station_id
                ))
            })?;
            reference.constituents
        }
        _ => doc.harmonic_constituents.into_iter().map(bind).collect(),
    };

    Ok(Harmonics {
        constituents,
        datums: doc.datums,
        offsets: doc.tide_pred_offsets,
    })
}

/// Binds a station record to its registry model. Unknown names substitute
/// the zero constituent so the rest of the station stays usable.
fn bind(record: ConstituentRecord) -> HarmonicConstituent {
    let model = resolve(&record.name).unwrap_or_else(|| {
        log::warn!("{}", Error::UnknownConstituent(record.name.clone()));
        Constituent::Primitive(constituent::Z0)
    });
    HarmonicConstituent {
        name: record.name,
        model,
        amplitude: record.amplitude,
        phase_utc: record.phase_utc,
        phase_local: record.phase_local,
        speed: record.speed,
    }
}
