pub mod constituent;
pub mod corrections;
pub mod error;
pub mod harmonics;
pub mod loader;
pub mod offsets;
pub mod prediction;

pub use constituent::{resolve, Constituent};
pub use error::{Error, Result};
pub use harmonics::{Datum, HarmonicConstituent, Harmonics};
pub use loader::load_station;
pub use offsets::TidePredOffsets;
pub use prediction::{PointKind, Prediction, PredictionPoint, Units};
