use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Non-fatal: the loader logs this and substitutes the zero constituent.
    #[error("no constituent found for name: {0}")]
    UnknownConstituent(String),

    #[error("datum not found: {0}")]
    UnknownDatum(String),

    /// Internal to extremum refinement; the coarse bracket midpoint is
    /// accepted when this occurs.
    #[error("derivative root refinement diverged")]
    NewtonDiverged,

    #[error("no extremum brackets the requested window")]
    EmptyPrediction,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("station load failed: {0}")]
    Load(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
