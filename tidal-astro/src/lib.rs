pub mod astro;
pub mod coefficients;
pub mod julian;
pub mod parsing;

pub use astro::Astro;
pub use julian::JulianDate;
pub use parsing::parse_iso8601;

pub type AstroResult<T> = Result<T, AstroError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AstroError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u8, day: u8 },
}
