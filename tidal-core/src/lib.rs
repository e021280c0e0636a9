pub mod angle;
pub mod constants;
pub mod math;

pub use angle::wrap_0_360;
pub use math::{dot, fmod, polynomial, polynomial_derivative};
