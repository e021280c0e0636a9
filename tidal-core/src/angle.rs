//! Angle normalization for tidal astronomical arguments.
//!
//! All fundamental longitudes and equilibrium arguments are carried in
//! degrees and reduced into [0, 360). The reduction uses `libm::fmod`
//! rather than the `%` operator because Rust's `%` is a remainder, not a
//! modulo: `-1.0 % 360.0` is `-1.0`, while an angle of -1 degree must
//! normalize to 359 degrees.

use crate::math::fmod;

/// Wraps an angle in degrees to [0, 360).
#[inline]
pub fn wrap_0_360(x: f64) -> f64 {
    let w = fmod(x, 360.0);
    if w < 0.0 {
        w + 360.0
    } else {
        w
    }
}
