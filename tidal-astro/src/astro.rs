//! The astronomical argument calculator.
//!
//! [`Astro`] evaluates, for a single epoch, the seven fundamental arguments
//! of the tide-generating potential (Schureman's s, h, p, N, p', omega, i)
//! together with their rates of change, and the derived angles (I, xi, nu,
//! nu', nu'', P) that feed the node and form factor corrections.
//!
//! Fundamental arguments come out as `(value, rate)` pairs: the value in
//! degrees reduced to [0, 360), the rate in degrees per hour. Derived angles
//! are plain degrees. All trigonometry is done in radians internally; the
//! degree/radian conversion happens once at each formula boundary.

use crate::coefficients::{
    LUNAR_INCLINATION, LUNAR_LONGITUDE, LUNAR_NODE, LUNAR_PERIGEE, SOLAR_LONGITUDE, SOLAR_PERIGEE,
    TERRESTRIAL_OBLIQUITY,
};
use crate::julian::JulianDate;
use tidal_core::constants::{
    DAYS_PER_JULIAN_CENTURY, DEG_TO_RAD, J2000_JD, JULIAN_CENTURIES_TO_DEG_PER_HOUR, RAD_TO_DEG,
};
use tidal_core::{polynomial, polynomial_derivative, wrap_0_360};

/// Astronomical state at one epoch. Cheap to construct; every accessor
/// computes from the stored date, so the type stays a plain value.
#[derive(Debug, Clone, Copy)]
pub struct Astro {
    jd: JulianDate,
}

impl Astro {
    pub fn new(jd: JulianDate) -> Self {
        Self { jd }
    }

    pub fn julian_date(&self) -> JulianDate {
        self.jd
    }

    /// T, Julian centuries from J2000.0 (Meeus formula 11.1).
    pub fn julian_centuries(&self) -> f64 {
        (self.jd.to_f64() - J2000_JD) / DAYS_PER_JULIAN_CENTURY
    }

    /// Lunar mean longitude, variable `s` in Schureman.
    pub fn lunar_longitude(&self) -> (f64, f64) {
        self.value_and_rate(&LUNAR_LONGITUDE)
    }

    /// Solar mean longitude, variable `h` in Schureman.
    pub fn solar_longitude(&self) -> (f64, f64) {
        self.value_and_rate(&SOLAR_LONGITUDE)
    }

    /// Lunar perigee longitude, variable `p` in Schureman.
    pub fn lunar_perigee(&self) -> (f64, f64) {
        self.value_and_rate(&LUNAR_PERIGEE)
    }

    /// Lunar ascending-node longitude, variable `N` in Schureman.
    pub fn lunar_node(&self) -> (f64, f64) {
        self.value_and_rate(&LUNAR_NODE)
    }

    /// Solar perigee longitude, variable `p'` in Schureman.
    pub fn solar_perigee(&self) -> (f64, f64) {
        self.value_and_rate(&SOLAR_PERIGEE)
    }

    /// Obliquity of the ecliptic, variable `omega` in Schureman.
    pub fn terrestrial_obliquity(&self) -> (f64, f64) {
        self.value_and_rate(&TERRESTRIAL_OBLIQUITY)
    }

    /// Mean lunar orbital inclination, variable `i` in Schureman (constant).
    pub fn lunar_inclination(&self) -> (f64, f64) {
        self.value_and_rate(&LUNAR_INCLINATION)
    }

    /// A constant angle, as a `(value, rate)` pair with zero rate.
    pub fn fixed_angle(&self, degrees: f64) -> (f64, f64) {
        (wrap_0_360(degrees), 0.0)
    }

    /// Mean solar time expressed as an angle: the day fraction of the Julian
    /// Date scaled to a full turn, advancing at 15 degrees per hour.
    pub fn hour_angle(&self) -> (f64, f64) {
        let jd = self.jd.to_f64();
        ((jd - libm::floor(jd)) * 360.0, 15.0)
    }

    /// Equilibrium argument `T + h - s` and its rate. The combination is not
    /// re-reduced; downstream Doodson sums rely on the raw value.
    pub fn equilibrium_argument(&self) -> (f64, f64) {
        let (t_val, t_rate) = self.hour_angle();
        let (s_val, s_rate) = self.lunar_longitude();
        let (h_val, h_rate) = self.solar_longitude();
        (t_val + h_val - s_val, t_rate + h_rate - s_rate)
    }

    /// Inclination of the lunar orbit to the equator, variable `I`
    /// (Schureman eq. 191).
    pub fn inclination(&self) -> f64 {
        let (n, _) = self.lunar_node();
        let (i, _) = self.lunar_inclination();
        let (omega, _) = self.terrestrial_obliquity();
        wrap_0_360(inclination_deg(n, i, omega))
    }

    /// Longitude in the Moon's orbit of the lunar intersection, variable `xi`.
    pub fn xi(&self) -> f64 {
        let (n, _) = self.lunar_node();
        let (i, _) = self.lunar_inclination();
        let (omega, _) = self.terrestrial_obliquity();
        let (e1, e2) = intersection_angles(n, i, omega);
        wrap_0_360(-(e1 + e2) * RAD_TO_DEG)
    }

    /// Right ascension of the lunar intersection, variable `nu`.
    pub fn nu(&self) -> f64 {
        let (n, _) = self.lunar_node();
        let (i, _) = self.lunar_inclination();
        let (omega, _) = self.terrestrial_obliquity();
        let (e1, e2) = intersection_angles(n, i, omega);
        wrap_0_360((e1 - e2) * RAD_TO_DEG)
    }

    /// Lunar perigee correction angle, variable `nu'` (Schureman eq. 224),
    /// used by the K1 node correction.
    pub fn nu_prime(&self) -> f64 {
        let i_cap = DEG_TO_RAD * self.inclination();
        let nu = DEG_TO_RAD * self.nu();
        let nup = libm::atan(
            libm::sin(2.0 * i_cap) * libm::sin(nu)
                / (libm::sin(2.0 * i_cap) * libm::cos(nu) + 0.3347),
        );
        wrap_0_360(nup * RAD_TO_DEG)
    }

    /// Solar correction angle, variable `nu''` (Schureman eq. 232), used by
    /// the K2 node correction.
    pub fn nu_second(&self) -> f64 {
        let i_cap = DEG_TO_RAD * self.inclination();
        let nu = DEG_TO_RAD * self.nu();
        let sin_i_sq = libm::sin(i_cap) * libm::sin(i_cap);
        let tan_2nupp =
            sin_i_sq * libm::sin(2.0 * nu) / (sin_i_sq * libm::cos(2.0 * nu) + 0.0727);
        wrap_0_360(0.5 * libm::atan(tan_2nupp) * RAD_TO_DEG)
    }

    /// Variable `P = p - xi` in Schureman.
    pub fn p_angle(&self) -> f64 {
        let (p, _) = self.lunar_perigee();
        wrap_0_360(p - self.xi())
    }

    fn value_and_rate(&self, coeffs: &[f64]) -> (f64, f64) {
        let t = self.julian_centuries();
        let value = wrap_0_360(polynomial(coeffs, t));
        let rate = polynomial_derivative(coeffs, t) * JULIAN_CENTURIES_TO_DEG_PER_HOUR;
        (value, rate)
    }
}

/// Schureman eq. 191: cos I = cos i cos omega - sin i sin omega cos N.
fn inclination_deg(n: f64, i: f64, omega: f64) -> f64 {
    let n = DEG_TO_RAD * n;
    let i = DEG_TO_RAD * i;
    let omega = DEG_TO_RAD * omega;
    let cos_i_cap = libm::cos(i) * libm::cos(omega) - libm::sin(i) * libm::sin(omega) * libm::cos(n);
    RAD_TO_DEG * libm::acos(cos_i_cap)
}

/// The two auxiliary angles whose sum and difference give xi and nu
/// (Schureman's development following eq. 191). Returned in radians.
fn intersection_angles(n: f64, i: f64, omega: f64) -> (f64, f64) {
    let n = DEG_TO_RAD * n;
    let i = DEG_TO_RAD * i;
    let omega = DEG_TO_RAD * omega;
    let half_n = 0.5 * n;
    let e1 = libm::atan(
        libm::cos(0.5 * (omega - i)) / libm::cos(0.5 * (omega + i)) * libm::tan(half_n),
    ) - half_n;
    let e2 = libm::atan(
        libm::sin(0.5 * (omega - i)) / libm::sin(0.5 * (omega + i)) * libm::tan(half_n),
    ) - half_n;
    (e1, e2)
}
