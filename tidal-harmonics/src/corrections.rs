//! Schureman node and form factor corrections.
//!
//! Every lunar constituent's amplitude and phase drift slowly with the
//! 18.6-year regression of the lunar node. The form factor `f` scales the
//! amplitude; the phase correction `u` shifts the argument. Both are
//! selected per constituent family: [`Correction`] names the family, and
//! the formulas below are Schureman's (SP 98) equations for each.
//!
//! `u` comes back in degrees (signed, unreduced); `f` is dimensionless.
//! Trigonometry runs in radians; the conversion happens once per formula.

use tidal_astro::Astro;
use tidal_core::constants::{DEG_TO_RAD, RAD_TO_DEG};

/// Node/form correction family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Solar and long-period constituents with no lunar node dependence.
    Unity,
    Mm,
    Mf,
    O1,
    J1,
    OO1,
    M2,
    K1,
    L2,
    K2,
    M1,
    /// Odd overtides of M2 (e.g. M3): f = f_M2^(n/2), u = (n/2)·u_M2.
    MOdd(u8),
}

impl Correction {
    /// Phase correction `u` in degrees (Schureman Table 2).
    pub fn phase_correction(&self, a: &Astro) -> f64 {
        match self {
            Correction::Unity => 0.0,
            Correction::Mm => 0.0,
            Correction::Mf => -2.0 * a.xi(),
            Correction::O1 => 2.0 * a.xi() - a.nu(),
            Correction::J1 => -a.nu(),
            Correction::OO1 => -2.0 * a.xi() - a.nu(),
            Correction::M2 => 2.0 * a.xi() - 2.0 * a.nu(),
            Correction::K1 => -a.nu_prime(),
            Correction::L2 => u_l2(a),
            Correction::K2 => -2.0 * a.nu_second(),
            Correction::M1 => u_m1(a),
            Correction::MOdd(n) => (*n as f64 / 2.0) * (2.0 * a.xi() - 2.0 * a.nu()),
        }
    }

    /// Form factor `f`, dimensionless.
    pub fn form_factor(&self, a: &Astro) -> f64 {
        match self {
            Correction::Unity => 1.0,
            Correction::Mm => f_mm(a),
            Correction::Mf => f_mf(a),
            Correction::O1 => f_o1(a),
            Correction::J1 => f_j1(a),
            Correction::OO1 => f_oo1(a),
            Correction::M2 => f_m2(a),
            Correction::K1 => f_k1(a),
            Correction::L2 => f_l2(a),
            Correction::K2 => f_k2(a),
            Correction::M1 => f_m1(a),
            Correction::MOdd(n) => libm::pow(f_m2(a), *n as f64 / 2.0),
        }
    }
}

/// Schureman equations 73, 65.
fn f_mm(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = (2.0 / 3.0 - sq(libm::sin(omega))) * (1.0 - 1.5 * sq(libm::sin(i)));
    (2.0 / 3.0 - sq(libm::sin(i_cap))) / mean
}

/// Schureman equations 74, 66.
fn f_mf(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = sq(libm::sin(omega)) * pow4(libm::cos(0.5 * i));
    sq(libm::sin(i_cap)) / mean
}

/// Schureman equations 75, 67.
fn f_o1(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = libm::sin(omega) * sq(libm::cos(0.5 * omega)) * pow4(libm::cos(0.5 * i));
    libm::sin(i_cap) * sq(libm::cos(0.5 * i_cap)) / mean
}

/// Schureman equations 76, 68.
fn f_j1(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = libm::sin(2.0 * omega) * (1.0 - 1.5 * sq(libm::sin(i)));
    libm::sin(2.0 * i_cap) / mean
}

/// Schureman equations 77, 69.
fn f_oo1(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = libm::sin(omega) * sq(libm::sin(0.5 * omega)) * pow4(libm::cos(0.5 * i));
    libm::sin(i_cap) * sq(libm::sin(0.5 * i_cap)) / mean
}

/// Schureman equations 78, 70.
fn f_m2(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let mean = pow4(libm::cos(0.5 * omega)) * pow4(libm::cos(0.5 * i));
    pow4(libm::cos(0.5 * i_cap)) / mean
}

/// Schureman equations 227, 226, 68. The numeric terms are the fixed
/// coefficients of the lunisolar development.
fn f_k1(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let nu = DEG_TO_RAD * a.nu();
    let sin_2i_cos_nu_mean = libm::sin(2.0 * omega) * (1.0 - 1.5 * sq(libm::sin(i)));
    let mean = 0.5023 * sin_2i_cos_nu_mean + 0.1681;
    libm::sqrt(
        0.2523 * sq(libm::sin(2.0 * i_cap)) + 0.1689 * libm::sin(2.0 * i_cap) * libm::cos(nu)
            + 0.0283,
    ) / mean
}

/// Schureman equations 215, 213, 204. The radical is 1/R_a; the exponent
/// 1/2 is confirmed against Schureman Table 7.
fn f_l2(a: &Astro) -> f64 {
    let i_cap = DEG_TO_RAD * a.inclination();
    let p = DEG_TO_RAD * a.p_angle();
    let tan_half = libm::tan(0.5 * i_cap);
    let ra_inv =
        libm::sqrt(1.0 - 12.0 * sq(tan_half) * libm::cos(2.0 * p) + 36.0 * pow4(tan_half));
    f_m2(a) * ra_inv
}

/// Schureman equations 235, 234, 71.
fn f_k2(a: &Astro) -> f64 {
    let (omega, i, i_cap) = base_angles(a);
    let nu = DEG_TO_RAD * a.nu();
    let sinsq_i_cos_2nu_mean = sq(libm::sin(omega)) * (1.0 - 1.5 * sq(libm::sin(i)));
    let mean = 0.5023 * sinsq_i_cos_2nu_mean + 0.0365;
    libm::sqrt(
        0.2523 * pow4(libm::sin(i_cap))
            + 0.0367 * sq(libm::sin(i_cap)) * libm::cos(2.0 * nu)
            + 0.0013,
    ) / mean
}

/// Schureman equations 206, 207, 195. The radical is 1/Q_a.
fn f_m1(a: &Astro) -> f64 {
    let i_cap = DEG_TO_RAD * a.inclination();
    let p = DEG_TO_RAD * a.p_angle();
    let qa_inv = libm::sqrt(
        0.25 + 1.5 * libm::cos(i_cap) * libm::cos(2.0 * p) * libm::pow(libm::cos(0.5 * i_cap), -0.5)
            + 2.25 * sq(libm::cos(i_cap)) * libm::pow(libm::cos(0.5 * i_cap), -4.0),
    );
    f_o1(a) * qa_inv
}

/// Schureman equation 214.
fn u_l2(a: &Astro) -> f64 {
    let i_cap = DEG_TO_RAD * a.inclination();
    let p = DEG_TO_RAD * a.p_angle();
    let r = RAD_TO_DEG
        * libm::atan(
            libm::sin(2.0 * p)
                / ((1.0 / 6.0) / sq(libm::tan(0.5 * i_cap)) - libm::cos(2.0 * p)),
        );
    2.0 * a.xi() - 2.0 * a.nu() - r
}

/// Schureman equation 202.
fn u_m1(a: &Astro) -> f64 {
    let i_cap = DEG_TO_RAD * a.inclination();
    let p = DEG_TO_RAD * a.p_angle();
    let q = RAD_TO_DEG
        * libm::atan(
            (5.0 * libm::cos(i_cap) - 1.0) / (7.0 * libm::cos(i_cap) + 1.0) * libm::tan(p),
        );
    a.xi() - a.nu() + q
}

/// omega, i and I in radians, the shared inputs of the mean-value ratios.
fn base_angles(a: &Astro) -> (f64, f64, f64) {
    let (omega, _) = a.terrestrial_obliquity();
    let (i, _) = a.lunar_inclination();
    (
        DEG_TO_RAD * omega,
        DEG_TO_RAD * i,
        DEG_TO_RAD * a.inclination(),
    )
}

#[inline]
fn sq(x: f64) -> f64 {
    x * x
}

#[inline]
fn pow4(x: f64) -> f64 {
    sq(sq(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidal_astro::JulianDate;

    const VAL_TOLERANCE: f64 = 1e-6;

    fn test_astro() -> Astro {
        Astro::new(JulianDate::from_calendar(2023, 4, 10, 0, 0, 0.0))
    }

    fn assert_close(got: f64, want: f64, what: &str) {
        assert!(
            (got - want).abs() < VAL_TOLERANCE,
            "{what}: got {got}, want {want}"
        );
    }

    #[test]
    fn form_factors_at_reference_epoch() {
        let a = test_astro();
        assert_close(Correction::Unity.form_factor(&a), 1.0, "f unity");
        assert_close(Correction::Mm.form_factor(&a), 0.8941124780426585, "f Mm");
        assert_close(Correction::Mf.form_factor(&a), 1.380589713035402, "f Mf");
        assert_close(Correction::O1.form_factor(&a), 1.1571433842381185, "f O1");
        assert_close(Correction::J1.form_factor(&a), 1.1443477229145904, "f J1");
        assert_close(Correction::OO1.form_factor(&a), 1.647183902791902, "f OO1");
        assert_close(Correction::M2.form_factor(&a), 0.9698615012436436, "f M2");
        assert_close(Correction::K1.form_factor(&a), 1.0973117472647704, "f K1");
        assert_close(Correction::L2.form_factor(&a), 1.147067972436108, "f L2");
        assert_close(Correction::K2.form_factor(&a), 1.2608955649232407, "f K2");
        assert_close(Correction::M1.form_factor(&a), 1.5305197393171937, "f M1");
        assert_close(
            Correction::MOdd(3).form_factor(&a),
            0.9551346058944368,
            "f M3",
        );
    }

    #[test]
    fn phase_corrections_at_reference_epoch() {
        let a = test_astro();
        assert_close(Correction::Unity.phase_correction(&a), 0.0, "u zero");
        assert_close(Correction::Mf.phase_correction(&a), -11.423502593010198, "u Mf");
        assert_close(Correction::O1.phase_correction(&a), 5.094839139355827, "u O1");
        assert_close(Correction::J1.phase_correction(&a), -6.3286634536543716, "u J1");
        assert_close(Correction::OO1.phase_correction(&a), -17.75216604666457, "u OO1");
        assert_close(Correction::M2.phase_correction(&a), -1.2338243142985448, "u M2");
        assert_close(Correction::K1.phase_correction(&a), -4.503444637802829, "u K1");
        assert_close(Correction::L2.phase_correction(&a), 15.623387911836264, "u L2");
        assert_close(Correction::K2.phase_correction(&a), -9.496278929046412, "u K2");
        assert_close(Correction::M1.phase_correction(&a), -35.33609082266406, "u M1");
        assert_close(
            Correction::MOdd(3).phase_correction(&a),
            -1.8507364714478172,
            "u M3",
        );
    }

    #[test]
    fn form_factors_bounded_over_node_cycle() {
        // f varies with the 18.6-year node regression but stays well inside
        // (0, 5) for every family.
        let families = [
            Correction::Unity,
            Correction::Mm,
            Correction::Mf,
            Correction::O1,
            Correction::J1,
            Correction::OO1,
            Correction::M2,
            Correction::K1,
            Correction::L2,
            Correction::K2,
            Correction::M1,
            Correction::MOdd(3),
        ];
        for year in 2010..=2029 {
            let a = Astro::new(JulianDate::from_calendar(year, 1, 1, 0, 0, 0.0));
            for family in families {
                let f = family.form_factor(&a);
                assert!(
                    f.is_finite() && f > 0.0 && f < 5.0,
                    "{family:?} f = {f} at {year}"
                );
            }
        }
    }
}
