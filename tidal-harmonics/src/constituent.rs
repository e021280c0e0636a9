//! The tidal constituent model and registry.
//!
//! A primitive constituent is a 7-vector of Doodson multipliers over the
//! fundamental astronomical arguments (T+h-s, s, h, p, N, p', 90°) plus a
//! node/form correction family. A compound constituent is a signed integer
//! combination of primitives (overtides and compound tides). Both expose the
//! same four operations: angular speed, equilibrium value, phase correction
//! `u` and form factor `f` at an epoch.
//!
//! The registry is immutable static data; [`resolve`] binds a station's
//! constituent-name strings (case-sensitive, as they appear in NOAA harmonic
//! records) to models at load time.

use crate::corrections::Correction;
use tidal_astro::Astro;
use tidal_core::math::dot;

/// A single harmonic of the tide-generating potential.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    name: &'static str,
    doodson: [f64; 7],
    correction: Correction,
}

impl Primitive {
    pub const fn new(name: &'static str, doodson: [f64; 7], correction: Correction) -> Self {
        Self {
            name,
            doodson,
            correction,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Angular speed in degrees per hour.
    pub fn speed(&self, a: &Astro) -> f64 {
        let (_, rates) = doodson_arguments(a);
        dot(&self.doodson, &rates)
    }

    /// Equilibrium argument V0 in degrees.
    pub fn value(&self, a: &Astro) -> f64 {
        let (values, _) = doodson_arguments(a);
        dot(&self.doodson, &values)
    }

    /// Phase correction u in degrees.
    pub fn phase_correction(&self, a: &Astro) -> f64 {
        self.correction.phase_correction(a)
    }

    /// Form factor f, dimensionless.
    pub fn form_factor(&self, a: &Astro) -> f64 {
        self.correction.form_factor(a)
    }
}

/// One term of a compound constituent: a primitive and its signed factor.
#[derive(Debug, Clone, Copy)]
pub struct Member {
    constituent: Primitive,
    factor: f64,
}

impl Member {
    pub const fn new(constituent: Primitive, factor: f64) -> Self {
        Self {
            constituent,
            factor,
        }
    }
}

/// A signed combination of primitive constituents.
#[derive(Debug, Clone, Copy)]
pub struct Compound {
    name: &'static str,
    members: &'static [Member],
}

impl Compound {
    pub const fn new(name: &'static str, members: &'static [Member]) -> Self {
        Self { name, members }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn speed(&self, a: &Astro) -> f64 {
        self.members
            .iter()
            .map(|m| m.constituent.speed(a) * m.factor)
            .sum()
    }

    pub fn value(&self, a: &Astro) -> f64 {
        self.members
            .iter()
            .map(|m| m.constituent.value(a) * m.factor)
            .sum()
    }

    /// Sum of member phase corrections scaled by the signed factor.
    pub fn phase_correction(&self, a: &Astro) -> f64 {
        self.members
            .iter()
            .map(|m| m.constituent.phase_correction(a) * m.factor)
            .sum()
    }

    /// Product of member form factors, each raised to |factor|.
    pub fn form_factor(&self, a: &Astro) -> f64 {
        self.members
            .iter()
            .map(|m| libm::pow(m.constituent.form_factor(a), m.factor.abs()))
            .product()
    }
}

/// A named tidal constituent: either a primitive harmonic or a compound.
#[derive(Debug, Clone, Copy)]
pub enum Constituent {
    Primitive(Primitive),
    Compound(Compound),
}

impl Constituent {
    pub fn name(&self) -> &'static str {
        match self {
            Constituent::Primitive(p) => p.name(),
            Constituent::Compound(c) => c.name(),
        }
    }

    /// Angular speed sigma in degrees per hour.
    pub fn speed(&self, a: &Astro) -> f64 {
        match self {
            Constituent::Primitive(p) => p.speed(a),
            Constituent::Compound(c) => c.speed(a),
        }
    }

    /// Equilibrium argument V0 in degrees.
    pub fn value(&self, a: &Astro) -> f64 {
        match self {
            Constituent::Primitive(p) => p.value(a),
            Constituent::Compound(c) => c.value(a),
        }
    }

    /// Phase correction u in degrees.
    pub fn phase_correction(&self, a: &Astro) -> f64 {
        match self {
            Constituent::Primitive(p) => p.phase_correction(a),
            Constituent::Compound(c) => c.phase_correction(a),
        }
    }

    /// Form factor f, dimensionless.
    pub fn form_factor(&self, a: &Astro) -> f64 {
        match self {
            Constituent::Primitive(p) => p.form_factor(a),
            Constituent::Compound(c) => c.form_factor(a),
        }
    }
}

/// Values and rates of the seven Doodson arguments at an epoch:
/// (T+h-s, s, h, p, N, p', 90°), degrees and degrees per hour.
pub fn doodson_arguments(a: &Astro) -> ([f64; 7], [f64; 7]) {
    let ths = a.equilibrium_argument();
    let s = a.lunar_longitude();
    let h = a.solar_longitude();
    let p = a.lunar_perigee();
    let n = a.lunar_node();
    let pp = a.solar_perigee();
    let right_angle = a.fixed_angle(90.0);
    (
        [ths.0, s.0, h.0, p.0, n.0, pp.0, right_angle.0],
        [ths.1, s.1, h.1, p.1, n.1, pp.1, right_angle.1],
    )
}

// Long period
pub const Z0: Primitive = Primitive::new("Z0", [0., 0., 0., 0., 0., 0., 0.], Correction::Unity);
pub const SA: Primitive = Primitive::new("SA", [0., 0., 1., 0., 0., 0., 0.], Correction::Unity);
pub const SSA: Primitive = Primitive::new("SSA", [0., 0., 2., 0., 0., 0., 0.], Correction::Unity);
pub const MM: Primitive = Primitive::new("MM", [0., 1., 0., -1., 0., 0., 0.], Correction::Mm);
pub const MF: Primitive = Primitive::new("MF", [0., 2., 0., 0., 0., 0., 0.], Correction::Mf);

// Diurnal
pub const Q1: Primitive = Primitive::new("Q1", [1., -2., 0., 1., 0., 0., 1.], Correction::O1);
pub const O1: Primitive = Primitive::new("O1", [1., -1., 0., 0., 0., 0., 1.], Correction::O1);
pub const K1: Primitive = Primitive::new("K1", [1., 1., 0., 0., 0., 0., -1.], Correction::K1);
pub const J1: Primitive = Primitive::new("J1", [1., 2., 0., -1., 0., 0., -1.], Correction::J1);
pub const M1: Primitive = Primitive::new("M1", [1., 0., 0., 0., 0., 0., 1.], Correction::M1);
pub const P1: Primitive = Primitive::new("P1", [1., 1., -2., 0., 0., 0., 1.], Correction::Unity);
pub const S1: Primitive = Primitive::new("S1", [1., 1., -1., 0., 0., 0., 0.], Correction::Unity);
pub const OO1: Primitive = Primitive::new("OO1", [1., 3., 0., 0., 0., 0., -1.], Correction::OO1);

// Semidiurnal
pub const TWO_N2: Primitive = Primitive::new("2N2", [2., -2., 0., 2., 0., 0., 0.], Correction::M2);
pub const N2: Primitive = Primitive::new("N2", [2., -1., 0., 1., 0., 0., 0.], Correction::M2);
pub const NU2: Primitive = Primitive::new("NU2", [2., -1., 2., -1., 0., 0., 0.], Correction::M2);
pub const M2: Primitive = Primitive::new("M2", [2., 0., 0., 0., 0., 0., 0.], Correction::M2);
pub const LAM2: Primitive = Primitive::new("LAM2", [2., 1., -2., 1., 0., 0., 2.], Correction::M2);
pub const L2: Primitive = Primitive::new("L2", [2., 1., 0., -1., 0., 0., 2.], Correction::L2);
pub const T2: Primitive = Primitive::new("T2", [2., 2., -3., 0., 0., 1., 0.], Correction::Unity);
pub const S2: Primitive = Primitive::new("S2", [2., 2., -2., 0., 0., 0., 0.], Correction::Unity);
pub const R2: Primitive = Primitive::new("R2", [2., 2., -1., 0., 0., -1., 2.], Correction::Unity);
pub const K2: Primitive = Primitive::new("K2", [2., 2., 0., 0., 0., 0., 0.], Correction::K2);

// Terdiurnal
pub const M3: Primitive = Primitive::new("M3", [3., 0., 0., 0., 0., 0., 0.], Correction::MOdd(3));

// Compound
pub const MSF: Compound = Compound::new(
    "MSF",
    &[Member::new(S2, 1.0), Member::new(M2, -1.0)],
);
pub const TWO_Q1: Compound = Compound::new(
    "2Q1",
    &[Member::new(N2, 1.0), Member::new(J1, -1.0)],
);
pub const RHO: Compound = Compound::new(
    "RHO",
    &[Member::new(NU2, 1.0), Member::new(K1, -1.0)],
);
pub const MU2: Compound = Compound::new(
    "MU2",
    &[Member::new(M2, 2.0), Member::new(S2, -1.0)],
);
pub const TWO_SM2: Compound = Compound::new(
    "2SM2",
    &[Member::new(S2, 2.0), Member::new(M2, -1.0)],
);
pub const TWO_MK3: Compound = Compound::new(
    "2MK3",
    &[Member::new(M2, 1.0), Member::new(O1, 1.0)],
);
pub const MK3: Compound = Compound::new(
    "MK3",
    &[Member::new(M2, 1.0), Member::new(K1, 1.0)],
);
pub const MN4: Compound = Compound::new(
    "MN4",
    &[Member::new(M2, 1.0), Member::new(N2, 1.0)],
);
pub const M4: Compound = Compound::new("M4", &[Member::new(M2, 2.0)]);
pub const MS4: Compound = Compound::new(
    "MS4",
    &[Member::new(M2, 1.0), Member::new(S2, 1.0)],
);
pub const S4: Compound = Compound::new("S4", &[Member::new(S2, 2.0)]);
pub const M6: Compound = Compound::new("M6", &[Member::new(M2, 3.0)]);
pub const S6: Compound = Compound::new("S6", &[Member::new(S2, 3.0)]);
pub const M8: Compound = Compound::new("M8", &[Member::new(M2, 4.0)]);

/// Looks up a constituent by its station-record name. Matching is
/// case-sensitive; the registry uses the uppercase names of the NOAA
/// harmonic records ("NU2", "LAM2", "RHO", ...).
pub fn resolve(name: &str) -> Option<Constituent> {
    let constituent = match name {
        "Z0" => Constituent::Primitive(Z0),
        "SA" => Constituent::Primitive(SA),
        "SSA" => Constituent::Primitive(SSA),
        "MM" => Constituent::Primitive(MM),
        "MF" => Constituent::Primitive(MF),
        "Q1" => Constituent::Primitive(Q1),
        "O1" => Constituent::Primitive(O1),
        "K1" => Constituent::Primitive(K1),
        "J1" => Constituent::Primitive(J1),
        "M1" => Constituent::Primitive(M1),
        "P1" => Constituent::Primitive(P1),
        "S1" => Constituent::Primitive(S1),
        "OO1" => Constituent::Primitive(OO1),
        "2N2" => Constituent::Primitive(TWO_N2),
        "N2" => Constituent::Primitive(N2),
        "NU2" => Constituent::Primitive(NU2),
        "M2" => Constituent::Primitive(M2),
        "LAM2" => Constituent::Primitive(LAM2),
        "L2" => Constituent::Primitive(L2),
        "T2" => Constituent::Primitive(T2),
        "S2" => Constituent::Primitive(S2),
        "R2" => Constituent::Primitive(R2),
        "K2" => Constituent::Primitive(K2),
        "M3" => Constituent::Primitive(M3),
        "MSF" => Constituent::Compound(MSF),
        "2Q1" => Constituent::Compound(TWO_Q1),
        "RHO" => Constituent::Compound(RHO),
        "MU2" => Constituent::Compound(MU2),
        "2SM2" => Constituent::Compound(TWO_SM2),
        "2MK3" => Constituent::Compound(TWO_MK3),
        "MK3" => Constituent::Compound(MK3),
        "MN4" => Constituent::Compound(MN4),
        "M4" => Constituent::Compound(M4),
        "MS4" => Constituent::Compound(MS4),
        "S4" => Constituent::Compound(S4),
        "M6" => Constituent::Compound(M6),
        "S6" => Constituent::Compound(S6),
        "M8" => Constituent::Compound(M8),
        _ => return None,
    };
    Some(constituent)
}
