use super::constants::{CROSS_SECTION_VALID_KEV, DT_FUSION_ENERGY, LAWSON_NTAU_MIN};
use super::{Advised, OutOfRangeWarning};
use serde::Serialize;

const REACTIVITY_C1: f64 = 3.7e-19; // m³/s
const REACTIVITY_C2: f64 = 19.94; // keV^(1/3)
const REACTIVITY_MIN_KEV: f64 = 0.1;

const BREMSSTRAHLUNG_COEFFICIENT: f64 = 5.35e-37;
const SYNCHROTRON_COEFFICIENT: f64 = 1e-17;
const SYNCHROTRON_CAP_FRACTION: f64 = 0.5;

/// Velocity-averaged D-T reactivity `<σv>` in m³/s for a temperature in keV.
pub fn reactivity(temperature_kev: f64) -> f64 {
    if temperature_kev < REACTIVITY_MIN_KEV {
        return 0.0;
    }
    let sigma_v = REACTIVITY_C1
        * temperature_kev.powf(-2.0 / 3.0)
        * (-REACTIVITY_C2 / temperature_kev.cbrt()).exp();
    sigma_v.max(0.0)
}

/// Reaction rate density (reactions m⁻³ s⁻¹) for a 50:50 D-T mix.
pub fn fusion_reaction_rate(density: f64, temperature_kev: f64) -> f64 {
    let n_d = density / 2.0;
    let n_t = density / 2.0;
    (n_d * n_t * reactivity(temperature_kev)).max(0.0)
}

/// Fusion power density in W/m³.
///
/// The reactivity fit is only trusted between 5 and 60 keV; outside that window the value
/// is still returned together with an [`OutOfRangeWarning`].
pub fn fusion_power_density(density: f64, temperature_kev: f64) -> Advised<f64> {
    Advised {
        value: fusion_reaction_rate(density, temperature_kev) * DT_FUSION_ENERGY,
        warning: OutOfRangeWarning::check("temperature_kev", temperature_kev, CROSS_SECTION_VALID_KEV),
    }
}

pub fn bremsstrahlung_loss(density: f64, temperature_kev: f64, z_eff: f64) -> f64 {
    if temperature_kev <= 0.0 {
        return 0.0;
    }
    BREMSSTRAHLUNG_COEFFICIENT * density * density * temperature_kev.sqrt() * z_eff * z_eff
}

/// Synchrotron loss density, capped at half the bremsstrahlung term since most of the
/// cyclotron emission is reabsorbed in a reactor-grade plasma.
pub fn synchrotron_loss(density: f64, temperature_kev: f64, magnetic_field: f64, z_eff: f64) -> f64 {
    if temperature_kev <= 0.0 {
        return 0.0;
    }
    let raw = SYNCHROTRON_COEFFICIENT * magnetic_field * magnetic_field * temperature_kev.powf(2.5) * density;
    raw.min(bremsstrahlung_loss(density, temperature_kev, z_eff) * SYNCHROTRON_CAP_FRACTION)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiationLoss {
    pub bremsstrahlung: f64,
    pub synchrotron: f64,
    pub total: f64,
}

/// Radiated power density in W/m³ (bremsstrahlung + synchrotron).
pub fn radiated_power(density: f64, temperature_kev: f64, magnetic_field: f64, z_eff: f64) -> RadiationLoss {
    let bremsstrahlung = bremsstrahlung_loss(density, temperature_kev, z_eff);
    let synchrotron = synchrotron_loss(density, temperature_kev, magnetic_field, z_eff);
    RadiationLoss {
        bremsstrahlung,
        synchrotron,
        total: bremsstrahlung + synchrotron,
    }
}

pub fn triple_product(density: f64, confinement_time: f64, temperature: f64) -> f64 {
    density * confinement_time * temperature
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LawsonCheck {
    pub n_tau: f64,
    pub required_n_tau: f64,
    pub temperature_in_window: bool,
    pub met: bool,
}

pub fn lawson_criterion(density: f64, confinement_time: f64, temperature_kev: f64) -> LawsonCheck {
    let n_tau = density * confinement_time;
    let (t_min, t_max) = CROSS_SECTION_VALID_KEV;
    let temperature_in_window = (t_min..=t_max).contains(&temperature_kev);
    LawsonCheck {
        n_tau,
        required_n_tau: LAWSON_NTAU_MIN,
        temperature_in_window,
        met: n_tau >= LAWSON_NTAU_MIN && temperature_in_window,
    }
}
