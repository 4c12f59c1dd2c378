use super::constants::{IGNITION_Q, KELVIN_TO_EV, THERMAL_TO_ELECTRICAL_EFFICIENCY, Z_EFF};
use serde::Serialize;
use std::f64::consts::PI;

const SPITZER_COEFFICIENT: f64 = 65.0;
const NEOCLASSICAL_FACTOR: f64 = 0.2;
const COULOMB_LOG_BOUNDS: (f64, f64) = (10.0, 20.0);
const COULOMB_LOG_FALLBACK: f64 = 15.0;
const RESISTANCE_BOUNDS_OHM: (f64, f64) = (1e-7, 1e-5);

/// Loop resistance of the plasma column in ohms from a neoclassically corrected Spitzer
/// resistivity, clamped to `[1e-7, 1e-5]` Ω.
pub fn plasma_resistance(major_radius: f64, minor_radius: f64, temperature: f64, density: f64) -> f64 {
    let t_ev = temperature * KELVIN_TO_EV;
    if t_ev <= 0.0 || minor_radius <= 0.0 {
        return RESISTANCE_BOUNDS_OHM.1;
    }

    let t_kev = t_ev / 1000.0;
    let n_20 = density / 1e20;
    let coulomb_log = if n_20 > 0.0 {
        (17.3 + 1.5 * t_kev.ln() - 0.5 * n_20.ln()).clamp(COULOMB_LOG_BOUNDS.0, COULOMB_LOG_BOUNDS.1)
    } else {
        COULOMB_LOG_FALLBACK
    };

    let resistivity = SPITZER_COEFFICIENT * Z_EFF * coulomb_log / t_ev.powf(1.5) * NEOCLASSICAL_FACTOR;
    let length = 2.0 * PI * major_radius;
    let area = PI * minor_radius * minor_radius;
    (resistivity * length / area).clamp(RESISTANCE_BOUNDS_OHM.0, RESISTANCE_BOUNDS_OHM.1)
}

/// `P = I² R`
pub fn ohmic_heating(plasma_current: f64, resistance: f64) -> f64 {
    plasma_current * plasma_current * resistance
}

/// `Q = P_fus / P_in`; infinite for fusion power with no external input.
pub fn q_factor(fusion_power: f64, input_power: f64) -> f64 {
    if input_power == 0.0 {
        if fusion_power > 0.0 {
            return f64::INFINITY;
        }
        return 0.0;
    }
    fusion_power / input_power
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerBalance {
    pub fusion_power: f64,
    pub input_power: f64,
    pub radiated_power: f64,
    pub thermal_power: f64,
    pub electrical_power: f64,
    pub net_power: f64,
    pub q_factor: f64,
    pub breakeven: bool,
    pub ignition: bool,
}

/// Plant-level power balance; all arguments are totals in watts.
pub fn power_balance(fusion_power: f64, input_power: f64, radiated_power: f64) -> PowerBalance {
    let q_factor = q_factor(fusion_power, input_power);
    let thermal_power = (fusion_power + input_power - radiated_power).max(0.0);
    let electrical_power = thermal_power * THERMAL_TO_ELECTRICAL_EFFICIENCY;
    PowerBalance {
        fusion_power,
        input_power,
        radiated_power,
        thermal_power,
        electrical_power,
        net_power: electrical_power - input_power,
        q_factor,
        breakeven: q_factor > 1.0,
        ignition: q_factor > IGNITION_Q || q_factor.is_infinite(),
    }
}
