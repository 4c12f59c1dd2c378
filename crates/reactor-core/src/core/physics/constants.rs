use std::f64::consts::PI;

pub const BOLTZMANN: f64 = 1.380649e-23; // J/K
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19; // C
pub const MU_0: f64 = 4.0 * PI * 1e-7; // H/m
pub const ATOMIC_MASS_UNIT: f64 = 1.66053906660e-27; // kg
pub const KELVIN_TO_EV: f64 = 8.617333262e-5;

pub const MEV: f64 = 1.0e6 * ELEMENTARY_CHARGE;
pub const DT_FUSION_ENERGY: f64 = 17.6 * MEV;
pub const DT_NEUTRON_ENERGY: f64 = 14.1 * MEV;
pub const NEUTRON_ENERGY_FRACTION: f64 = 14.1 / 17.6;

pub const Z_EFF: f64 = 1.5;
pub const DT_ION_MASS_AMU: f64 = 2.5;

pub const LAWSON_NTAU_MIN: f64 = 1e20; // m⁻³·s
pub const CROSS_SECTION_VALID_KEV: (f64, f64) = (5.0, 60.0);

pub const THERMAL_TO_ELECTRICAL_EFFICIENCY: f64 = 0.33;
pub const IGNITION_Q: f64 = 10.0;

pub const LITHIUM_ATOMIC_MASS_AMU: f64 = 6.941;
pub const NATURAL_LITHIUM_DENSITY: f64 = 534.0; // kg/m³
pub const LI6_FRACTION: f64 = 0.075;
pub const LI6_BREEDING_CROSS_SECTION_BARN: f64 = 940.0;
pub const LI7_BREEDING_CROSS_SECTION_BARN: f64 = 0.045;
pub const BARN: f64 = 1e-28; // m²
pub const DPA_CROSS_SECTION: f64 = 1e-24;

pub const COOLANT_TEMPERATURE: f64 = 300.0; // K
pub const FIRST_WALL_THICKNESS: f64 = 0.01; // m

/// Converts a plasma temperature in kelvin to kilo-electron-volts.
#[inline]
pub fn kelvin_to_kev(temperature: f64) -> f64 {
    temperature * BOLTZMANN / (ELEMENTARY_CHARGE * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_to_kev_matches_reference_plasma_temperature() {
        let kev = kelvin_to_kev(163.93e6);
        assert!((kev - 14.126).abs() < 0.01);
    }

    #[test]
    fn neutron_fraction_is_the_dt_energy_split() {
        assert!((NEUTRON_ENERGY_FRACTION * DT_FUSION_ENERGY - DT_NEUTRON_ENERGY).abs() < 1e-20);
    }
}
