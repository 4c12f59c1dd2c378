use super::constants::{
    ATOMIC_MASS_UNIT, BARN, COOLANT_TEMPERATURE, DPA_CROSS_SECTION, DT_FUSION_ENERGY,
    DT_NEUTRON_ENERGY, FIRST_WALL_THICKNESS, LI6_BREEDING_CROSS_SECTION_BARN, LI6_FRACTION,
    LI7_BREEDING_CROSS_SECTION_BARN, LITHIUM_ATOMIC_MASS_AMU, NEUTRON_ENERGY_FRACTION,
};
use serde::Serialize;

/// Neutron flux through the first wall in n m⁻² s⁻¹.
pub fn neutron_flux(fusion_power: f64, surface_area: f64) -> f64 {
    if surface_area <= 0.0 {
        return 0.0;
    }
    let neutron_power = fusion_power * NEUTRON_ENERGY_FRACTION;
    neutron_power / DT_NEUTRON_ENERGY / surface_area
}

/// Neutron wall loading in MW/m².
pub fn neutron_wall_loading(fusion_power: f64, surface_area: f64) -> f64 {
    if surface_area <= 0.0 {
        return 0.0;
    }
    fusion_power * NEUTRON_ENERGY_FRACTION / surface_area / 1e6
}

/// Tritium burn rate in atoms/s; one triton per D-T reaction.
pub fn tritium_consumption(fusion_power: f64) -> f64 {
    (fusion_power / DT_FUSION_ENERGY).max(0.0)
}

/// Number density of lithium atoms (m⁻³) in a blanket of the given mass density.
pub fn lithium_atom_density(mass_density: f64) -> f64 {
    mass_density / (LITHIUM_ATOMIC_MASS_AMU * ATOMIC_MASS_UNIT)
}

/// Tritium production rate in atoms/s from Li-6/Li-7 capture in a blanket slab.
pub fn tritium_production(neutron_flux: f64, lithium_density: f64, thickness: f64) -> f64 {
    let sigma_eff = (LI6_FRACTION * LI6_BREEDING_CROSS_SECTION_BARN
        + (1.0 - LI6_FRACTION) * LI7_BREEDING_CROSS_SECTION_BARN)
        * BARN;
    (neutron_flux * lithium_density * sigma_eff * thickness).max(0.0)
}

pub fn tritium_breeding_ratio(production: f64, consumption: f64) -> f64 {
    if consumption == 0.0 {
        if production > 0.0 {
            return f64::INFINITY;
        }
        return 0.0;
    }
    production / consumption
}

/// Displacement damage rate in DPA per second.
///
/// Damage is accumulated by the caller as `rate * dt`; no fixed exposure window is assumed.
pub fn dpa_rate(neutron_flux: f64) -> f64 {
    (neutron_flux * DPA_CROSS_SECTION).max(0.0)
}

/// Steady-state first-wall surface temperature in kelvin for a conductive wall slab.
pub fn first_wall_temperature(wall_loading_mw: f64, thermal_conductivity: f64) -> f64 {
    if thermal_conductivity <= 0.0 {
        return f64::INFINITY;
    }
    COOLANT_TEMPERATURE + wall_loading_mw * 1e6 * FIRST_WALL_THICKNESS / thermal_conductivity
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeutronicsState {
    pub neutron_flux: f64,
    pub wall_loading: f64,
    pub tritium_production_rate: f64,
    pub tritium_consumption_rate: f64,
    pub tritium_breeding_ratio: f64,
    pub dpa_rate: f64,
}

pub fn neutronics_state(
    fusion_power: f64,
    surface_area: f64,
    lithium_density: f64,
    blanket_thickness: f64,
) -> NeutronicsState {
    let neutron_flux = neutron_flux(fusion_power, surface_area);
    let tritium_production_rate = tritium_production(neutron_flux, lithium_density, blanket_thickness);
    let tritium_consumption_rate = tritium_consumption(fusion_power);
    NeutronicsState {
        neutron_flux,
        wall_loading: neutron_wall_loading(fusion_power, surface_area),
        tritium_production_rate,
        tritium_consumption_rate,
        tritium_breeding_ratio: tritium_breeding_ratio(tritium_production_rate, tritium_consumption_rate),
        dpa_rate: dpa_rate(neutron_flux),
    }
}
