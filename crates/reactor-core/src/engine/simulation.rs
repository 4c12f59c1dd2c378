use super::config::SimulationSettings;
use super::error::EngineError;
use super::failure::{self, Observation};
use super::progress::{Progress, ProgressReporter};
use super::statistics::OperationStatistics;
use crate::core::materials::{Material, MaterialCatalog};
use crate::core::models::config::ReactorConfiguration;
use crate::core::models::state::{Advisory, FuelState, OperationalStatus, PlasmaState, ReactorState};
use crate::core::physics::constants::{BOLTZMANN, NATURAL_LITHIUM_DENSITY, Z_EFF, kelvin_to_kev};
use crate::core::physics::magnetic::{ConfinementInputs, TokamakGeometry, confinement_time, magnetic_state};
use crate::core::physics::neutronics::{first_wall_temperature, lithium_atom_density, neutronics_state};
use crate::core::physics::plasma::{fusion_power_density, lawson_criterion, radiated_power, triple_product};
use crate::core::physics::power::{ohmic_heating, plasma_resistance, power_balance};
use tracing::{info, instrument, trace, warn};

const MIN_PLASMA_TEMPERATURE: f64 = 1e6;
const MAX_PLASMA_TEMPERATURE: f64 = 5e8;

/// The scalar quantities the time loop integrates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dynamics {
    time: f64,
    temperature: f64,
    tritium_inventory: f64,
    deuterium_inventory: f64,
    material_damage: f64,
}

impl Dynamics {
    fn initial(config: &ReactorConfiguration) -> Self {
        Self {
            time: 0.0,
            temperature: config.initial_temperature,
            tritium_inventory: config.initial_tritium_inventory,
            deuterium_inventory: config.initial_deuterium_inventory,
            material_damage: 0.0,
        }
    }
}

/// Time-stepping 0-D model of one reactor configuration.
///
/// The engine owns its configuration (never mutated) and an append-only history of saved
/// snapshots. Construction validates the configuration and resolves both material
/// identifiers, so a constructed engine cannot hit an invalid physics input mid-run.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: ReactorConfiguration,
    settings: SimulationSettings,
    first_wall: Material,
    blanket: Material,
    geometry: TokamakGeometry,
    lithium_density: f64,
    history: Vec<ReactorState>,
}

impl SimulationEngine {
    pub fn new(
        config: ReactorConfiguration,
        catalog: &MaterialCatalog,
        settings: SimulationSettings,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let first_wall = catalog.lookup(&config.first_wall_material)?.clone();
        let blanket = catalog.lookup(&config.blanket_material)?.clone();
        let geometry = TokamakGeometry::new(
            config.major_radius,
            config.minor_radius,
            config.elongation,
            config.triangularity,
        )?;
        let lithium_density = if blanket.breeds_tritium() {
            lithium_atom_density(blanket.density)
        } else {
            lithium_atom_density(NATURAL_LITHIUM_DENSITY)
        };

        Ok(Self {
            config,
            settings,
            first_wall,
            blanket,
            geometry,
            lithium_density,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &ReactorConfiguration {
        &self.config
    }

    pub fn first_wall(&self) -> &Material {
        &self.first_wall
    }

    pub fn blanket(&self) -> &Material {
        &self.blanket
    }

    /// Saved snapshots of the most recent run, in time order.
    pub fn history(&self) -> &[ReactorState] {
        &self.history
    }

    /// Statistics of the most recent run; `None` before the first run.
    pub fn statistics(&self) -> Option<OperationStatistics> {
        OperationStatistics::from_history(&self.history, self.first_wall.max_dpa)
    }

    /// Runs from the initial configuration to `max_time` or the first failure and returns
    /// the final snapshot. Any previous history is discarded.
    pub fn run(&mut self, max_time: f64, dt: f64) -> Result<ReactorState, EngineError> {
        self.run_with_progress(max_time, dt, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "simulation_run", fields(max_time = max_time, dt = dt))]
    pub fn run_with_progress(
        &mut self,
        max_time: f64,
        dt: f64,
        reporter: &ProgressReporter,
    ) -> Result<ReactorState, EngineError> {
        validate_run_parameters(max_time, dt)?;
        self.history.clear();

        let total_steps = (max_time / dt).ceil() as u64;
        reporter.report(Progress::TaskStart { total_steps });

        let mut dynamics = Dynamics::initial(&self.config);
        let mut step: u64 = 0;
        let mut last_saved = f64::NEG_INFINITY;
        let mut range_warning_logged = false;

        let final_state = loop {
            let state = self.observe(&dynamics)?;

            if !range_warning_logged {
                if let Some(Advisory::OutOfRange(warning)) = state
                    .advisories
                    .iter()
                    .find(|a| matches!(a, Advisory::OutOfRange(_)))
                {
                    warn!(time = state.time, %warning, "Empirical fit evaluated outside its valid range.");
                    range_warning_logged = true;
                }
            }

            let finished = state.is_failed() || dynamics.time >= max_time;
            if finished || state.time - last_saved >= self.settings.save_interval {
                last_saved = state.time;
                self.history.push(state.clone());
            }
            if finished {
                break state;
            }

            step += 1;
            let next_time = if step as f64 * dt >= max_time {
                max_time
            } else {
                step as f64 * dt
            };
            dynamics = self.advance(&dynamics, &state, next_time - dynamics.time, next_time);
            reporter.report(Progress::TaskIncrement);
        };
        reporter.report(Progress::TaskFinish);

        match final_state.status {
            OperationalStatus::Failed { cause, time } => {
                info!(%cause, time, snapshots = self.history.len(), "Simulation ended in failure.");
            }
            OperationalStatus::Operating => {
                info!(
                    time = final_state.time,
                    snapshots = self.history.len(),
                    "Simulation reached its time horizon."
                );
            }
        }
        Ok(final_state)
    }

    /// Derives the full instantaneous state from the integrated scalars.
    fn observe(&self, dynamics: &Dynamics) -> Result<ReactorState, EngineError> {
        let config = &self.config;
        let volume = self.geometry.plasma_volume;
        let density = config.initial_density;
        let temperature = dynamics.temperature;
        let temperature_kev = kelvin_to_kev(temperature);

        let resistance = plasma_resistance(
            config.major_radius,
            config.minor_radius,
            temperature,
            density,
        );
        let ohmic = ohmic_heating(config.plasma_current, resistance);
        let confinement = confinement_time(&ConfinementInputs {
            major_radius: config.major_radius,
            minor_radius: config.minor_radius,
            elongation: config.elongation,
            density,
            toroidal_field: config.toroidal_field,
            plasma_current: config.plasma_current,
            external_heating_mw: config.external_heating() / 1e6,
            ohmic_heating_mw: ohmic / 1e6,
        })?;

        let fusion = fusion_power_density(density, temperature_kev);
        let radiation = radiated_power(density, temperature_kev, config.toroidal_field, Z_EFF);
        let lawson = lawson_criterion(density, confinement, temperature_kev);
        let magnetic = magnetic_state(
            config.toroidal_field,
            config.plasma_current,
            config.major_radius,
            config.minor_radius,
            density,
            temperature,
        )?;

        let fusion_power = fusion.value * volume;
        let power = power_balance(
            fusion_power,
            config.effective_input_power(),
            radiation.total * volume,
        );
        let neutronics = neutronics_state(
            fusion_power,
            self.geometry.surface_area,
            self.lithium_density,
            config.blanket_thickness,
        );
        let wall_temperature =
            first_wall_temperature(neutronics.wall_loading, self.first_wall.thermal_conductivity);

        let observation = Observation {
            time: dynamics.time,
            first_wall_temperature: wall_temperature,
            max_wall_temperature: self.first_wall.max_operating_temp,
            material_damage: dynamics.material_damage,
            max_dpa: self.first_wall.max_dpa,
            tritium_inventory: dynamics.tritium_inventory,
            min_tritium_inventory: config.min_tritium_inventory,
            deuterium_inventory: dynamics.deuterium_inventory,
            meets_lawson: lawson.met,
            n_tau: lawson.n_tau,
            safety_factor: magnetic.safety_factor,
            beta: magnetic.beta,
            tritium_breeding_ratio: neutronics.tritium_breeding_ratio,
        };
        let assessment = failure::assess(&observation, &self.settings.thresholds);

        let mut advisories: Vec<Advisory> =
            fusion.warning.map(Advisory::OutOfRange).into_iter().collect();
        advisories.extend(assessment.advisories);

        let status = match assessment.failure {
            Some(cause) => OperationalStatus::Failed {
                cause,
                time: dynamics.time,
            },
            None => OperationalStatus::Operating,
        };

        Ok(ReactorState {
            time: dynamics.time,
            plasma: PlasmaState {
                temperature,
                temperature_kev,
                density,
                confinement_time: confinement,
                n_tau: lawson.n_tau,
                triple_product: triple_product(density, confinement, temperature),
                meets_lawson: lawson.met,
                fusion_power_density: fusion.value,
                radiation,
                ohmic_heating: ohmic,
            },
            geometry: self.geometry,
            magnetic,
            power,
            neutronics,
            material_damage: dynamics.material_damage,
            first_wall_temperature: wall_temperature,
            fuel: FuelState {
                tritium_inventory: dynamics.tritium_inventory,
                deuterium_inventory: dynamics.deuterium_inventory,
            },
            status,
            advisories,
        })
    }

    /// Integrates the accumulators over `dt` with the rates of `state` (explicit Euler).
    fn advance(&self, dynamics: &Dynamics, state: &ReactorState, dt: f64, next_time: f64) -> Dynamics {
        let volume = self.geometry.plasma_volume;
        let heat_capacity = state.plasma.density * volume * BOLTZMANN;
        let net_heating = state.power.fusion_power + state.power.input_power
            - state.plasma.radiation.total * volume;
        let temperature = if heat_capacity > 0.0 {
            (dynamics.temperature + net_heating / heat_capacity * dt)
                .clamp(MIN_PLASMA_TEMPERATURE, MAX_PLASMA_TEMPERATURE)
        } else {
            dynamics.temperature
        };

        let consumption = state.neutronics.tritium_consumption_rate;
        let production = state.neutronics.tritium_production_rate;
        let next = Dynamics {
            time: next_time,
            temperature,
            tritium_inventory: (dynamics.tritium_inventory + (production - consumption) * dt)
                .max(0.0),
            deuterium_inventory: (dynamics.deuterium_inventory - consumption * dt).max(0.0),
            material_damage: dynamics.material_damage + state.neutronics.dpa_rate * dt,
        };
        trace!(
            time = next.time,
            temperature = next.temperature,
            damage = next.material_damage,
            "Advanced reactor state."
        );
        next
    }
}

fn validate_run_parameters(max_time: f64, dt: f64) -> Result<(), EngineError> {
    let reason = if !(max_time.is_finite() && max_time > 0.0) {
        Some("max_time must be positive and finite")
    } else if !(dt.is_finite() && dt > 0.0) {
        Some("dt must be positive and finite")
    } else if dt > max_time {
        Some("dt must not exceed max_time")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(EngineError::InvalidRunParameters {
            max_time,
            dt,
            reason,
        }),
        None => Ok(()),
    }
}
