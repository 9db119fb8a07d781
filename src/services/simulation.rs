//! Hour-by-hour stepping loop for the collector → fluid → tank chain.

use std::f64::consts::PI;

use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::models::simulation::{
    Schedule, SimulationParameters, SimulationRun, SimulationState, StepResult,
};
use crate::services::collector::{collector_gain, update_fluid};
use crate::services::tank::{update_tank, PumpSettings, TankProperties};

const HOURS_PER_DAY: f64 = 24.0;
/// Hour at which the diurnal ambient curve crosses its midpoint going up.
const AMBIENT_PHASE_HOUR: f64 = 6.0;

/// Ambient temperature at `hour` (°C).
///
/// A fixed temperature wins; otherwise a sine between min and max, rising
/// through the midpoint at 06:00 and peaking at 12:00.
pub fn ambient_temperature(hour: f64, params: &SimulationParameters) -> f64 {
    if let Some(fixed) = params.fixed_ambient_temp {
        return fixed;
    }
    let amplitude = (params.max_ambient_temp - params.min_ambient_temp) / 2.0;
    let midpoint = (params.max_ambient_temp + params.min_ambient_temp) / 2.0;
    midpoint + amplitude * ((hour - AMBIENT_PHASE_HOUR) * PI / 12.0).sin()
}

/// Runs steps `start_step..run.duration` and returns one result per step.
///
/// Parameters are an immutable snapshot per step: each scheduled change is
/// folded onto the previous snapshot and stays in force afterwards. Changes
/// scheduled before `start_step` are folded in up front so a resumed run
/// sees the same parameters an uninterrupted run had at that point.
///
/// The first failing step aborts the run; no partial results are returned.
pub fn simulate(
    run: &SimulationRun,
    schedule: &Schedule,
    start_step: u32,
) -> Result<Vec<StepResult>, SimulationError> {
    if start_step > run.duration {
        return Err(SimulationError::InvalidTimeline { start_step, duration: run.duration });
    }

    debug!(
        duration = run.duration,
        start_step,
        scheduled_changes = schedule.len(),
        resumed = run.resume_from.is_some(),
        "starting thermal simulation"
    );

    let mut params = schedule
        .range(..start_step)
        .fold(run.parameters.clone(), |acc, (_, change)| acc.with_override(change));
    let mut state = run.starting_state();
    let mut results = Vec::new();
    let mut warned_unstable = false;

    for step in start_step..run.duration {
        if let Some(change) = schedule.get(&step).filter(|c| !c.is_empty()) {
            params = params.with_override(change);
            if let Some(fluid_temp) = change.fluid_temp {
                state.fluid_temp = fluid_temp;
                state.plate_temp = fluid_temp;
            }
            if let Some(tank_temp) = change.tank_temp {
                state.tank_temp = tank_temp;
            }
            info!(step, "applied scheduled parameter change");
        }

        let tank = TankProperties {
            volume: params.tank_volume,
            specific_heat: params.fluid_specific_heat,
            density: params.fluid_density,
        };
        let pump = PumpSettings {
            power: params.pump_power,
            efficiency: params.pump_efficiency,
            hydraulic_head: params.hydraulic_head,
        };

        if !warned_unstable {
            let fraction = tank.step_fraction(&pump, params.time_step_seconds)?;
            if fraction > 1.0 {
                warn!(
                    step,
                    fraction,
                    "tank step overshoots the fluid temperature; results will oscillate"
                );
                warned_unstable = true;
            }
        }

        let result = advance(step, run.initial_hour, &params, &tank, &pump, &mut state)?;

        #[cfg(feature = "verbose_log")]
        tracing::trace!(
            step = result.step,
            fluid = result.fluid_temp,
            plate = result.plate_temp,
            tank = result.tank_temp,
            ambient = result.ambient_temp,
            "step"
        );

        results.push(result);
    }

    Ok(results)
}

/// One step of the chain; updates `state` in place.
fn advance(
    step: u32,
    initial_hour: f64,
    params: &SimulationParameters,
    tank: &TankProperties,
    pump: &PumpSettings,
    state: &mut SimulationState,
) -> Result<StepResult, SimulationError> {
    let hour = (initial_hour + f64::from(step)).rem_euclid(HOURS_PER_DAY);
    let ambient_temp = ambient_temperature(hour, params);

    let gain = collector_gain(hour, params, ambient_temp, state.plate_temp, None)?;
    let collector = update_fluid(&gain, state.fluid_temp, params.heat_loss_coefficient)?;
    state.fluid_temp = collector.fluid_temp;
    state.plate_temp = collector.plate_temp;

    state.tank_temp = update_tank(
        state.fluid_temp,
        state.tank_temp,
        tank,
        pump,
        params.time_step_seconds,
    )?;

    Ok(StepResult {
        step,
        fluid_temp: state.fluid_temp,
        plate_temp: state.plate_temp,
        tank_temp: state.tank_temp,
        ambient_temp,
    })
}
