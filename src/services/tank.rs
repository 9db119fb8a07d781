use crate::error::{require_positive, SimulationError};
use crate::services::collector::mass_flow_rate;

/// Pump settings driving the tank-side flow.
///
/// Kept apart from the collector parameters so the tank loop could be sized
/// with a different pump; today both stages are fed the same values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpSettings {
    pub power: f64,
    pub efficiency: f64,
    pub hydraulic_head: f64,
}

/// Fully mixed storage tank fed by the collector loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankProperties {
    /// m³
    pub volume: f64,
    /// J/(kg·K)
    pub specific_heat: f64,
    /// kg/m³
    pub density: f64,
}

impl TankProperties {
    /// Heat needed to raise the whole tank by 1 °C (J/°C).
    pub fn thermal_capacity(&self) -> Result<f64, SimulationError> {
        require_positive("tank_volume", self.volume)?;
        require_positive("fluid_specific_heat", self.specific_heat)?;
        require_positive("fluid_density", self.density)?;
        Ok(self.volume * self.density * self.specific_heat)
    }

    /// Fraction of the fluid-tank gap closed in one explicit step.
    /// Above 1 the update overshoots the fluid temperature.
    pub fn step_fraction(&self, pump: &PumpSettings, time_step: f64) -> Result<f64, SimulationError> {
        let mass_flow = mass_flow_rate(pump.power, pump.efficiency, pump.hydraulic_head, self.density)?;
        Ok(mass_flow * time_step / (self.volume * self.density))
    }
}

/// Tank temperature after one explicit step of `time_step` seconds.
///
/// Heat moves at `ṁ·c_p·(T_fluid − T_tank)`, so a tank warmer than the
/// fluid cools down, and equal temperatures leave it unchanged.
pub fn update_tank(
    fluid_temp: f64,
    tank_temp: f64,
    tank: &TankProperties,
    pump: &PumpSettings,
    time_step: f64,
) -> Result<f64, SimulationError> {
    let mass_flow = mass_flow_rate(pump.power, pump.efficiency, pump.hydraulic_head, tank.density)?;
    let capacity = tank.thermal_capacity()?;

    let heat_rate = mass_flow * tank.specific_heat * (fluid_temp - tank_temp); // W
    Ok(tank_temp + heat_rate * time_step / capacity)
}
