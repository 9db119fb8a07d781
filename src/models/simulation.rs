use std::collections::BTreeMap;

// ─── Operating parameters ────────────────────────────────────────────────────

/// Operating parameters of the collector loop for one step.
/// All temperatures are °C.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// Collector area (m²)
    pub panel_area: f64,
    /// Plate efficiency factor F′ [0..1]
    pub panel_efficiency: f64,
    /// Cloud cover (%), not clamped
    pub cloud_cover: f64,
    /// Fluid specific heat (J/(kg·K))
    pub fluid_specific_heat: f64,
    /// Fluid density (kg/m³)
    pub fluid_density: f64,
    /// Cover plate transmittance [0..1]
    pub transmittance: f64,
    /// Plate absorptance [0..1]
    pub absorptance: f64,
    /// Overall heat loss coefficient U_L (W/(m²·K))
    pub heat_loss_coefficient: f64,
    /// Pump shaft power (W)
    pub pump_power: f64,
    /// Hydraulic head (m)
    pub hydraulic_head: f64,
    /// Pump efficiency [0..1]
    pub pump_efficiency: f64,
    /// Storage tank volume (m³)
    pub tank_volume: f64,
    /// Explicit step length (s)
    pub time_step_seconds: f64,
    /// Replaces the diurnal ambient model when set
    pub fixed_ambient_temp: Option<f64>,
    pub min_ambient_temp: f64,
    pub max_ambient_temp: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            panel_area: 2.0,
            panel_efficiency: 0.15,
            cloud_cover: 0.0,
            fluid_specific_heat: 4186.0,
            fluid_density: 1000.0,
            transmittance: 0.9,
            absorptance: 0.95,
            heat_loss_coefficient: 8.0,
            pump_power: 50.0,
            hydraulic_head: 5.0,
            pump_efficiency: 0.7,
            tank_volume: 1000.0,
            time_step_seconds: 3600.0,
            fixed_ambient_temp: None,
            min_ambient_temp: 10.0,
            max_ambient_temp: 20.0,
        }
    }
}

impl SimulationParameters {
    /// Returns a new snapshot with every field set in `change` replacing
    /// the current value. `self` is left untouched.
    pub fn with_override(&self, change: &ParameterOverride) -> Self {
        let mut next = self.clone();
        macro_rules! patch {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = change.$field { next.$field = v; } )*
            };
        }
        patch!(
            panel_area,
            panel_efficiency,
            cloud_cover,
            fluid_specific_heat,
            fluid_density,
            transmittance,
            absorptance,
            heat_loss_coefficient,
            pump_power,
            hydraulic_head,
            pump_efficiency,
            tank_volume,
            time_step_seconds,
            min_ambient_temp,
            max_ambient_temp,
        );
        if let Some(fixed) = change.fixed_ambient_temp {
            next.fixed_ambient_temp = fixed;
        }
        next
    }
}

// ─── Scheduled changes ───────────────────────────────────────────────────────

/// Partial parameter edit applied at the start of one step.
///
/// `fixed_ambient_temp` is doubly optional: `Some(None)` switches back to the
/// diurnal ambient model. `fluid_temp` / `tank_temp` hard-reset the carried
/// state instead of patching a parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterOverride {
    pub panel_area: Option<f64>,
    pub panel_efficiency: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub fluid_specific_heat: Option<f64>,
    pub fluid_density: Option<f64>,
    pub transmittance: Option<f64>,
    pub absorptance: Option<f64>,
    pub heat_loss_coefficient: Option<f64>,
    pub pump_power: Option<f64>,
    pub hydraulic_head: Option<f64>,
    pub pump_efficiency: Option<f64>,
    pub tank_volume: Option<f64>,
    pub time_step_seconds: Option<f64>,
    pub fixed_ambient_temp: Option<Option<f64>>,
    pub min_ambient_temp: Option<f64>,
    pub max_ambient_temp: Option<f64>,
    pub fluid_temp: Option<f64>,
    pub tank_temp: Option<f64>,
}

impl ParameterOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Step index → override. Ordered so logging follows the timeline.
pub type Schedule = BTreeMap<u32, ParameterOverride>;

// ─── Carried state ───────────────────────────────────────────────────────────

/// The only values carried from one step to the next (°C).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub fluid_temp: f64,
    pub plate_temp: f64,
    pub tank_temp: f64,
}

impl SimulationState {
    /// Fresh start: the plate begins at the fluid temperature.
    pub fn initial(fluid_temp: f64, tank_temp: f64) -> Self {
        Self { fluid_temp, plate_temp: fluid_temp, tank_temp }
    }
}

/// Everything needed to run (or resume) one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub parameters: SimulationParameters,
    /// Hour of day at step 0
    pub initial_hour: f64,
    /// Total number of steps; the last processed step is `duration - 1`
    pub duration: u32,
    pub initial_fluid_temp: f64,
    pub initial_tank_temp: f64,
    /// Carried state to continue from instead of the initial temperatures
    pub resume_from: Option<SimulationState>,
}

impl SimulationRun {
    pub fn new(parameters: SimulationParameters, duration: u32) -> Self {
        Self {
            parameters,
            initial_hour: 0.0,
            duration,
            initial_fluid_temp: 20.0,
            initial_tank_temp: 20.0,
            resume_from: None,
        }
    }

    pub fn starting_state(&self) -> SimulationState {
        self.resume_from
            .unwrap_or_else(|| SimulationState::initial(self.initial_fluid_temp, self.initial_tank_temp))
    }
}

// ─── Per-stage outputs ───────────────────────────────────────────────────────

/// Collector energy balance for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorGain {
    /// Useful gain per unit area q_u (MJ/(m²·h)); negative when the plate loses heat
    pub useful_gain_per_area: f64,
    /// Heat removal factor F_R
    pub heat_removal_factor: f64,
    /// Collector flow factor F″
    pub flow_factor: f64,
}

/// Mean fluid and plate temperatures after the collector stage (°C).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorTemperatures {
    pub fluid_temp: f64,
    pub plate_temp: f64,
}

/// One simulated step, all temperatures °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub step: u32,
    pub fluid_temp: f64,
    pub plate_temp: f64,
    pub tank_temp: f64,
    pub ambient_temp: f64,
}
