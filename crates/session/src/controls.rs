use simulation::SimulationParams;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Idle,
    /// A request is in flight; the button is disabled.
    Busy,
}

/// Enabled state of the parameter inputs and the simulate button.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub simulate: ButtonState,
    pub slope_input_enabled: bool,
    /// Wind speed, wind bearing and the accumulate toggle.
    pub wind_inputs_enabled: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            simulate: ButtonState::Idle,
            slope_input_enabled: true,
            wind_inputs_enabled: true,
        }
    }
}

impl ControlState {
    /// Forecast wind replaces the fixed wind inputs.
    pub fn apply_weather_toggle(&mut self, use_meteo: bool) {
        self.wind_inputs_enabled = !use_meteo;
    }

    /// Disables every input that a derived source overrides.
    pub fn apply_derived_inputs(&mut self, params: &SimulationParams) {
        self.slope_input_enabled = !params.use_dem;
        self.apply_weather_toggle(params.use_meteo);
    }

    pub fn is_busy(&self) -> bool {
        self.simulate == ButtonState::Busy
    }
}
