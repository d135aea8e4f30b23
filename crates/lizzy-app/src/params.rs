//! Simulation parameters (spec §3): viscosity, write-out cadence, fill
//! tolerance, and the sensor-triggered-stop flag.

use lizzy_core::Real;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
pub struct SimulationParameters {
    /// Resin viscosity, Pa*s. Must be positive.
    pub viscosity: Real,
    /// Write-out cadence, s. -1 means "every step".
    pub wo_delta_time: Real,
    /// Fill-tolerance epsilon used to classify a CV as wet
    /// (`f >= 1 - fill_tolerance`). Must be in (0, 0.5).
    pub fill_tolerance: Real,
    /// If true, a sensor's first-wet trigger ends the current
    /// `solve`/`solve_time_interval` call.
    pub end_step_when_sensor_triggered: bool,
}

impl SimulationParameters {
    pub fn new(
        viscosity: Real,
        wo_delta_time: Real,
        fill_tolerance: Real,
        end_step_when_sensor_triggered: bool,
    ) -> AppResult<Self> {
        if !(viscosity > 0.0) {
            return Err(AppError::InvalidParameter {
                what: "viscosity",
                reason: "must be positive",
            });
        }
        if !(wo_delta_time > 0.0 || wo_delta_time == -1.0) {
            return Err(AppError::InvalidParameter {
                what: "wo_delta_time",
                reason: "must be > 0, or exactly -1 for every-step write-out",
            });
        }
        if !(fill_tolerance > 0.0 && fill_tolerance < 0.5) {
            return Err(AppError::InvalidParameter {
                what: "fill_tolerance",
                reason: "must be in (0, 0.5)",
            });
        }
        Ok(Self {
            viscosity,
            wo_delta_time,
            fill_tolerance,
            end_step_when_sensor_triggered,
        })
    }
}
