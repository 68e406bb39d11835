use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        reason: &'static str,
    },
}

pub const DEFAULT_SETTLE_SPEED: f64 = 1e-3;
pub const DEFAULT_SETTLE_TICKS: usize = 30;

/// Settings of the relaxation workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxConfig {
    /// Simulated seconds per tick.
    pub time_step: f64,
    /// Simulated seconds after which relaxation stops even if the molecule still moves.
    pub max_time: f64,
    /// Fastest group speed, in model units per second, still considered at rest.
    pub settle_speed: f64,
    /// Consecutive ticks at rest required before the molecule counts as settled.
    pub settle_ticks: usize,
}

impl RelaxConfig {
    pub fn max_ticks(&self) -> usize {
        self.ticks_for(self.time_step)
    }

    /// Ticks needed to cover `max_time` when each tick actually advances `dt` seconds.
    pub fn ticks_for(&self, dt: f64) -> usize {
        (self.max_time / dt).ceil() as usize
    }
}

#[derive(Default)]
pub struct RelaxConfigBuilder {
    time_step: Option<f64>,
    max_time: Option<f64>,
    settle_speed: Option<f64>,
    settle_ticks: Option<usize>,
}

impl RelaxConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }
    pub fn max_time(mut self, seconds: f64) -> Self {
        self.max_time = Some(seconds);
        self
    }
    pub fn settle_speed(mut self, speed: f64) -> Self {
        self.settle_speed = Some(speed);
        self
    }
    pub fn settle_ticks(mut self, ticks: usize) -> Self {
        self.settle_ticks = Some(ticks);
        self
    }

    pub fn build(self) -> Result<RelaxConfig, ConfigError> {
        let time_step = self
            .time_step
            .ok_or(ConfigError::MissingParameter("time_step"))?;
        let max_time = self
            .max_time
            .ok_or(ConfigError::MissingParameter("max_time"))?;
        let settle_speed = self.settle_speed.unwrap_or(DEFAULT_SETTLE_SPEED);
        let settle_ticks = self.settle_ticks.unwrap_or(DEFAULT_SETTLE_TICKS);

        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "time_step",
                reason: "must be a finite positive number",
            });
        }
        if !(max_time.is_finite() && max_time >= time_step) {
            return Err(ConfigError::InvalidValue {
                name: "max_time",
                reason: "must be finite and at least one time step",
            });
        }
        if !(settle_speed.is_finite() && settle_speed >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "settle_speed",
                reason: "must be a finite non-negative number",
            });
        }
        if settle_ticks == 0 {
            return Err(ConfigError::InvalidValue {
                name: "settle_ticks",
                reason: "must be at least 1",
            });
        }

        Ok(RelaxConfig {
            time_step,
            max_time,
            settle_speed,
            settle_ticks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_defaults_for_optional_parameters() {
        let config = RelaxConfigBuilder::new()
            .time_step(0.02)
            .max_time(5.0)
            .build()
            .unwrap();
        assert_eq!(config.settle_speed, DEFAULT_SETTLE_SPEED);
        assert_eq!(config.settle_ticks, DEFAULT_SETTLE_TICKS);
        assert_eq!(config.max_ticks(), 250);
    }

    #[test]
    fn build_reports_missing_parameters() {
        let result = RelaxConfigBuilder::new().max_time(1.0).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("time_step")));
        let result = RelaxConfigBuilder::new().time_step(0.1).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("max_time")));
    }

    #[test]
    fn build_rejects_invalid_values() {
        let base = || RelaxConfigBuilder::new().time_step(0.1).max_time(1.0);
        assert!(matches!(
            RelaxConfigBuilder::new().time_step(-0.1).max_time(1.0).build(),
            Err(ConfigError::InvalidValue { name: "time_step", .. })
        ));
        assert!(matches!(
            RelaxConfigBuilder::new().time_step(0.1).max_time(0.05).build(),
            Err(ConfigError::InvalidValue { name: "max_time", .. })
        ));
        assert!(matches!(
            base().settle_speed(f64::NAN).build(),
            Err(ConfigError::InvalidValue { name: "settle_speed", .. })
        ));
        assert!(matches!(
            base().settle_ticks(0).build(),
            Err(ConfigError::InvalidValue { name: "settle_ticks", .. })
        ));
    }

    #[test]
    fn max_ticks_rounds_up() {
        let config = RelaxConfigBuilder::new()
            .time_step(0.3)
            .max_time(1.0)
            .build()
            .unwrap();
        assert_eq!(config.max_ticks(), 4);
    }

    #[test]
    fn ticks_for_uses_the_step_actually_taken() {
        let config = RelaxConfigBuilder::new()
            .time_step(1.0)
            .max_time(10.0)
            .build()
            .unwrap();
        assert_eq!(config.max_ticks(), 10);
        assert_eq!(config.ticks_for(0.2), 50);
    }
}
