use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParamError {
    #[error("Parameter '{name}' must be a finite positive number (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Parameter '{name}' must lie in [{min}, {max}) (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Physical constants driving the solver.
///
/// Distances are expressed in the solver's model units: radial groups of a VSEPR molecule sit
/// `bonded_pair_distance` or `lone_pair_distance` away from the central atom, while real
/// molecules use their experimental bond lengths in Ångström.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Ideal distance of a bonded atom from the central atom.
    pub bonded_pair_distance: f64,
    /// Ideal distance of a lone pair from its parent atom.
    pub lone_pair_distance: f64,
    /// Numerator of the inverse-square repulsion between radial groups.
    pub electron_pair_repulsion_scale: f64,
    /// Gain of the velocity impulse pulling groups toward the matched ideal orientation.
    pub attraction_strength: f64,
    /// Gain of the pairwise angular springs around the central atom.
    pub angle_repulsion_scale: f64,
    /// Fraction of velocity lost per reference frame (0.017 s).
    pub damping_factor: f64,
    /// Rate of the exponential approach of a group's radius to its bond length.
    pub distance_attraction_rate: f64,
    /// Rate of the positional nudge applied to lone pairs around a non-central atom.
    pub terminal_attraction_rate: f64,
    /// Lower bound on separations entering `1/r^2`.
    pub min_separation: f64,
    /// Upper bound on the time step of a single tick.
    pub max_time_step: f64,
    /// Replaces `bonded_pair_distance` as the maximum bond length reported to callers.
    pub max_bond_length_override: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            bonded_pair_distance: 10.0,
            lone_pair_distance: 7.0,
            electron_pair_repulsion_scale: 30_000.0,
            attraction_strength: 3.0,
            angle_repulsion_scale: 3.0,
            damping_factor: 0.1,
            distance_attraction_rate: 10.0,
            terminal_attraction_rate: 20.0,
            min_separation: 1e-3,
            max_time_step: 0.2,
            max_bond_length_override: None,
        }
    }
}

impl PhysicsConfig {
    pub fn builder() -> PhysicsConfigBuilder {
        PhysicsConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        let positive = [
            ("bonded_pair_distance", self.bonded_pair_distance),
            ("lone_pair_distance", self.lone_pair_distance),
            (
                "electron_pair_repulsion_scale",
                self.electron_pair_repulsion_scale,
            ),
            ("attraction_strength", self.attraction_strength),
            ("angle_repulsion_scale", self.angle_repulsion_scale),
            ("distance_attraction_rate", self.distance_attraction_rate),
            ("terminal_attraction_rate", self.terminal_attraction_rate),
            ("min_separation", self.min_separation),
            ("max_time_step", self.max_time_step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamError::NotPositive { name, value });
            }
        }
        if let Some(value) = self.max_bond_length_override {
            if !(value.is_finite() && value > 0.0) {
                return Err(ParamError::NotPositive {
                    name: "max_bond_length_override",
                    value,
                });
            }
        }
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(ParamError::OutOfRange {
                name: "damping_factor",
                value: self.damping_factor,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }

    /// Maximum bond length a VSEPR molecule reports: the override when set, otherwise the
    /// bonded-pair distance.
    pub fn maximum_bond_length(&self) -> f64 {
        self.max_bond_length_override
            .unwrap_or(self.bonded_pair_distance)
    }
}

/// Builds a [`PhysicsConfig`] starting from the defaults; [`build`](Self::build) validates.
#[derive(Debug, Clone, Default)]
pub struct PhysicsConfigBuilder {
    config: PhysicsConfig,
}

impl PhysicsConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bonded_pair_distance(mut self, distance: f64) -> Self {
        self.config.bonded_pair_distance = distance;
        self
    }
    pub fn lone_pair_distance(mut self, distance: f64) -> Self {
        self.config.lone_pair_distance = distance;
        self
    }
    pub fn electron_pair_repulsion_scale(mut self, scale: f64) -> Self {
        self.config.electron_pair_repulsion_scale = scale;
        self
    }
    pub fn attraction_strength(mut self, strength: f64) -> Self {
        self.config.attraction_strength = strength;
        self
    }
    pub fn angle_repulsion_scale(mut self, scale: f64) -> Self {
        self.config.angle_repulsion_scale = scale;
        self
    }
    pub fn damping_factor(mut self, factor: f64) -> Self {
        self.config.damping_factor = factor;
        self
    }
    pub fn distance_attraction_rate(mut self, rate: f64) -> Self {
        self.config.distance_attraction_rate = rate;
        self
    }
    pub fn terminal_attraction_rate(mut self, rate: f64) -> Self {
        self.config.terminal_attraction_rate = rate;
        self
    }
    pub fn min_separation(mut self, separation: f64) -> Self {
        self.config.min_separation = separation;
        self
    }
    pub fn max_time_step(mut self, dt: f64) -> Self {
        self.config.max_time_step = dt;
        self
    }
    pub fn max_bond_length_override(mut self, length: Option<f64>) -> Self {
        self.config.max_bond_length_override = length;
        self
    }

    pub fn build(self) -> Result<PhysicsConfig, ParamError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
