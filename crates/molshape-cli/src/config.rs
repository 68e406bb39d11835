use crate::cli::{RunOptions, TimingArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use molshape::core::physics::params::PhysicsConfig;
use molshape::engine::config::{RelaxConfig, RelaxConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;
const DEFAULT_MAX_TIME: f64 = 10.0;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPhysicsConfig {
    bonded_pair_distance: Option<f64>,
    lone_pair_distance: Option<f64>,
    electron_pair_repulsion_scale: Option<f64>,
    attraction_strength: Option<f64>,
    angle_repulsion_scale: Option<f64>,
    damping_factor: Option<f64>,
    distance_attraction_rate: Option<f64>,
    terminal_attraction_rate: Option<f64>,
    min_separation: Option<f64>,
    max_time_step: Option<f64>,
    max_bond_length: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRelaxationConfig {
    time_step: Option<f64>,
    max_time: Option<f64>,
    settle_speed: Option<f64>,
    settle_ticks: Option<usize>,
}

/// Settings read from a TOML file, every value optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    physics: Option<PartialPhysicsConfig>,
    relaxation: Option<PartialRelaxationConfig>,
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub physics: PhysicsConfig,
    pub relax: RelaxConfig,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file named by `--config`, or starts empty.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Merges file values, `-S` overrides and command flags, in increasing precedence, over
    /// the library defaults.
    pub fn merge_with_cli(mut self, options: &RunOptions, timing: &TimingArgs) -> Result<RunConfig> {
        self.apply_set_values(&options.set_values)?;

        let physics = Self::merge_physics(self.physics.unwrap_or_default())?;

        let relaxation = self.relaxation.unwrap_or_default();
        let mut builder = RelaxConfigBuilder::new()
            .time_step(
                timing
                    .dt
                    .or(relaxation.time_step)
                    .unwrap_or(DEFAULT_TIME_STEP),
            )
            .max_time(
                timing
                    .time
                    .or(relaxation.max_time)
                    .unwrap_or(DEFAULT_MAX_TIME),
            );
        if let Some(speed) = relaxation.settle_speed {
            builder = builder.settle_speed(speed);
        }
        if let Some(ticks) = relaxation.settle_ticks {
            builder = builder.settle_ticks(ticks);
        }
        let relax = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RunConfig { physics, relax })
    }

    fn merge_physics(partial: PartialPhysicsConfig) -> Result<PhysicsConfig> {
        let defaults = PhysicsConfig::default();
        let mut builder = PhysicsConfig::builder()
            .bonded_pair_distance(
                partial
                    .bonded_pair_distance
                    .unwrap_or(defaults.bonded_pair_distance),
            )
            .lone_pair_distance(
                partial
                    .lone_pair_distance
                    .unwrap_or(defaults.lone_pair_distance),
            )
            .electron_pair_repulsion_scale(
                partial
                    .electron_pair_repulsion_scale
                    .unwrap_or(defaults.electron_pair_repulsion_scale),
            )
            .attraction_strength(
                partial
                    .attraction_strength
                    .unwrap_or(defaults.attraction_strength),
            )
            .angle_repulsion_scale(
                partial
                    .angle_repulsion_scale
                    .unwrap_or(defaults.angle_repulsion_scale),
            )
            .damping_factor(partial.damping_factor.unwrap_or(defaults.damping_factor))
            .distance_attraction_rate(
                partial
                    .distance_attraction_rate
                    .unwrap_or(defaults.distance_attraction_rate),
            )
            .terminal_attraction_rate(
                partial
                    .terminal_attraction_rate
                    .unwrap_or(defaults.terminal_attraction_rate),
            )
            .min_separation(partial.min_separation.unwrap_or(defaults.min_separation))
            .max_time_step(partial.max_time_step.unwrap_or(defaults.max_time_step));
        if partial.max_bond_length.is_some() {
            builder = builder.max_bond_length_override(partial.max_bond_length);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = parser::parse_key_value(kv_pair)?;

            if let Some(field) = key.strip_prefix("physics.") {
                let physics = self.physics.get_or_insert_with(Default::default);
                let slot = match field {
                    "bonded-pair-distance" => &mut physics.bonded_pair_distance,
                    "lone-pair-distance" => &mut physics.lone_pair_distance,
                    "electron-pair-repulsion-scale" => &mut physics.electron_pair_repulsion_scale,
                    "attraction-strength" => &mut physics.attraction_strength,
                    "angle-repulsion-scale" => &mut physics.angle_repulsion_scale,
                    "damping-factor" => &mut physics.damping_factor,
                    "distance-attraction-rate" => &mut physics.distance_attraction_rate,
                    "terminal-attraction-rate" => &mut physics.terminal_attraction_rate,
                    "min-separation" => &mut physics.min_separation,
                    "max-time-step" => &mut physics.max_time_step,
                    "max-bond-length" => &mut physics.max_bond_length,
                    _ => return Err(Self::unsupported_key(key)),
                };
                *slot = Some(parse_value(key, value_str, "float")?);
                continue;
            }

            let relaxation = self.relaxation.get_or_insert_with(Default::default);
            match key {
                "relaxation.time-step" => {
                    relaxation.time_step = Some(parse_value(key, value_str, "float")?);
                }
                "relaxation.max-time" => {
                    relaxation.max_time = Some(parse_value(key, value_str, "float")?);
                }
                "relaxation.settle-speed" => {
                    relaxation.settle_speed = Some(parse_value(key, value_str, "float")?);
                }
                "relaxation.settle-ticks" => {
                    relaxation.settle_ticks = Some(parse_value(key, value_str, "integer")?);
                }
                _ => return Err(Self::unsupported_key(key)),
            }
        }
        Ok(())
    }

    fn unsupported_key(key: &str) -> CliError {
        CliError::Config(format!(
            "Unsupported configuration key for --set: '{}'",
            key
        ))
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}
