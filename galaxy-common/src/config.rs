use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::path::{Path, PathBuf};

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Integration time step dt.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Number of recorded states, counting the initial configuration as step 0.
    /// `num_steps` states means `num_steps - 1` integration steps.
    #[serde(default = "default_num_steps")]
    pub num_steps: u32,
}

// Configuration for the force model
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PhysicsConfig {
    /// Softening parameter added to the separation distance before cubing,
    /// preventing singular forces at near-zero separations. It does not
    /// prevent large transient forces during extremely close encounters;
    /// that is an accepted approximation of the model.
    #[serde(default = "default_softening")]
    pub softening: f64,
}

// Input and output file paths, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IoConfig {
    /// Path of the `.gal` file holding the initial configuration.
    pub input: PathBuf,
    /// Path the final configuration is written to after the last step.
    pub output: PathBuf,
}

// Configuration for frame recording, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    /// Record the per-step position history and write it out for the
    /// visualizer. When false the engine keeps only the newest state.
    #[serde(default)]
    pub save_frames: bool,
    #[serde(default = "default_frames_filename")]
    pub frames_filename: String,
    /// Frame file format: "bincode" or "json"
    pub format: Option<String>,
}

fn default_dt() -> f64 {
    1e-5
}

fn default_num_steps() -> u32 {
    201
}

fn default_softening() -> f64 {
    1e-3
}

fn default_frames_filename() -> String {
    "frames".to_string()
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            dt: default_dt(),
            num_steps: default_num_steps(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            softening: default_softening(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            save_frames: false,
            frames_filename: default_frames_filename(),
            format: None,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub io: IoConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: SimulationConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the numerical parameters; rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.timing.dt > 0.0) {
            anyhow::bail!("timing.dt must be positive, got {}.", self.timing.dt);
        }
        if self.timing.num_steps == 0 {
            anyhow::bail!("timing.num_steps must be at least 1.");
        }
        if !(self.physics.softening >= 0.0) {
            anyhow::bail!("physics.softening must be non-negative, got {}.", self.physics.softening);
        }
        if self.io.input.as_os_str().is_empty() {
            anyhow::bail!("io.input must not be empty.");
        }
        if self.io.output.as_os_str().is_empty() {
            anyhow::bail!("io.output must not be empty.");
        }
        if let Some(format) = self.output.format.as_deref() {
            match format {
                "bincode" | "json" => {}
                other => anyhow::bail!("output.format must be 'bincode' or 'json', got '{}'.", other),
            }
        }
        Ok(())
    }
}
