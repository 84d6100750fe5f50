use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;
use voxfarm_world::{RulesConfig, DEFAULT_WORLD_SIZE};

pub const DEFAULT_CONFIG_PATH: &str = "config/voxfarm.toml";

/// Headless simulation settings.
///
/// TOML integers are signed, so seeds above `i64::MAX` only work from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    pub world_size_x: u32,
    pub world_size_z: u32,
    pub seed: u64,
    /// Seconds fed to each tick (clamped by `rules.max_tick_secs`).
    pub frame_dt: f64,
    pub max_ticks: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
    /// JSONL file that collects one summary record per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_log: Option<PathBuf>,
    pub rules: RulesConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size_x: DEFAULT_WORLD_SIZE,
            world_size_z: DEFAULT_WORLD_SIZE,
            seed: 0x5EED,
            frame_dt: 0.05,
            // one minute of simulated time at the default frame delta
            max_ticks: 1200,
            event_log: None,
            summary_log: None,
            rules: RulesConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    ///
    /// Invalid rule values are replaced by the default rules rather than rejected.
    pub fn load_from_path(path: &Path) -> Self {
        let mut cfg = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Simulation config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SimConfig::default()
            }
        };

        if let Err(err) = cfg.rules.validate() {
            warn!("Invalid rules in {}: {err}. Using default rules", path.display());
            cfg.rules = RulesConfig::default();
        }
        if !cfg.frame_dt.is_finite() || cfg.frame_dt <= 0.0 {
            warn!(
                "Invalid frame_dt {} in {}. Using {}",
                cfg.frame_dt,
                path.display(),
                cfg.rules.max_tick_secs
            );
            cfg.frame_dt = cfg.rules.max_tick_secs;
        }
        cfg
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxfarm_world::{GrowthModel, HydrationMetric};

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SimConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(cfg, SimConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(
            &path,
            r#"
seed = 99
max_ticks = 40

[rules]
hydration_metric = "chebyshev"
growth_model = "stage_deadline"
"#,
        )
        .unwrap();

        let cfg = SimConfig::load_from_path(&path);
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.max_ticks, 40);
        assert_eq!(cfg.world_size_x, DEFAULT_WORLD_SIZE);
        assert_eq!(cfg.rules.hydration_metric, HydrationMetric::Chebyshev);
        assert_eq!(cfg.rules.growth_model, GrowthModel::StageDeadline);
        assert_eq!(cfg.rules.hydration_radius, 4);
    }

    #[test]
    fn invalid_rules_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(
            &path,
            "seed = 7\nframe_dt = -1.0\n[rules]\nhydration_radius = 0\n",
        )
        .unwrap();

        let cfg = SimConfig::load_from_path(&path);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.rules, RulesConfig::default());
        assert_eq!(cfg.frame_dt, cfg.rules.max_tick_secs);
    }

    #[test]
    fn garbage_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(&path, "seed = \"not a number\"").unwrap();
        assert_eq!(SimConfig::load_from_path(&path), SimConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sim.toml");
        let cfg = SimConfig {
            seed: 1234,
            event_log: Some(PathBuf::from("target/events.jsonl")),
            summary_log: Some(PathBuf::from("target/summaries.jsonl")),
            ..SimConfig::default()
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(SimConfig::load_from_path(&path), cfg);
    }
}
