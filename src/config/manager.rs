use super::{
    evolution::EvolutionConfig,
    files::FilesConfig,
    simulator::SimulatorConfig,
    traits::ConfigSection,
};
use crate::error::GenevoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables overriding file settings,
/// e.g. `GENEVO__EVOLUTION__NB_GENERATIONS=100`.
pub const ENV_PREFIX: &str = "GENEVO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub simulator: SimulatorConfig,
    pub files: FilesConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GenevoError> {
        self.evolution.validate()?;
        self.simulator.validate()?;
        self.files.validate()?;
        log::debug!(
            "Validated sections [{}], [{}], [{}]",
            EvolutionConfig::section_name(),
            SimulatorConfig::section_name(),
            FilesConfig::section_name()
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults layered with `GENEVO__*` environment overrides.
    pub fn load_from_env(&mut self) -> Result<(), GenevoError> {
        self.config = Self::build(None)?;
        Ok(())
    }

    /// TOML file layered with `GENEVO__*` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GenevoError> {
        self.config = Self::build(Some(path.as_ref()))?;
        Ok(())
    }

    fn build(path: Option<&Path>) -> Result<AppConfig, GenevoError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GenevoError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| GenevoError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenevoError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| GenevoError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GenevoError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_inner(self) -> AppConfig {
        self.config
    }

    /// Apply `f` and keep the result only if it still validates.
    pub fn update<F>(&mut self, f: F) -> Result<(), GenevoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[evolution]\nnb_generations = 5\nq = 0.001\nseed = 42").unwrap();

        let mut manager = ConfigManager::new();
        manager.load_from_file(file.path()).unwrap();
        let config = manager.get();
        assert_eq!(config.evolution.nb_generations, 5);
        assert_eq!(config.evolution.seed, Some(42));
        assert_eq!(config.evolution.indel_unit, 60);
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[evolution]\ninversion_proba = 2.0").unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_from_file(file.path());
        assert!(matches!(result, Err(GenevoError::Configuration(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genevo.toml");

        let mut manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.nb_generations = 12;
                c.files.report_csv = Some("out.csv".into());
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let mut reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().evolution.nb_generations, 12);
        assert_eq!(reloaded.get().files.report_csv, Some("out.csv".into()));
    }

    #[test]
    fn test_update_rolls_back_invalid_change() {
        let mut manager = ConfigManager::new();
        assert!(manager.update(|c| c.evolution.q = -1.0).is_err());
        assert_eq!(manager.get().evolution.q, EvolutionConfig::default().q);
    }
}
