use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::Level;

use crate::error::BubbleError;
use crate::evaluator::RiskScale;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory JSON and SVG artifacts are written to.
    pub output_dir: PathBuf,
    pub risk_scale: RiskScale,
    pub log_level: Level,
    /// Print artifacts instead of writing them.
    pub stdout_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            risk_scale: RiskScale::SixTier,
            log_level: Level::INFO,
            stdout_only: false,
        }
    }
}

impl Config {
    /// Defaults overridden by whatever `lookup` returns for the `BUBBLE_*` keys.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup("BUBBLE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(shellexpand::tilde(&dir).to_string());
        }

        if let Some(scale) = lookup("BUBBLE_RISK_SCALE") {
            config.risk_scale = scale.parse()?;
        }

        if let Some(level) = lookup("BUBBLE_LOG_LEVEL") {
            config.log_level = parse_log_level(&level)?;
        }

        if let Some(flag) = lookup("BUBBLE_STDOUT_ONLY") {
            config.stdout_only = parse_flag(&flag)?;
        }

        Ok(config)
    }

    /// Command-line values replace the environment ones. `--stdout-only` can
    /// only switch stdout mode on.
    pub fn with_overrides(
        mut self,
        output_dir: Option<PathBuf>,
        scale: Option<RiskScale>,
        stdout_only: bool,
    ) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(scale) = scale {
            self.risk_scale = scale;
        }
        if stdout_only {
            self.stdout_only = true;
        }
        self
    }
}

pub fn parse_log_level(value: &str) -> crate::Result<Level> {
    value
        .trim()
        .parse::<Level>()
        .map_err(|_| BubbleError::config_error(format!("invalid log level '{}'", value)))
}

fn parse_flag(value: &str) -> crate::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BubbleError::config_error(format!("invalid boolean '{}'", other))),
    }
}

pub async fn load_config() -> Result<Config> {
    let config = Config::from_lookup(|key| env::var(key).ok())
        .context("loading configuration from environment")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.risk_scale, RiskScale::SixTier);
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.stdout_only);
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("BUBBLE_OUTPUT_DIR", "/tmp/bubbles"),
            ("BUBBLE_RISK_SCALE", "four_band"),
            ("BUBBLE_LOG_LEVEL", "debug"),
            ("BUBBLE_STDOUT_ONLY", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/bubbles"));
        assert_eq!(config.risk_scale, RiskScale::FourBand);
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.stdout_only);
    }

    #[test]
    fn output_dir_expands_tilde() {
        let config = Config::from_lookup(lookup_in(&[("BUBBLE_OUTPUT_DIR", "~/reports")])).unwrap();
        if env::var_os("HOME").is_some() {
            assert!(!config.output_dir.starts_with("~"));
        }
        assert!(config.output_dir.ends_with("reports"));
    }

    #[test]
    fn flags_replace_environment_values() {
        let env = Config::from_lookup(lookup_in(&[
            ("BUBBLE_OUTPUT_DIR", "/tmp/from-env"),
            ("BUBBLE_RISK_SCALE", "four-band"),
            ("BUBBLE_STDOUT_ONLY", "0"),
        ]))
        .unwrap();

        let config = env.with_overrides(
            Some(PathBuf::from("/tmp/from-flag")),
            Some(RiskScale::SixTier),
            true,
        );
        assert_eq!(config.output_dir, PathBuf::from("/tmp/from-flag"));
        assert_eq!(config.risk_scale, RiskScale::SixTier);
        assert!(config.stdout_only);
    }

    #[test]
    fn absent_flags_keep_environment_values() {
        let env = Config::from_lookup(lookup_in(&[
            ("BUBBLE_OUTPUT_DIR", "/tmp/from-env"),
            ("BUBBLE_RISK_SCALE", "four-band"),
            ("BUBBLE_STDOUT_ONLY", "yes"),
        ]))
        .unwrap();

        let config = env.with_overrides(None, None, false);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/from-env"));
        assert_eq!(config.risk_scale, RiskScale::FourBand);
        assert!(config.stdout_only);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_scale = Config::from_lookup(lookup_in(&[("BUBBLE_RISK_SCALE", "seven")]));
        assert!(matches!(bad_scale, Err(BubbleError::Config(_))));

        let bad_level = Config::from_lookup(lookup_in(&[("BUBBLE_LOG_LEVEL", "loud")]));
        assert!(matches!(bad_level, Err(BubbleError::Config(_))));

        let bad_flag = Config::from_lookup(lookup_in(&[("BUBBLE_STDOUT_ONLY", "maybe")]));
        assert!(matches!(bad_flag, Err(BubbleError::Config(_))));
    }
}
