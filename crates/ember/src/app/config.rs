use anyhow::bail;
use ember_utils::{AnyResult, AnyhowResultExt};
use serde::Deserialize;
use std::{fs, path::Path};

/// Application settings, usually read from a TOML file. Every key is optional.
///
/// ```toml
/// title = "Demo"
/// width = 1920
/// height = 1080
/// fps_report_interval = 0.5
/// max_timestep = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base window title, the FPS counter is appended to it.
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// How often (in seconds) the FPS counter is refreshed.
    pub fps_report_interval: f64,
    /// Upper bound of a single frame's timestep, so a long stall (window drag, debugger break)
    /// doesn't turn into one giant simulation step.
    pub max_timestep: Option<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::from("Ember"),
            width: 1280,
            height: 720,
            vsync: true,
            fps_report_interval: 1.0,
            max_timestep: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> AnyResult<Self> {
        let config: Self = toml::from_str(text).otherwise("couldn't parse the application config")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values serde can't, like the sign of intervals.
    pub fn validate(&self) -> AnyResult {
        let interval = self.fps_report_interval;
        if interval.is_nan() || interval <= 0.0 {
            bail!("fps_report_interval must be positive, got {interval}");
        }

        if let Some(max) = self.max_timestep {
            if max.is_nan() || max <= 0.0 {
                bail!("max_timestep must be positive, got {max}");
            }
        }

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> AnyResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .otherwise(format!("couldn't read config file `{}`", path.display()))?;

        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str("title = \"Demo\"\nmax_timestep = 0.1").unwrap();

        assert_eq!(config.title, "Demo");
        assert_eq!(config.max_timestep, Some(0.1));
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert!(config.vsync);
        assert_eq!(config.fps_report_interval, 1.0);

        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_configs_are_reported() {
        let error = AppConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert_eq!(error.to_string(), "couldn't parse the application config");

        let error = AppConfig::load("/definitely/not/a/real/ember.toml").unwrap_err();
        assert!(error.to_string().contains("ember.toml"));
    }

    #[test]
    fn non_positive_intervals_are_rejected() {
        for text in [
            "fps_report_interval = 0.0",
            "fps_report_interval = -1.0",
            "fps_report_interval = nan",
            "max_timestep = 0.0",
        ] {
            assert!(AppConfig::from_toml_str(text).is_err(), "accepted `{text}`");
        }

        let error = AppConfig::from_toml_str("fps_report_interval = 0.0").unwrap_err();
        assert!(error.to_string().contains("fps_report_interval"));
        assert!(AppConfig::from_toml_str("fps_report_interval = 0.25").is_ok());
    }
}
