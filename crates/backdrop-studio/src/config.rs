use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use backdrop_engine::logging::LoggingConfig;
use backdrop_engine::window::RuntimeConfig;
use backdrop_fields::{ParticleFieldOptions, WaveFieldOptions};
use winit::dpi::LogicalSize;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which visual the studio mounts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    #[default]
    Waves,
    Particles,
}

impl VisualKind {
    pub fn title(self) -> &'static str {
        match self {
            VisualKind::Waves => "backdrop: wave field",
            VisualKind::Particles => "backdrop: particle field",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: Option<String>,
    /// Logical pixels.
    pub width: f64,
    /// Logical pixels.
    pub height: f64,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: None,
            width: 800.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `env_logger` filter; `RUST_LOG` applies when absent.
    pub filter: Option<String>,
}

/// Studio configuration file.
///
/// ```toml
/// visual = "particles"
///
/// [window]
/// width = 1024
///
/// [particles]
/// count = 8000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub visual: VisualKind,
    pub window: WindowSection,
    pub logging: LoggingSection,
    pub waves: WaveFieldOptions,
    pub particles: ParticleFieldOptions,
}

impl StudioConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let title = self
            .window
            .title
            .clone()
            .unwrap_or_else(|| self.visual.title().to_string());
        RuntimeConfig {
            title,
            initial_size: LogicalSize::new(self.window.width.max(1.0), self.window.height.max(1.0)),
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.logging.filter.clone(),
            ..LoggingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = StudioConfig::from_toml_str("").unwrap();
        assert_eq!(config, StudioConfig::default());
        assert_eq!(config.visual, VisualKind::Waves);
        assert_eq!(config.runtime_config().initial_size, LogicalSize::new(800.0, 400.0));
    }

    #[test]
    fn sections_merge_over_defaults() {
        let config = StudioConfig::from_toml_str(
            r#"
            visual = "particles"

            [window]
            title = "lobby"
            height = 300

            [logging]
            filter = "backdrop_engine=debug"

            [waves]
            fieldCount = 1

            [particles]
            count = 800
            seed = 11
            "#,
        )
        .unwrap();

        assert_eq!(config.visual, VisualKind::Particles);
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.window.height, 300.0);
        assert_eq!(config.runtime_config().title, "lobby");
        assert_eq!(config.waves.field_count, 1);
        assert_eq!(config.waves.resolution, 32);
        assert_eq!(config.particles.count, 800);
        assert_eq!(config.particles.seed, Some(11));
        assert_eq!(
            config.logging_config().env_filter.as_deref(),
            Some("backdrop_engine=debug")
        );
    }

    #[test]
    fn default_title_names_the_visual() {
        let config = StudioConfig {
            visual: VisualKind::Particles,
            ..StudioConfig::default()
        };
        assert_eq!(config.runtime_config().title, "backdrop: particle field");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = StudioConfig::from_toml_str("visual = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StudioConfig::from_toml_file("/nonexistent/backdrop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/backdrop.toml"));
    }
}
