//! Command-line interface

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::config::{Config, ConfigError, SceneConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "spinning-boxes", version)]
#[command(about = "Click the boxes to make them grow and shrink", long_about = None)]
pub struct Cli {
    /// Scene file (.toml or .ron); the built-in scene is used when omitted
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Synchronize presentation with the display refresh rate
    #[arg(long, default_value = "false")]
    pub vsync: bool,

    /// Write the effective scene configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub dump_config: Option<PathBuf>,
}

impl Cli {
    /// Loads the scene file given on the command line, or the default scene
    pub fn scene_config(&self) -> Result<SceneConfig, ConfigError> {
        match &self.config {
            Some(path) => {
                info!("Loading scene from {}", path.display());
                SceneConfig::load_from_file(path)
            }
            None => Ok(SceneConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["spinning-boxes"]);
        assert!(cli.config.is_none());
        assert!(!cli.vsync);
        assert_eq!(cli.scene_config().unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["spinning-boxes", "--config", "scene.ron", "--vsync"]);
        assert_eq!(cli.config, Some(PathBuf::from("scene.ron")));
        assert!(cli.vsync);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cli = Cli::parse_from(["spinning-boxes", "-c", "/nonexistent/scene.toml"]);
        assert!(matches!(cli.scene_config(), Err(ConfigError::Io(_))));
    }
}
