//! Scene configuration
//!
//! The initial scene is described as data: camera, lights, an optional
//! shadow-catching ground plane and a list of animated boxes. The defaults
//! reproduce the built-in demo scene; any part can be overridden from a TOML
//! or RON file.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration that can be loaded from and saved to disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Complete description of the initial scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Clear color, as a CSS color name or hex string
    pub background: String,
    pub camera: CameraConfig,
    pub ambient_light: AmbientLightConfig,
    pub directional_light: DirectionalLightConfig,
    pub ground: GroundConfig,
    pub point_lights: Vec<PointLightConfig>,
    pub meshes: Vec<AnimatedMeshConfig>,
}

impl Config for SceneConfig {}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: "white".to_string(),
            camera: CameraConfig::default(),
            ambient_light: AmbientLightConfig::default(),
            directional_light: DirectionalLightConfig::default(),
            ground: GroundConfig::default(),
            point_lights: vec![
                PointLightConfig::new([-10.0, 0.0, -20.0], 0.5),
                PointLightConfig::new([0.0, -10.0, 0.0], 1.5),
            ],
            meshes: vec![
                AnimatedMeshConfig::new([0.0, 1.0, 0.0], "lightblue", 2.0).with_size([3.0, 2.0, 1.0]),
                AnimatedMeshConfig::new([-2.0, 1.0, -5.0], "pink", 6.0),
                AnimatedMeshConfig::new([5.0, 1.0, -2.0], "pink", 6.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-5.0, 2.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 1.0,
            max_distance: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub color: String,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: "white".to_string(),
            intensity: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub color: String,
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowConfig,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 0.0],
            target: [0.0, 0.0, 0.0],
            color: "white".to_string(),
            intensity: 1.5,
            cast_shadow: true,
            shadow: ShadowConfig::default(),
        }
    }
}

/// Shadow map resolution and the orthographic volume it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 1024,
            left: -10.0,
            right: 10.0,
            top: 10.0,
            bottom: -10.0,
            near: 0.5,
            far: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLightConfig {
    pub position: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: String,
    pub intensity: f32,
}

impl PointLightConfig {
    pub fn new(position: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            color: default_light_color(),
            intensity,
        }
    }
}

fn default_light_color() -> String {
    "white".to_string()
}

/// Flat plane that only shows the shadows falling on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Set to `false` to leave the ground out of the scene
    pub enabled: bool,
    /// Width and height of the plane before rotation
    pub size: [f32; 2],
    pub position: [f32; 3],
    /// Euler XYZ rotation in radians
    pub rotation: [f32; 3],
    /// Opacity of the shadow drawn on the plane
    pub opacity: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: [100.0, 100.0],
            position: [0.0, -3.0, 0.0],
            rotation: [-std::f32::consts::FRAC_PI_2, 0.0, 0.0],
            opacity: 0.3,
        }
    }
}

/// Construction parameters for one animated box
///
/// These only feed geometry and material setup; the animation itself starts
/// from the same rest state for every box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedMeshConfig {
    pub position: [f32; 3],
    /// Box width, height and depth; a unit cube when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f32; 3]>,
    pub color: String,
    /// Wobble speed of the material
    pub speed: f32,
    #[serde(default = "default_wobble_factor")]
    pub wobble_factor: f32,
}

impl AnimatedMeshConfig {
    pub const DEFAULT_SIZE: [f32; 3] = [1.0, 1.0, 1.0];

    pub fn new(position: [f32; 3], color: &str, speed: f32) -> Self {
        Self {
            position,
            size: None,
            color: color.to_string(),
            speed,
            wobble_factor: default_wobble_factor(),
        }
    }

    pub fn with_size(mut self, size: [f32; 3]) -> Self {
        self.size = Some(size);
        self
    }

    /// Box dimensions with the unit-cube fallback applied
    pub fn dimensions(&self) -> [f32; 3] {
        self.size.unwrap_or(Self::DEFAULT_SIZE)
    }
}

fn default_wobble_factor() -> f32 {
    0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_matches_demo() {
        let config = SceneConfig::default();

        assert_eq!(config.camera.position, [-5.0, 2.0, 10.0]);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.ambient_light.intensity, 0.3);
        assert_eq!(config.directional_light.position, [0.0, 10.0, 0.0]);
        assert_eq!(config.directional_light.intensity, 1.5);
        assert_eq!(config.directional_light.shadow.map_size, 1024);
        assert_eq!(config.point_lights.len(), 2);

        assert_eq!(config.meshes.len(), 3);
        assert_eq!(config.meshes[0].dimensions(), [3.0, 2.0, 1.0]);
        assert_eq!(config.meshes[0].color, "lightblue");
        assert_eq!(config.meshes[1].dimensions(), [1.0, 1.0, 1.0]);
        assert_eq!(config.meshes[2].speed, 6.0);
        assert!(config.meshes.iter().all(|m| m.wobble_factor == 0.6));

        let ground = config.ground;
        assert!(ground.enabled);
        assert_eq!(ground.opacity, 0.3);
        assert_eq!(ground.position, [0.0, -3.0, 0.0]);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SceneConfig::default();
        let text = toml::to_string_pretty(&config).expect("serialize");
        let parsed: SceneConfig = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_disabled_ground_survives_toml() {
        let config = SceneConfig {
            ground: GroundConfig {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).expect("serialize");
        let parsed: SceneConfig = toml::from_str(&text).expect("parse");

        assert!(!parsed.ground.enabled);
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let text = r##"
            background = "#202020"

            [[meshes]]
            position = [1.0, 2.0, 3.0]
            color = "tomato"
            speed = 1.5
        "##;

        let parsed: SceneConfig = toml::from_str(text).expect("parse");
        assert_eq!(parsed.background, "#202020");
        assert_eq!(parsed.camera, CameraConfig::default());
        assert_eq!(parsed.meshes.len(), 1);
        assert_eq!(parsed.meshes[0].size, None);
        assert_eq!(parsed.meshes[0].wobble_factor, 0.6);
        assert!(parsed.ground.enabled);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let path = std::env::temp_dir().join("spinning_boxes_scene.yaml");
        let result = SceneConfig::default().save_to_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "spinning_boxes_scene_{}.ron",
            std::process::id()
        ));

        let config = SceneConfig::default();
        config.save_to_file(&path).expect("save");
        let loaded = SceneConfig::load_from_file(&path).expect("load");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
