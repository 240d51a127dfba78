use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::DoorClipMap;
use crate::error::ConfigError;
use crate::museum::{SpawnResolver, SurfaceRules};
use crate::types::{SceneDescriptor, SceneId};

/// Runtime settings; every field has a default so partial files are accepted
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub scenes: ScenesConfig,
    pub assets: AssetsConfig,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    pub door: DoorConfig,
    pub surfaces: SurfaceRules,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenesConfig {
    pub registry: Vec<SceneDescriptor>,
    pub start: SceneId,
}

impl Default for ScenesConfig {
    fn default() -> Self {
        Self {
            registry: vec![
                SceneDescriptor::new("art_gallery", "art_gallery/RoomTest.gltf").with_name("Art Gallery"),
                SceneDescriptor {
                    spawn_override: Some([0.0, 0.0, 0.0]),
                    ..SceneDescriptor::new("louvre", "art_hallway/MuseumTemplate.gltf")
                        .with_name("Louvre Art Museum")
                },
            ],
            start: SceneId::new("art_gallery"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Scene asset paths are resolved against this directory
    pub root: PathBuf,
    /// Holds one `<scene id>.json` metadata list per scene
    pub metadata_dir: PathBuf,
    /// Prefix joined with each record's image reference
    pub image_base: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            metadata_dir: PathBuf::from("metadata"),
            image_base: "assets/images/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub floor_clearance: f32,
    pub fallback_clearance: f32,
    pub default_position: [f32; 3],
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            floor_clearance: 1.0,
            fallback_clearance: 0.1,
            default_position: [0.0, 1.0, 0.0],
        }
    }
}

impl SpawnConfig {
    pub fn resolver(&self) -> SpawnResolver {
        SpawnResolver {
            floor_clearance: self.floor_clearance,
            fallback_clearance: self.fallback_clearance,
            default_position: Vec3::from_array(self.default_position),
            ..SpawnResolver::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f32,
    pub height: f32,
    /// Meters per second
    pub speed: f32,
    /// Radians per second
    pub turn_speed: f32,
    /// Obstacles whose top is within this height of the feet don't block
    pub step_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.35,
            height: 1.0,
            speed: 4.0,
            turn_speed: 2.0,
            step_height: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DoorConfig {
    pub proximity_threshold: f32,
    /// Door clips play this many times faster than simulation time
    pub animation_speed: f32,
    pub clips: DoorClipMap,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 3.0,
            animation_speed: 4.0,
            clips: DoorClipMap::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Longest frame time simulated in one tick, seconds
    pub max_dt: f32,
    pub substeps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.05,
            substeps: 5,
        }
    }
}

impl MuseumConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenes.registry.is_empty() {
            return Err(ConfigError::Invalid("scene registry is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for descriptor in &self.scenes.registry {
            if !seen.insert(&descriptor.id) {
                return Err(ConfigError::Invalid(format!("duplicate scene id '{}'", descriptor.id)));
            }
        }

        if self.scene(&self.scenes.start).is_none() {
            return Err(ConfigError::Invalid(format!(
                "start scene '{}' is not registered",
                self.scenes.start
            )));
        }
        if self.timing.substeps == 0 || self.timing.max_dt <= 0.0 {
            return Err(ConfigError::Invalid("timing needs max_dt > 0 and at least one sub-step".to_string()));
        }
        if self.player.radius <= 0.0 || self.player.height < self.player.radius {
            return Err(ConfigError::Invalid("player height must be at least its radius".to_string()));
        }
        if self.door.proximity_threshold <= 0.0 {
            return Err(ConfigError::Invalid("proximity threshold must be positive".to_string()));
        }

        Ok(())
    }

    pub fn scene(&self, id: &SceneId) -> Option<&SceneDescriptor> {
        self.scenes.registry.iter().find(|d| d.id == *id)
    }

    /// Scene reached through the door of `current`; the registry is walked in a cycle
    pub fn alternate_scene(&self, current: &SceneId) -> Option<&SceneId> {
        let registry = &self.scenes.registry;
        let index = registry.iter().position(|d| d.id == *current)?;
        let next = &registry[(index + 1) % registry.len()];
        (next.id != *current).then_some(&next.id)
    }
}
