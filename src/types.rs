use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::{rgb_hex, AABB};

/// Identifier of a loadable museum scene
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Static description of a museum scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub id: SceneId,
    /// Human readable label shown in the scene menu
    #[serde(default)]
    pub name: String,
    /// Model path relative to the assets root
    pub asset_path: String,
    /// Fixed spawn position that bypasses geometry-based resolution
    #[serde(default)]
    pub spawn_override: Option<[f32; 3]>,
}

impl SceneDescriptor {
    pub fn new(id: impl Into<String>, asset_path: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: SceneId(id),
            asset_path: asset_path.into(),
            spawn_override: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Index of a node inside the currently loaded scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Capability tag assigned to a surface when a scene is loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceRole {
    Door,
    Floor,
    Annotation,
    Handle,
}

/// Where a spawn point came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnSource {
    Override,
    Floor,
    /// No floor surface; lowest surface origin was used
    LowestSurface,
    /// Scene had no surfaces at all
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// Yaw in radians
    pub heading: f32,
    pub source: SpawnSource,
}

/// Player body: segment `start`..`end` swept by a sphere of `radius`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Capsule standing on `feet`: bottom sphere lifted by its radius plus a small gap
    pub fn standing_at(feet: Vec3, height: f32, radius: f32) -> Self {
        let start = feet + Vec3::Y * (radius + 0.01);
        let end = start + Vec3::Y * (height - radius);
        Self { start, end, radius }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    pub fn bounds(&self) -> AABB {
        let r = Vec3::splat(self.radius);
        AABB::new(self.start.min(self.end) - r, self.start.max(self.end) + r)
    }
}

/// Decoded RGBA8 image
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA8
}

impl TextureData {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// PBR material as authored in the model
    Standard,
    /// Lit, shiny trim
    Phong,
    /// Unlit, not tone mapped
    Basic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
    pub tone_mapped: bool,
    pub texture: Option<Rc<TextureData>>,
}

impl Material {
    pub fn standard(color: [f32; 4], metalness: f32, roughness: f32) -> Self {
        Self {
            kind: MaterialKind::Standard,
            color,
            metalness,
            roughness,
            double_sided: false,
            tone_mapped: true,
            texture: None,
        }
    }

    /// White, unlit canvas an annotation surface shows until an image arrives
    pub fn blank_canvas() -> Self {
        Self::basic(rgb_hex(0xffffff), None)
    }

    pub fn image(texture: Rc<TextureData>) -> Self {
        Self::basic(rgb_hex(0xffffff), Some(texture))
    }

    /// Visual substituted when an image could not be fetched
    pub fn load_error() -> Self {
        Self::basic(rgb_hex(0xff0000), None)
    }

    pub fn handle_trim() -> Self {
        Self {
            kind: MaterialKind::Phong,
            color: rgb_hex(0xF4EBC7),
            metalness: 1.0,
            roughness: 0.2,
            double_sided: true,
            tone_mapped: false,
            texture: None,
        }
    }

    fn basic(color: [f32; 4], texture: Option<Rc<TextureData>>) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            metalness: 0.0,
            roughness: 1.0,
            double_sided: true,
            tone_mapped: false,
            texture,
        }
    }

    pub fn is_load_error(&self) -> bool {
        *self == Self::load_error()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard([0.7, 0.7, 0.7, 1.0], 0.0, 1.0)
    }
}
