use glam::Vec3;
use log::{info, warn};

use crate::math::AABB;
use crate::scene::SceneGraph;
use crate::types::{SceneDescriptor, SpawnPoint, SpawnSource, SurfaceRole};

/// Derives where the player enters a freshly loaded scene. Never fails.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnResolver {
    /// Height added above the chosen floor's top face
    pub floor_clearance: f32,
    /// Height added above the lowest surface when no floor exists
    pub fallback_clearance: f32,
    /// Used when the scene has no surfaces at all
    pub default_position: Vec3,
    pub heading: f32,
}

impl Default for SpawnResolver {
    fn default() -> Self {
        Self {
            floor_clearance: 1.0,
            fallback_clearance: 0.1,
            default_position: Vec3::new(0.0, 1.0, 0.0),
            heading: 0.0,
        }
    }
}

impl SpawnResolver {
    /// Honors the descriptor's fixed spawn before looking at geometry
    pub fn resolve_for(&self, descriptor: &SceneDescriptor, graph: &SceneGraph) -> SpawnPoint {
        match descriptor.spawn_override {
            Some(position) => {
                info!(target: "museum::spawn", "using fixed spawn for {}", descriptor.id);
                self.point(Vec3::from_array(position), SpawnSource::Override)
            }
            None => self.resolve(graph),
        }
    }

    pub fn resolve(&self, graph: &SceneGraph) -> SpawnPoint {
        if let Some(floor) = largest_floor(graph) {
            let center = floor.center();
            let position = Vec3::new(center.x, floor.max.y + self.floor_clearance, center.z);
            info!(target: "museum::spawn", "spawning on floor at {:?}", position);
            return self.point(position, SpawnSource::Floor);
        }

        match lowest_surface(graph) {
            Some(lowest) => {
                warn!(
                    target: "museum::spawn",
                    "no floor surface found, using lowest surface at {:?}",
                    lowest
                );
                self.point(lowest + Vec3::Y * self.fallback_clearance, SpawnSource::LowestSurface)
            }
            None => {
                warn!(target: "museum::spawn", "scene has no surfaces, using default spawn");
                self.point(self.default_position, SpawnSource::Default)
            }
        }
    }

    fn point(&self, position: Vec3, source: SpawnSource) -> SpawnPoint {
        SpawnPoint {
            position,
            heading: self.heading,
            source,
        }
    }
}

/// Floor with the largest width × depth; ties keep the earliest in traversal order.
/// Floors without horizontal area (trim strips, vertical planes) never qualify.
fn largest_floor(graph: &SceneGraph) -> Option<AABB> {
    graph
        .surfaces_with_role(SurfaceRole::Floor)
        .filter_map(|(_, surface)| surface.bounds)
        .filter(|bounds| bounds.footprint() > 0.0)
        .fold(None, |best: Option<AABB>, candidate| match best {
            Some(b) if candidate.footprint() <= b.footprint() => Some(b),
            _ => Some(candidate),
        })
}

/// World origin of the lowest surface; ties keep the earliest in traversal order
fn lowest_surface(graph: &SceneGraph) -> Option<Vec3> {
    graph
        .surfaces()
        .map(|(node, _)| node.world_position())
        .fold(None, |lowest: Option<Vec3>, p| match lowest {
            Some(l) if p.y >= l.y => Some(l),
            _ => Some(p),
        })
}
