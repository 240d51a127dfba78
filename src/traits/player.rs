use glam::Vec3;

use super::controller::Controller;
use crate::camera::Camera;
use crate::scene::SceneGraph;
use crate::types::Capsule;

/// First-person locomotion and collision, owned by the current scene session
pub trait PlayerController {
    /// Advance one simulation sub-step
    fn update(&mut self, dt: f32, input: &dyn Controller);

    /// Eye position in world space
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// Build collision structures from the scene's surfaces
    fn load_spatial_index(&mut self, graph: &SceneGraph);

    /// Release input bindings and collision data; the player is inert afterwards
    fn dispose(&mut self);

    fn camera(&self) -> &Camera;

    fn camera_mut(&mut self) -> &mut Camera;
}

/// Player factory - invoked once per successful scene load
pub trait PlayerFactory {
    fn create(&self, camera: Camera, graph: &SceneGraph, collider: Capsule) -> Box<dyn PlayerController>;
}
