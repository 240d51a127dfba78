//! Reference first-person walker.
//!
//! Kinematic only: the capsule slides along the ground plane and is stopped by
//! surface bounds it would newly enter. There is no gravity or jumping.

use glam::Vec3;
use log::{debug, info};

use crate::camera::Camera;
use crate::config::PlayerConfig;
use crate::math::AABB;
use crate::scene::SceneGraph;
use crate::traits::{Button, Controller, PlayerController, PlayerFactory};
use crate::types::{Capsule, SurfaceRole};

#[derive(Default, Clone, Copy)]
struct MovementState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    rotate_left: bool,
    rotate_right: bool,
}

impl MovementState {
    fn sample(input: &dyn Controller) -> Self {
        Self {
            forward: input.is_down(Button::KeyW),
            backward: input.is_down(Button::KeyS),
            left: input.is_down(Button::KeyA),
            right: input.is_down(Button::KeyD),
            rotate_left: input.is_down(Button::KeyQ),
            rotate_right: input.is_down(Button::KeyE),
        }
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32) {
        (
            Self::to_direction(self.forward, self.backward),
            Self::to_direction(self.right, self.left),
        )
    }

    const fn rotation_velocity(&self) -> f32 {
        Self::to_direction(self.rotate_left, self.rotate_right)
    }
}

pub struct FirstPersonPlayer {
    camera: Camera,
    collider: Capsule,
    obstacles: Vec<AABB>,
    speed: f32,
    turn_speed: f32,
    step_height: f32,
    disposed: bool,
}

impl FirstPersonPlayer {
    /// The camera is moved to the top of `collider`
    pub fn new(camera: Camera, collider: Capsule, settings: &PlayerConfig) -> Self {
        let mut player = Self {
            camera,
            collider,
            obstacles: Vec::new(),
            speed: settings.speed,
            turn_speed: settings.turn_speed,
            step_height: settings.step_height,
            disposed: false,
        };
        player.sync_camera();
        player
    }

    pub fn collider(&self) -> &Capsule {
        &self.collider
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn sync_camera(&mut self) {
        self.camera.position = self.collider.end;
    }

    /// Body volume used for blocking; the bottom is raised so low ledges are stepped over
    fn body(&self, offset: Vec3) -> AABB {
        let mut bounds = self.collider.bounds();
        bounds.min += offset + Vec3::Y * self.step_height;
        bounds.max += offset;
        bounds
    }

    fn blocked(&self, offset: Vec3) -> bool {
        let before = self.body(Vec3::ZERO);
        let after = self.body(offset);
        // Volumes the body already overlaps (rooms, large shells) never block
        self.obstacles
            .iter()
            .any(|o| after.intersects(o) && !before.intersects(o))
    }
}

impl PlayerController for FirstPersonPlayer {
    fn update(&mut self, dt: f32, input: &dyn Controller) {
        if self.disposed || dt <= 0.0 {
            return;
        }

        let movement = MovementState::sample(input);
        self.camera.yaw += movement.rotation_velocity() * self.turn_speed * dt;

        let (fwd, side) = movement.velocity();
        let heading = self.camera.heading();
        let right = heading.cross(Vec3::Y);
        let wish = (heading * fwd + right * side).normalize_or_zero() * self.speed * dt;

        // Resolve each horizontal axis on its own so walls can be slid along
        for step in [Vec3::new(wish.x, 0.0, 0.0), Vec3::new(0.0, 0.0, wish.z)] {
            if step != Vec3::ZERO && !self.blocked(step) {
                self.collider.translate(step);
            }
        }

        self.sync_camera();
    }

    fn position(&self) -> Vec3 {
        self.camera.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.collider.translate(position - self.collider.end);
        self.sync_camera();
    }

    fn load_spatial_index(&mut self, graph: &SceneGraph) {
        self.obstacles = graph
            .surfaces()
            .filter(|(_, s)| !s.has_role(SurfaceRole::Floor))
            .filter_map(|(_, s)| s.bounds)
            .collect();
        info!(target: "museum::player", "spatial index holds {} obstacles", self.obstacles.len());
    }

    fn dispose(&mut self) {
        debug!(target: "museum::player", "player disposed");
        self.obstacles.clear();
        self.disposed = true;
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

/// Builds a [`FirstPersonPlayer`] per loaded scene
#[derive(Debug, Clone, Default)]
pub struct FirstPersonFactory {
    settings: PlayerConfig,
}

impl FirstPersonFactory {
    pub fn new(settings: PlayerConfig) -> Self {
        Self { settings }
    }
}

impl PlayerFactory for FirstPersonFactory {
    fn create(&self, camera: Camera, _graph: &SceneGraph, collider: Capsule) -> Box<dyn PlayerController> {
        Box::new(FirstPersonPlayer::new(camera, collider, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Surface;
    use crate::traits::ButtonSet;
    use crate::types::Material;
    use glam::Mat4;

    fn player_at_origin() -> FirstPersonPlayer {
        let collider = Capsule::standing_at(Vec3::ZERO, 1.0, 0.35);
        FirstPersonPlayer::new(Camera::new(Vec3::ZERO, 0.0), collider, &PlayerConfig::default())
    }

    fn wall_scene() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let floor = graph.add_node(
            "Floor",
            None,
            Mat4::IDENTITY,
            Some(Surface::new(
                Some(AABB::new(Vec3::new(-10.0, -0.1, -10.0), Vec3::new(10.0, 0.0, 10.0))),
                Material::default(),
            )),
        );
        graph.add_role(floor, SurfaceRole::Floor);
        graph.add_node(
            "Wall",
            None,
            Mat4::IDENTITY,
            Some(Surface::new(
                Some(AABB::new(Vec3::new(-5.0, 0.0, 1.0), Vec3::new(5.0, 3.0, 1.2))),
                Material::default(),
            )),
        );
        graph
    }

    #[test]
    fn test_camera_sits_on_capsule_top() {
        let player = player_at_origin();
        assert!((player.position().y - 1.01).abs() < 1e-5);
    }

    #[test]
    fn test_walks_forward() {
        let mut player = player_at_origin();
        let input = ButtonSet::with(&[Button::KeyW]);
        player.update(0.5, &input);
        assert!((player.position().z - 2.0).abs() < 1e-5);
        assert_eq!(player.position().x, 0.0);
    }

    #[test]
    fn test_wall_blocks_but_floor_does_not() {
        let mut player = player_at_origin();
        player.load_spatial_index(&wall_scene());
        assert_eq!(player.obstacle_count(), 1);

        let input = ButtonSet::with(&[Button::KeyW]);
        for _ in 0..20 {
            player.update(0.05, &input);
        }
        assert!(player.collider().bounds().max.z <= 1.0 + 0.2 + 1e-4);
        assert!(player.position().z < 1.0);
    }

    #[test]
    fn test_turning_changes_heading() {
        let mut player = player_at_origin();
        player.update(0.5, &ButtonSet::with(&[Button::KeyQ]));
        assert!((player.camera().yaw - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_set_position_moves_eye() {
        let mut player = player_at_origin();
        player.set_position(Vec3::new(3.0, 2.0, 1.0));
        let target = Vec3::new(3.0, 2.0, 1.0);
        assert!((player.position() - target).length() < 1e-5);
        assert!((player.collider().end - target).length() < 1e-5);
        assert!((player.collider().end.y - player.collider().start.y - 0.65).abs() < 1e-5);
    }

    #[test]
    fn test_disposed_player_is_inert() {
        let mut player = player_at_origin();
        player.dispose();
        player.update(1.0, &ButtonSet::with(&[Button::KeyW]));
        assert!(player.is_disposed());
        assert_eq!(player.position().z, 0.0);
    }
}
