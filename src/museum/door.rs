use std::collections::HashSet;

use log::{debug, info};

use crate::animation::{AnimationClip, AnimationHandle, ClipAction, DoorClipMap};
use crate::math::AABB;
use crate::scene::SceneGraph;
use crate::types::{NodeId, SurfaceRole};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DoorState {
    #[default]
    Closed,
    Open,
}

/// Result of picking a surface while a door is registered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    NotDoor,
    Opening(AnimationHandle),
    Closing(AnimationHandle),
    /// The running animation owns the door until it finishes
    InFlight(AnimationHandle),
    /// Scene carries none of the mapped door clips
    NoAnimation,
}

/// Open/closed state of the scene's door and its single active animation
#[derive(Debug, Default)]
pub struct DoorStateMachine {
    state: DoorState,
    bounds: Option<AABB>,
    surfaces: HashSet<NodeId>,
    actions: Vec<ClipAction>,
    active: Option<AnimationHandle>,
    next_handle: u64,
}

impl DoorStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the machine for a freshly loaded scene; starts `Closed`
    pub fn from_scene(graph: &SceneGraph, clips: &[AnimationClip], clip_map: &DoorClipMap) -> Self {
        let mut surfaces = HashSet::new();
        let mut bounds: Option<AABB> = None;

        for (node, surface) in graph.surfaces_with_role(SurfaceRole::Door) {
            surfaces.insert(node.id);
            if let Some(b) = surface.bounds {
                bounds = Some(bounds.map_or(b, |acc| acc.union(&b)));
            }
        }

        match bounds {
            Some(b) => info!(
                target: "museum::door",
                "door found: {} surfaces, bounds {:?}..{:?}",
                surfaces.len(),
                b.min,
                b.max
            ),
            None => debug!(target: "museum::door", "scene has no door surface"),
        }

        Self {
            bounds,
            surfaces,
            actions: clip_map.resolve(clips),
            ..Self::default()
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    /// True only once the door has finished opening
    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open && self.active.is_none()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_animation(&self) -> Option<AnimationHandle> {
        self.active
    }

    pub fn bounding_volume(&self) -> Option<AABB> {
        self.bounds
    }

    pub fn is_door_surface(&self, node: NodeId) -> bool {
        self.surfaces.contains(&node)
    }

    pub fn door_surfaces(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.surfaces.iter().copied()
    }

    pub fn actions(&self) -> &[ClipAction] {
        &self.actions
    }

    pub fn on_pick(&mut self, node: NodeId) -> PickOutcome {
        if !self.is_door_surface(node) {
            return PickOutcome::NotDoor;
        }

        if let Some(handle) = self.active {
            debug!(target: "museum::door", "pick ignored, animation {:?} in flight", handle);
            return PickOutcome::InFlight(handle);
        }

        if self.actions.is_empty() {
            info!(target: "museum::door", "door picked but no door animation in scene");
            return PickOutcome::NoAnimation;
        }

        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(handle);

        match self.state {
            DoorState::Closed => {
                self.actions.iter_mut().for_each(ClipAction::play_forward);
                self.state = DoorState::Open;
                info!(target: "museum::door", "opening door");
                PickOutcome::Opening(handle)
            }
            DoorState::Open => {
                self.actions.iter_mut().for_each(ClipAction::play_backward);
                self.state = DoorState::Closed;
                info!(target: "museum::door", "closing door");
                PickOutcome::Closing(handle)
            }
        }
    }

    /// Steps every door clip; the active handle clears once every single-shot clip has
    /// finished. Repeating clips keep playing but never hold the door in flight.
    pub fn advance(&mut self, delta: f32) {
        if self.active.is_none() {
            return;
        }

        for action in &mut self.actions {
            action.advance(delta);
        }

        if !self.actions.iter().any(ClipAction::is_pending_finish) {
            debug!(target: "museum::door", "door settled {:?}", self.state);
            self.active = None;
        }
    }

    /// Back to the pre-load default: closed, no geometry, no clips
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
