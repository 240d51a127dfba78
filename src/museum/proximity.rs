use glam::Vec3;
use log::info;

use super::door::DoorStateMachine;

/// Door-crossing detector, latched after it fires until the next scene loads
#[derive(Clone, Debug, PartialEq)]
pub struct ProximityTrigger {
    threshold: f32,
    latched: bool,
}

impl ProximityTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            latched: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn reset(&mut self) {
        self.latched = false;
    }

    /// Returns true exactly once per crossing: player near an open door
    pub fn evaluate(&mut self, door: &DoorStateMachine, player: Option<Vec3>) -> bool {
        if self.latched {
            return false;
        }
        let (Some(bounds), Some(player)) = (door.bounding_volume(), player) else {
            return false;
        };

        let distance = bounds.distance_to_point(player);
        if distance < self.threshold && door.is_open() {
            info!(
                target: "museum::proximity",
                "player {:.2} from open door, requesting transition",
                distance
            );
            self.latched = true;
            return true;
        }
        false
    }
}
