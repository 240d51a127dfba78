//! Keyframe clip playback for scene animations.
//!
//! Only timing is tracked here. Pose evaluation belongs to the renderer, which
//! samples each clip at [`ClipAction::time`].

use log::debug;
use serde::{Deserialize, Serialize};

/// Named clip found in a loaded model
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds
    pub duration: f32,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopPolicy {
    #[default]
    Once,
    Repeat,
}

/// Identifies one door animation run; a new handle is issued per pick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u64);

/// Playback state of one clip
#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    clip: String,
    duration: f32,
    time: f32,
    time_scale: f32,
    loop_policy: LoopPolicy,
    clamp_when_finished: bool,
    running: bool,
}

impl ClipAction {
    pub fn new(clip: &AnimationClip, loop_policy: LoopPolicy, clamp_when_finished: bool) -> Self {
        Self {
            clip: clip.name.clone(),
            duration: clip.duration.max(0.0),
            time: 0.0,
            time_scale: 1.0,
            loop_policy,
            clamp_when_finished,
            running: false,
        }
    }

    pub fn clip(&self) -> &str {
        &self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn loop_policy(&self) -> LoopPolicy {
        self.loop_policy
    }

    /// Running a single-shot clip that has not reached its end yet
    pub fn is_pending_finish(&self) -> bool {
        self.running && self.loop_policy == LoopPolicy::Once
    }

    /// Restart from the first frame
    pub fn play_forward(&mut self) {
        self.time = 0.0;
        self.time_scale = 1.0;
        self.running = true;
    }

    /// Restart from the last frame, playing in reverse
    pub fn play_backward(&mut self) {
        self.time = self.duration;
        self.time_scale = -1.0;
        self.running = true;
    }

    /// Advances by `delta` seconds; returns true on the step that finishes a single-shot run
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.running {
            return false;
        }

        self.time += delta * self.time_scale;

        match self.loop_policy {
            LoopPolicy::Repeat => {
                if self.duration > 0.0 {
                    self.time = self.time.rem_euclid(self.duration);
                }
                false
            }
            LoopPolicy::Once => {
                let finished = if self.time_scale >= 0.0 {
                    self.time >= self.duration
                } else {
                    self.time <= 0.0
                };

                if finished {
                    self.running = false;
                    self.time = if self.clamp_when_finished {
                        self.time.clamp(0.0, self.duration)
                    } else {
                        0.0
                    };
                }
                finished
            }
        }
    }
}

/// Declarative binding of the door role to its clips, resolved once per load
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorClipMap {
    pub clips: Vec<String>,
    pub loop_policy: LoopPolicy,
    pub clamp_when_finished: bool,
}

impl Default for DoorClipMap {
    fn default() -> Self {
        Self {
            clips: vec![
                "DoorAction".to_string(),
                "HandleAction".to_string(),
                "Latch.001Action".to_string(),
            ],
            loop_policy: LoopPolicy::Once,
            clamp_when_finished: true,
        }
    }
}

impl DoorClipMap {
    /// One action per listed clip present in `clips`; missing names are skipped
    pub fn resolve(&self, clips: &[AnimationClip]) -> Vec<ClipAction> {
        let actions: Vec<ClipAction> = clips
            .iter()
            .filter(|clip| self.clips.iter().any(|name| *name == clip.name))
            .map(|clip| ClipAction::new(clip, self.loop_policy, self.clamp_when_finished))
            .collect();

        debug!(
            target: "museum::door",
            "resolved {} of {} door clips from {} available",
            actions.len(),
            self.clips.len(),
            clips.len()
        );
        actions
    }
}
