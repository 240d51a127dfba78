use futures::channel::mpsc::UnboundedSender;
use futures::future::LocalBoxFuture;

use crate::animation::AnimationClip;
use crate::error::LoadError;
use crate::scene::SceneGraph;
use crate::types::SceneDescriptor;

/// Bytes read so far for one scene load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadProgress {
    pub loaded: u64,
    /// `None` when the source cannot report a size
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Completion in percent; without a known total, 60 kB count as one percent
    pub fn percent(&self) -> f32 {
        match self.total {
            Some(total) if total > 0 => (self.loaded as f32 / total as f32 * 100.0).min(100.0),
            _ => (self.loaded as f32 / 60_000.0).min(100.0),
        }
    }
}

pub type ProgressSender = UnboundedSender<LoadProgress>;

/// Everything a loader produces for one scene
#[derive(Debug, Default)]
pub struct LoadedScene {
    pub graph: SceneGraph,
    pub clips: Vec<AnimationClip>,
}

/// Asset loader - resolves a descriptor into a scene graph and its clips
pub trait AssetLoader {
    /// The returned future owns everything it needs; progress is best effort
    fn load(
        &self,
        descriptor: &SceneDescriptor,
        progress: ProgressSender,
    ) -> LocalBoxFuture<'static, Result<LoadedScene, LoadError>>;
}
