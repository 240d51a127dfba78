// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::MuseumConfig;
use crate::types::SceneId;

/// Environment variable naming the first scene to load
pub const SCENE_ENV: &str = "MUSEUM_SCENE";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "virtual-museum")]
#[command(about = "Headless virtual museum walkthrough", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory scene asset paths are resolved against
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Scene to load first (overrides MUSEUM_SCENE)
    #[arg(long)]
    pub scene: Option<String>,

    /// Number of frames to simulate at 60 Hz
    #[arg(long, default_value_t = 600)]
    pub frames: u32,

    /// Open the door and walk through it in every scene
    #[arg(long, default_value = "false")]
    pub tour: bool,

    /// Directory holding `<scene id>.json` metadata lists
    #[arg(long)]
    pub metadata: Option<PathBuf>,
}

impl Cli {
    /// Layers flags over `config`; the flag wins over `env_scene`, which wins over the file
    pub fn apply(&self, config: &mut MuseumConfig, env_scene: Option<String>) {
        if let Some(assets) = &self.assets {
            config.assets.root = assets.clone();
        }
        if let Some(metadata) = &self.metadata {
            config.assets.metadata_dir = metadata.clone();
        }
        if let Some(scene) = self.scene.clone().or(env_scene) {
            config.scenes.start = SceneId::new(scene);
        }
    }
}
