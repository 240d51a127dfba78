use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};

use virtual_museum::cli::{Cli, SCENE_ENV};
use virtual_museum::core::LogUi;
use virtual_museum::loaders::{FileImageFetcher, GltfLoader, JsonMetadataService};
use virtual_museum::museum::{Collaborators, SceneTransitionController, SessionToken};
use virtual_museum::player::FirstPersonFactory;
use virtual_museum::traits::{Button, ButtonSet};
use virtual_museum::types::SurfaceRole;
use virtual_museum::MuseumConfig;

const FRAME_DT: f32 = 1.0 / 60.0;

/// Scripted visitor: opens each scene's door once, then walks at it
#[derive(Default)]
struct Tour {
    door_picked: Option<SessionToken>,
}

impl Tour {
    fn step(&mut self, museum: &mut SceneTransitionController, input: &mut ButtonSet) {
        input.clear();
        let Some(session) = museum.session() else {
            return;
        };
        let token = session.token();
        let Some(bounds) = session.door().bounding_volume() else {
            return;
        };

        if self.door_picked != Some(token) {
            let door_surface = session
                .graph()
                .surfaces_with_role(SurfaceRole::Door)
                .map(|(node, _)| node.id)
                .next();
            if let Some(node) = door_surface {
                info!("tour: opening the door");
                museum.pick_surface(node);
                self.door_picked = Some(token);
            }
            return;
        }

        if !session.door().is_open() {
            return;
        }

        let Some(session) = museum.session_mut() else {
            return;
        };
        let player = session.player_mut();
        let to_door = bounds.center() - player.position();
        let flat = Vec3::new(to_door.x, 0.0, to_door.z);
        if flat.length_squared() > f32::EPSILON {
            player.camera_mut().yaw = flat.x.atan2(flat.z);
            input.press(Button::KeyW);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => MuseumConfig::load(path).with_context(|| format!("Failed to load config {:?}", path))?,
        None => MuseumConfig::default(),
    };
    cli.apply(&mut config, std::env::var(SCENE_ENV).ok());
    config.validate().context("Invalid configuration")?;

    let collaborators = Collaborators {
        loader: Box::new(GltfLoader::new(config.assets.root.clone())),
        images: Box::new(FileImageFetcher::new()),
        metadata: Box::new(JsonMetadataService::new(config.assets.metadata_dir.clone())),
        ui: Box::new(LogUi::new()),
        players: Box::new(FirstPersonFactory::new(config.player.clone())),
    };

    let mut museum = SceneTransitionController::new(config, collaborators);
    museum.start();

    let mut input = ButtonSet::new();
    let mut tour = Tour::default();

    for _ in 0..cli.frames {
        if cli.tour {
            tour.step(&mut museum, &mut input);
        }
        museum.tick(FRAME_DT, &input);
    }

    match museum.session() {
        Some(session) => info!(
            "finished in {} with {} annotation slots, door {:?}",
            session.scene_id(),
            session.annotations().len(),
            session.door().state()
        ),
        None => warn!("finished with no scene mounted"),
    }

    Ok(())
}
