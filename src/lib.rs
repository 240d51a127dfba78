pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod loaders;
pub mod math;
pub mod museum;
pub mod player;
pub mod scene;
pub mod traits;
pub mod types;

pub use config::MuseumConfig;
pub use museum::{Collaborators, SceneTransitionController, TransitionRequest};
