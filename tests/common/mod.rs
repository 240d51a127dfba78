#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use glam::{Mat4, Vec3};

use virtual_museum::animation::AnimationClip;
use virtual_museum::camera::Camera;
use virtual_museum::error::{ImageError, LoadError, MetadataError};
use virtual_museum::math::AABB;
use virtual_museum::museum::{Collaborators, SceneTransitionController};
use virtual_museum::scene::{SceneGraph, Surface};
use virtual_museum::traits::{
    AssetLoader, ButtonSet, Controller, ImageFetcher, LoadProgress, LoadedScene, MetadataService, MuseumRecord,
    MuseumUi, PlayerController, PlayerFactory, ProgressSender, UploadRequest,
};
use virtual_museum::types::{Capsule, Material, NodeId, SceneDescriptor, SceneId, TextureData};
use virtual_museum::MuseumConfig;

pub const DT: f32 = 1.0 / 60.0;

// --- scene fixtures ---

pub fn add_box(graph: &mut SceneGraph, name: &str, parent: Option<NodeId>, min: Vec3, max: Vec3) -> NodeId {
    let bounds = AABB::new(min, max);
    graph.add_node(
        name,
        parent,
        Mat4::from_translation(bounds.center()),
        Some(Surface::new(Some(bounds), Material::default())),
    )
}

fn door_clips() -> Vec<AnimationClip> {
    vec![
        AnimationClip::new("DoorAction", 1.0),
        AnimationClip::new("HandleAction", 0.5),
        AnimationClip::new("Latch.001Action", 0.5),
        AnimationClip::new("CameraSweep", 8.0),
    ]
}

/// 10×10 room, door on the -Z wall, two frames on the +Z wall
pub fn gallery_scene() -> LoadedScene {
    let mut graph = SceneGraph::new();
    let room = graph.add_node("Room", None, Mat4::IDENTITY, None);
    add_box(&mut graph, "Floor", Some(room), Vec3::new(-5.0, -0.1, -5.0), Vec3::new(5.0, 0.0, 5.0));
    add_box(&mut graph, "Rug_floor", Some(room), Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 0.01, 2.0));
    let door = graph.add_node("Door001", Some(room), Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)), None);
    add_box(&mut graph, "DoorPanel", Some(door), Vec3::new(-0.5, 0.0, -5.1), Vec3::new(0.5, 2.0, -4.9));
    add_box(&mut graph, "Handle", Some(door), Vec3::new(0.3, 0.9, -4.9), Vec3::new(0.4, 1.0, -4.8));
    add_box(&mut graph, "ImageMesh1", Some(room), Vec3::new(-3.0, 1.0, 4.9), Vec3::new(-1.0, 2.0, 5.0));
    add_box(&mut graph, "ImageMesh2", Some(room), Vec3::new(1.0, 1.0, 4.9), Vec3::new(2.0, 3.0, 5.0));
    LoadedScene {
        graph,
        clips: door_clips(),
    }
}

/// Long hallway without a floor-named surface
pub fn hallway_scene() -> LoadedScene {
    let mut graph = SceneGraph::new();
    add_box(&mut graph, "Ground", None, Vec3::new(-2.0, -0.5, -10.0), Vec3::new(2.0, -0.2, 10.0));
    let door = graph.add_node("Door001", None, Mat4::from_translation(Vec3::new(0.0, 0.0, 10.0)), None);
    add_box(&mut graph, "Door", Some(door), Vec3::new(-0.6, 0.0, 9.9), Vec3::new(0.6, 2.2, 10.1));
    add_box(&mut graph, "ImageMesh7", None, Vec3::new(-2.0, 1.0, 0.0), Vec3::new(-1.9, 2.0, 1.5));
    LoadedScene {
        graph,
        clips: door_clips(),
    }
}

pub fn gallery_id() -> SceneId {
    SceneId::new("art_gallery")
}

pub fn louvre_id() -> SceneId {
    SceneId::new("louvre")
}

pub fn record(slot_id: &str, title: &str, image_ref: Option<&str>) -> MuseumRecord {
    MuseumRecord {
        slot_id: slot_id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        image_ref: image_ref.map(str::to_string),
        price: None,
        owner_name: "Ada".to_string(),
    }
}

pub fn texture(width: u32, height: u32) -> TextureData {
    TextureData {
        width,
        height,
        data: vec![255; (width * height * 4) as usize],
    }
}

// --- loader ---

#[derive(Default)]
pub struct LoaderState {
    pub scenes: HashMap<String, fn() -> LoadedScene>,
    pub requests: Vec<SceneId>,
    /// When set, loads wait for `release_load`
    pub gated: bool,
    waiting: Vec<(SceneDescriptor, oneshot::Sender<Result<LoadedScene, LoadError>>)>,
}

impl LoaderState {
    fn build(&self, descriptor: &SceneDescriptor) -> Result<LoadedScene, LoadError> {
        self.scenes
            .get(descriptor.id.as_str())
            .map(|scene| scene())
            .ok_or_else(|| LoadError::Asset {
                path: PathBuf::from(&descriptor.asset_path),
                reason: "no such fixture".to_string(),
            })
    }

    pub fn release_load(&mut self) -> bool {
        if self.waiting.is_empty() {
            return false;
        }
        let (descriptor, sender) = self.waiting.remove(0);
        let _ = sender.send(self.build(&descriptor));
        true
    }
}

pub struct MockLoader(pub Rc<RefCell<LoaderState>>);

impl AssetLoader for MockLoader {
    fn load(
        &self,
        descriptor: &SceneDescriptor,
        progress: ProgressSender,
    ) -> LocalBoxFuture<'static, Result<LoadedScene, LoadError>> {
        let mut state = self.0.borrow_mut();
        state.requests.push(descriptor.id.clone());
        let _ = progress.unbounded_send(LoadProgress {
            loaded: 50,
            total: Some(100),
        });

        let (sender, receiver) = oneshot::channel();
        if state.gated {
            state.waiting.push((descriptor.clone(), sender));
        } else {
            let _ = sender.send(state.build(descriptor));
        }

        let path = PathBuf::from(&descriptor.asset_path);
        async move {
            receiver.await.unwrap_or_else(|_| {
                Err(LoadError::Asset {
                    path,
                    reason: "load abandoned".to_string(),
                })
            })
        }
        .boxed_local()
    }
}

// --- images ---

#[derive(Default)]
pub struct ImageState {
    pub textures: HashMap<String, TextureData>,
    pub requests: Vec<String>,
    pub gated: bool,
    waiting: Vec<(String, oneshot::Sender<Result<TextureData, ImageError>>)>,
}

impl ImageState {
    fn resolve(&self, url: &str) -> Result<TextureData, ImageError> {
        self.textures.get(url).cloned().ok_or_else(|| ImageError::Fetch {
            url: url.to_string(),
            reason: "404".to_string(),
        })
    }

    pub fn release_all(&mut self) {
        for (url, sender) in std::mem::take(&mut self.waiting) {
            let _ = sender.send(self.resolve(&url));
        }
    }
}

pub struct MockImages(pub Rc<RefCell<ImageState>>);

impl ImageFetcher for MockImages {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<TextureData, ImageError>> {
        let mut state = self.0.borrow_mut();
        state.requests.push(url.to_string());

        let (sender, receiver) = oneshot::channel();
        if state.gated {
            state.waiting.push((url.to_string(), sender));
        } else {
            let _ = sender.send(state.resolve(url));
        }

        let url = url.to_string();
        async move {
            receiver.await.unwrap_or_else(|_| {
                Err(ImageError::Fetch {
                    url,
                    reason: "abandoned".to_string(),
                })
            })
        }
        .boxed_local()
    }
}

// --- metadata ---

pub struct MockMetadata(pub Rc<RefCell<HashMap<String, Vec<MuseumRecord>>>>);

impl MetadataService for MockMetadata {
    fn fetch_list(&self, scene: &SceneId) -> LocalBoxFuture<'static, Result<Vec<MuseumRecord>, MetadataError>> {
        let records = self.0.borrow().get(scene.as_str()).cloned().unwrap_or_default();
        future::ready(Ok(records)).boxed_local()
    }
}

// --- ui ---

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ShowLoading,
    HideLoading,
    Progress(f32),
    Toast(String),
    Upload(f32, UploadRequest),
    Menu(bool),
}

pub struct RecordingUi(pub Rc<RefCell<Vec<UiEvent>>>);

impl MuseumUi for RecordingUi {
    fn show_loading(&mut self) {
        self.0.borrow_mut().push(UiEvent::ShowLoading);
    }

    fn hide_loading(&mut self) {
        self.0.borrow_mut().push(UiEvent::HideLoading);
    }

    fn set_progress(&mut self, percent: f32) {
        self.0.borrow_mut().push(UiEvent::Progress(percent));
    }

    fn toast(&mut self, message: &str) {
        self.0.borrow_mut().push(UiEvent::Toast(message.to_string()));
    }

    fn open_upload(&mut self, aspect_ratio: f32, request: UploadRequest) {
        self.0.borrow_mut().push(UiEvent::Upload(aspect_ratio, request));
    }

    fn set_menu_visible(&mut self, visible: bool) {
        self.0.borrow_mut().push(UiEvent::Menu(visible));
    }
}

// --- player ---

#[derive(Default)]
pub struct PlayerLog {
    pub colliders: Vec<Capsule>,
    pub indexed: usize,
    pub disposed: usize,
    pub updates: usize,
}

pub struct MockPlayer {
    camera: Camera,
    log: Rc<RefCell<PlayerLog>>,
}

impl PlayerController for MockPlayer {
    fn update(&mut self, _dt: f32, _input: &dyn Controller) {
        self.log.borrow_mut().updates += 1;
    }

    fn position(&self) -> Vec3 {
        self.camera.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    fn load_spatial_index(&mut self, _graph: &SceneGraph) {
        self.log.borrow_mut().indexed += 1;
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().disposed += 1;
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

pub struct MockPlayers(pub Rc<RefCell<PlayerLog>>);

impl PlayerFactory for MockPlayers {
    fn create(&self, camera: Camera, _graph: &SceneGraph, collider: Capsule) -> Box<dyn PlayerController> {
        self.0.borrow_mut().colliders.push(collider);
        Box::new(MockPlayer {
            camera,
            log: Rc::clone(&self.0),
        })
    }
}

// --- harness ---

pub struct Harness {
    pub museum: SceneTransitionController,
    pub loader: Rc<RefCell<LoaderState>>,
    pub images: Rc<RefCell<ImageState>>,
    pub metadata: Rc<RefCell<HashMap<String, Vec<MuseumRecord>>>>,
    pub ui: Rc<RefCell<Vec<UiEvent>>>,
    pub players: Rc<RefCell<PlayerLog>>,
    pub input: ButtonSet,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MuseumConfig::default())
    }

    pub fn with_config(config: MuseumConfig) -> Self {
        let loader = Rc::new(RefCell::new(LoaderState::default()));
        {
            let mut state = loader.borrow_mut();
            state.scenes.insert("art_gallery".to_string(), gallery_scene);
            state.scenes.insert("louvre".to_string(), hallway_scene);
        }
        let images = Rc::new(RefCell::new(ImageState::default()));
        let metadata = Rc::new(RefCell::new(HashMap::new()));
        let ui = Rc::new(RefCell::new(Vec::new()));
        let players = Rc::new(RefCell::new(PlayerLog::default()));

        let collaborators = Collaborators {
            loader: Box::new(MockLoader(Rc::clone(&loader))),
            images: Box::new(MockImages(Rc::clone(&images))),
            metadata: Box::new(MockMetadata(Rc::clone(&metadata))),
            ui: Box::new(RecordingUi(Rc::clone(&ui))),
            players: Box::new(MockPlayers(Rc::clone(&players))),
        };

        Self {
            museum: SceneTransitionController::new(config, collaborators),
            loader,
            images,
            metadata,
            ui,
            players,
            input: ButtonSet::new(),
        }
    }

    pub fn tick(&mut self) {
        self.museum.tick(DT, &self.input);
    }

    pub fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Starts the configured first scene and lets it mount
    pub fn started(mut self) -> Self {
        self.museum.start();
        self.tick();
        self
    }

    pub fn door_surface(&self) -> NodeId {
        let session = self.museum.session().expect("scene mounted");
        session.door().door_surfaces().min().expect("door surface")
    }

    pub fn place_player(&mut self, position: Vec3) {
        let session = self.museum.session_mut().expect("scene mounted");
        session.player_mut().set_position(position);
    }

    pub fn ui_events(&self) -> Vec<UiEvent> {
        self.ui.borrow().clone()
    }
}
