//! Scene lifecycle: one mounted scene session at a time, swapped through the door.
//!
//! Every asynchronous collaborator returns a `'static` local future. The
//! controller owns those futures and polls them once per tick with a no-op
//! waker, so a frame never blocks. Completions are tagged with the session
//! token they were issued under and dropped when that session is gone.

use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::noop_waker_ref;
use glam::Vec2;
use log::{debug, error, info, warn};

use super::annotations::AnnotationRegistry;
use super::door::{DoorStateMachine, PickOutcome};
use super::proximity::ProximityTrigger;
use crate::camera::Camera;
use crate::config::MuseumConfig;
use crate::error::{AnnotationError, ImageError, LoadError, MetadataError};
use crate::scene::SceneGraph;
use crate::traits::{
    AssetLoader, Controller, ImageFetcher, LoadProgress, LoadedScene, MetadataService, MuseumInput,
    MuseumRecord, MuseumUi, PlayerController, PlayerFactory, UploadEvent, UploadRequest,
};
use crate::types::{Capsule, Material, NodeId, SceneDescriptor, SceneId, SpawnPoint, SurfaceRole, TextureData};

/// Screen distance, in pixels, within which a click lands on an annotation widget
pub const WIDGET_PICK_RADIUS: f32 = 16.0;

/// External services the controller drives
pub struct Collaborators {
    pub loader: Box<dyn AssetLoader>,
    pub images: Box<dyn ImageFetcher>,
    pub metadata: Box<dyn MetadataService>,
    pub ui: Box<dyn MuseumUi>,
    pub players: Box<dyn PlayerFactory>,
}

/// Identifies one load attempt and the session it mounts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another load is still running
    InFlight,
    AlreadyCurrent,
    UnknownScene,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionRequest {
    Started,
    Ignored(IgnoreReason),
}

/// What a pointer pick landed on
#[derive(Clone, Debug, PartialEq)]
pub enum PickTarget {
    Nothing,
    Door(PickOutcome),
    Annotation(String),
    Surface(NodeId),
}

/// Everything that belongs to the mounted scene; dropped as a unit on transition
pub struct SceneSession {
    token: SessionToken,
    descriptor: SceneDescriptor,
    graph: SceneGraph,
    door: DoorStateMachine,
    annotations: AnnotationRegistry,
    spawn: SpawnPoint,
    player: Box<dyn PlayerController>,
}

impl SceneSession {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn descriptor(&self) -> &SceneDescriptor {
        &self.descriptor
    }

    pub fn scene_id(&self) -> &SceneId {
        &self.descriptor.id
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn door(&self) -> &DoorStateMachine {
        &self.door
    }

    pub fn annotations(&self) -> &AnnotationRegistry {
        &self.annotations
    }

    pub fn spawn(&self) -> &SpawnPoint {
        &self.spawn
    }

    pub fn player(&self) -> &dyn PlayerController {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> &mut dyn PlayerController {
        self.player.as_mut()
    }
}

struct PendingLoad {
    token: SessionToken,
    descriptor: SceneDescriptor,
    future: LocalBoxFuture<'static, Result<LoadedScene, LoadError>>,
    progress: UnboundedReceiver<LoadProgress>,
}

enum Completion {
    Metadata {
        token: SessionToken,
        result: Result<Vec<MuseumRecord>, MetadataError>,
    },
    Image {
        token: SessionToken,
        slot_id: String,
        url: String,
        result: Result<TextureData, ImageError>,
    },
}

pub struct SceneTransitionController {
    config: MuseumConfig,
    collaborators: Collaborators,
    session: Option<SceneSession>,
    pending: Option<PendingLoad>,
    tasks: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
    proximity: ProximityTrigger,
    next_token: u64,
    camera: Camera,
    viewport: Vec2,
    annotations_visible: bool,
    menu_open: bool,
}

impl SceneTransitionController {
    pub fn new(config: MuseumConfig, collaborators: Collaborators) -> Self {
        let proximity = ProximityTrigger::new(config.door.proximity_threshold);
        let viewport = Vec2::new(1280.0, 720.0);
        let mut camera = Camera::default();
        camera.set_aspect(viewport.x, viewport.y);

        Self {
            config,
            collaborators,
            session: None,
            pending: None,
            tasks: FuturesUnordered::new(),
            proximity,
            next_token: 0,
            camera,
            viewport,
            annotations_visible: true,
            menu_open: false,
        }
    }

    /// Loads the configured start scene
    pub fn start(&mut self) -> TransitionRequest {
        let start = self.config.scenes.start.clone();
        self.transition_to(&start)
    }

    /// Disposes the mounted scene and starts loading `id`
    pub fn transition_to(&mut self, id: &SceneId) -> TransitionRequest {
        if let Some(pending) = &self.pending {
            debug!(
                target: "museum::transition",
                "ignoring transition to {}, {} still loading",
                id,
                pending.descriptor.id
            );
            return TransitionRequest::Ignored(IgnoreReason::InFlight);
        }

        let Some(descriptor) = self.config.scene(id).cloned() else {
            warn!(target: "museum::transition", "unknown scene {}", id);
            return TransitionRequest::Ignored(IgnoreReason::UnknownScene);
        };

        if self.current_scene() == Some(id) {
            debug!(target: "museum::transition", "{} is already mounted", id);
            return TransitionRequest::Ignored(IgnoreReason::AlreadyCurrent);
        }

        self.collaborators.ui.show_loading();
        self.dispose_session();

        let token = SessionToken(self.next_token);
        self.next_token += 1;

        let (sender, progress) = mpsc::unbounded();
        let future = self.collaborators.loader.load(&descriptor, sender);
        info!(
            target: "museum::transition",
            "loading {} from {} ({:?})",
            descriptor.id,
            descriptor.asset_path,
            token
        );

        self.pending = Some(PendingLoad {
            token,
            descriptor,
            future,
            progress,
        });
        TransitionRequest::Started
    }

    fn dispose_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        session.player.dispose();
        let widgets = session.annotations.clear();
        let stats = session.graph.dispose();
        session.door.reset();

        info!(
            target: "museum::transition",
            "disposed {}: {} nodes, {} surfaces, {} textures, {} widgets",
            session.descriptor.id,
            stats.nodes,
            stats.surfaces,
            stats.textures,
            widgets
        );
    }

    /// Drives outstanding loads and background tasks without blocking
    pub fn poll(&mut self) {
        self.poll_load();
        self.poll_tasks();
    }

    fn poll_load(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let mut cx = Context::from_waker(noop_waker_ref());
        let status = pending.future.poll_unpin(&mut cx);

        while let Poll::Ready(Some(progress)) = pending.progress.poll_next_unpin(&mut cx) {
            self.collaborators.ui.set_progress(progress.percent());
        }

        let Poll::Ready(result) = status else {
            return;
        };
        let Some(PendingLoad { token, descriptor, .. }) = self.pending.take() else {
            return;
        };

        match result {
            Ok(scene) => self.mount(token, descriptor, scene),
            Err(err) => {
                error!(target: "museum::transition", "failed to load {}: {}", descriptor.id, err);
                self.collaborators
                    .ui
                    .toast("An error occurred loading the model. Please check the log for details.");
                self.collaborators.ui.hide_loading();
            }
        }
    }

    fn mount(&mut self, token: SessionToken, descriptor: SceneDescriptor, scene: LoadedScene) {
        let LoadedScene { mut graph, clips } = scene;

        let tagged = self.config.surfaces.classify(&mut graph);
        let door = DoorStateMachine::from_scene(&graph, &clips, &self.config.door.clips);

        let mut annotations = AnnotationRegistry::new(self.annotations_visible);
        let slots: Vec<(String, NodeId)> = graph
            .surfaces_with_role(SurfaceRole::Annotation)
            .map(|(node, _)| (node.name.clone(), node.id))
            .collect();
        for (slot_id, node) in slots {
            // Multi-material frames split into same-named surfaces; the first one owns the slot
            if annotations.get(&slot_id).is_some() {
                debug!(target: "museum::transition", "{} already registered, skipping {:?}", slot_id, node);
                continue;
            }
            // Surfaces without geometry are logged and skipped by the registry
            let _ = annotations.register(&slot_id, node, &mut graph);
        }

        let handles: Vec<NodeId> = graph
            .surfaces_with_role(SurfaceRole::Handle)
            .map(|(node, _)| node.id)
            .collect();
        for handle in handles {
            graph.set_material(handle, Material::handle_trim());
        }

        let spawn = self.config.spawn.resolver().resolve_for(&descriptor, &graph);
        let collider = Capsule::standing_at(spawn.position, self.config.player.height, self.config.player.radius);

        let mut camera = self.camera.clone();
        camera.position = collider.end;
        camera.yaw = spawn.heading;
        camera.pitch = 0.0;

        let mut player = self.collaborators.players.create(camera, &graph, collider);
        player.load_spatial_index(&graph);
        self.collaborators.ui.hide_loading();

        let metadata = self.collaborators.metadata.fetch_list(&descriptor.id);
        self.tasks
            .push(async move { Completion::Metadata { token, result: metadata.await } }.boxed_local());

        info!(
            target: "museum::transition",
            "mounted {}: {} surfaces tagged, {} annotation slots, spawn {:?} ({:?})",
            descriptor.id,
            tagged,
            annotations.len(),
            spawn.position,
            spawn.source
        );

        self.session = Some(SceneSession {
            token,
            descriptor,
            graph,
            door,
            annotations,
            spawn,
            player,
        });
        self.proximity.reset();
    }

    fn poll_tasks(&mut self) {
        let mut cx = Context::from_waker(noop_waker_ref());
        while let Poll::Ready(Some(completion)) = self.tasks.poll_next_unpin(&mut cx) {
            self.apply_completion(completion);
        }
    }

    fn session_for(&mut self, token: SessionToken) -> Option<&mut SceneSession> {
        self.session.as_mut().filter(|s| s.token == token)
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Metadata { token, result } => {
                if self.session_for(token).is_none() {
                    debug!(target: "museum::transition", "dropping metadata for stale session {:?}", token);
                    return;
                }
                match result {
                    Ok(records) => records.iter().for_each(|record| self.apply_record(record)),
                    Err(err) => warn!(target: "museum::transition", "metadata unavailable: {}", err),
                }
            }
            Completion::Image {
                token,
                slot_id,
                url,
                result,
            } => {
                let Some(session) = self.session_for(token) else {
                    debug!(target: "museum::transition", "dropping image {} for stale session {:?}", url, token);
                    return;
                };
                let _ = session
                    .annotations
                    .complete_image(&slot_id, &url, result, &mut session.graph);
            }
        }
    }

    fn apply_record(&mut self, record: &MuseumRecord) {
        let registered = self
            .session
            .as_ref()
            .is_some_and(|s| s.annotations.get(&record.slot_id).is_some());
        if !registered {
            debug!(target: "museum::transition", "no slot {} in this scene", record.slot_id);
            return;
        }

        let image_ref = record.image_ref.as_deref();
        if self
            .set_content(&record.slot_id, &record.title, &record.description, &record.owner_name, image_ref)
            .is_err()
        {
            return;
        }
        if let Some(image_ref) = image_ref {
            let url = format!("{}{}", self.config.assets.image_base, image_ref);
            let _ = self.bind_image(&record.slot_id, &url);
        }
    }

    /// Fills a slot of the mounted scene; slots of other scenes are rejected untouched
    pub fn set_content(
        &mut self,
        slot_id: &str,
        title: &str,
        description: &str,
        owner_name: &str,
        image_ref: Option<&str>,
    ) -> Result<(), AnnotationError> {
        let session = self.mounted(slot_id)?;
        session
            .annotations
            .set_content(slot_id, title, description, owner_name, image_ref)
    }

    /// Starts fetching `url` for a slot; the result lands on a later tick
    pub fn bind_image(&mut self, slot_id: &str, url: &str) -> Result<(), AnnotationError> {
        let session = self.mounted(slot_id)?;
        session.annotations.begin_image(slot_id, url)?;
        let token = session.token;

        let fetch = self.collaborators.images.fetch(url);
        let (slot_id, url) = (slot_id.to_string(), url.to_string());
        self.tasks.push(
            async move {
                Completion::Image {
                    token,
                    slot_id,
                    url,
                    result: fetch.await,
                }
            }
            .boxed_local(),
        );
        Ok(())
    }

    /// Routes content submitted through the upload UI
    pub fn apply_upload(&mut self, upload: &UploadEvent) -> Result<(), AnnotationError> {
        self.set_content(
            &upload.slot_id,
            &upload.title,
            &upload.description,
            &upload.owner_name,
            Some(upload.image_url.as_str()),
        )?;
        self.bind_image(&upload.slot_id, &upload.image_url)
    }

    fn mounted(&mut self, slot_id: &str) -> Result<&mut SceneSession, AnnotationError> {
        self.session.as_mut().ok_or_else(|| {
            warn!(target: "museum::transition", "no scene mounted for slot {}", slot_id);
            AnnotationError::UnknownSlot(slot_id.to_string())
        })
    }

    /// One frame: poll async work, step the player, advance the door, then check the door crossing.
    ///
    /// The player runs `substeps` steps of the clamped frame time; door clips advance
    /// once per frame by a single step scaled by the animation speed.
    pub fn tick(&mut self, dt: f32, input: &dyn Controller) {
        let timing = &self.config.timing;
        let steps = timing.substeps.max(1);
        let step = dt.clamp(0.0, timing.max_dt) / steps as f32;
        let door_step = step * self.config.door.animation_speed;

        self.poll();

        if let Some(session) = self.session.as_mut() {
            for _ in 0..steps {
                session.player.update(step, input);
            }
            session.door.advance(door_step);
        }

        self.evaluate_proximity();
    }

    fn evaluate_proximity(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let position = Some(session.player.position());
        if !self.proximity.evaluate(&session.door, position) {
            return;
        }

        let current = session.descriptor.id.clone();
        match self.config.alternate_scene(&current).cloned() {
            Some(next) => {
                self.transition_to(&next);
            }
            None => warn!(target: "museum::transition", "{} has no scene behind its door", current),
        }
    }

    pub fn handle_input(&mut self, input: MuseumInput) {
        match input {
            MuseumInput::Pick { x, y } => {
                self.pick_at(x, y);
            }
            MuseumInput::AnnotationsVisible(visible) => self.set_annotations_visible(visible),
            MuseumInput::ToggleMenu => self.toggle_menu(),
            MuseumInput::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Resolves a click: visible annotation widgets first, then the nearest surface
    pub fn pick_at(&mut self, x: f32, y: f32) -> PickTarget {
        let Some(session) = self.session.as_ref() else {
            return PickTarget::Nothing;
        };
        let camera = session.player.camera();
        let (width, height) = (self.viewport.x, self.viewport.y);
        let click = Vec2::new(x, y);

        if self.annotations_visible {
            let widget = session
                .annotations
                .iter()
                .filter_map(|slot| {
                    let pixel = camera.project_to_screen(slot.widget.anchor, width, height)?;
                    let distance = pixel.distance(click);
                    (distance <= WIDGET_PICK_RADIUS).then(|| (slot.slot_id.clone(), distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((slot_id, _)) = widget {
                let _ = self.activate_annotation(&slot_id);
                return PickTarget::Annotation(slot_id);
            }
        }

        let ray = camera.screen_ray(x, y, width, height);
        match session.graph.raycast(&ray) {
            Some(hit) => self.pick_surface(hit.node),
            None => PickTarget::Nothing,
        }
    }

    /// Applies a pick to a known surface
    pub fn pick_surface(&mut self, node: NodeId) -> PickTarget {
        let Some(session) = self.session.as_mut() else {
            return PickTarget::Nothing;
        };
        match session.door.on_pick(node) {
            PickOutcome::NotDoor => PickTarget::Surface(node),
            outcome => PickTarget::Door(outcome),
        }
    }

    /// Opens the upload UI for a slot, sized to the frame's on-screen aspect ratio
    pub fn activate_annotation(&mut self, slot_id: &str) -> Result<UploadRequest, AnnotationError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AnnotationError::UnknownSlot(slot_id.to_string()))?;
        let slot = session
            .annotations
            .get(slot_id)
            .ok_or_else(|| AnnotationError::UnknownSlot(slot_id.to_string()))?;
        let bounds = session
            .graph
            .surface(slot.surface)
            .and_then(|s| s.bounds)
            .ok_or_else(|| AnnotationError::MissingGeometry(slot_id.to_string()))?;

        let aspect_ratio = session
            .player
            .camera()
            .projected_size(&bounds, self.viewport.x, self.viewport.y)
            .filter(|size| size.y > 0.0)
            .map_or(1.0, |size| size.x / size.y);

        let request = UploadRequest {
            slot_id: slot_id.to_string(),
            scene_id: session.descriptor.id.clone(),
        };
        info!(target: "museum::transition", "activated {} (aspect {:.3})", slot_id, aspect_ratio);
        self.collaborators.ui.open_upload(aspect_ratio, request.clone());
        Ok(request)
    }

    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
        if let Some(session) = self.session.as_mut() {
            session.annotations.set_visibility(visible);
        }
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        self.collaborators.ui.set_menu_visible(self.menu_open);
    }

    pub fn menu_entries(&self) -> &[SceneDescriptor] {
        &self.config.scenes.registry
    }

    /// Closes the menu and transitions to the chosen entry
    pub fn select_menu_entry(&mut self, index: usize) -> TransitionRequest {
        if self.menu_open {
            self.toggle_menu();
        }
        match self.config.scenes.registry.get(index).map(|d| d.id.clone()) {
            Some(id) => self.transition_to(&id),
            None => TransitionRequest::Ignored(IgnoreReason::UnknownScene),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = Vec2::new(width, height);
        self.camera.set_aspect(width, height);
        if let Some(session) = self.session.as_mut() {
            session.player.camera_mut().set_aspect(width, height);
        }
    }

    pub fn session(&self) -> Option<&SceneSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SceneSession> {
        self.session.as_mut()
    }

    pub fn current_scene(&self) -> Option<&SceneId> {
        self.session.as_ref().map(SceneSession::scene_id)
    }

    /// True while a load holds the transition guard
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn loading_scene(&self) -> Option<&SceneId> {
        self.pending.as_ref().map(|p| &p.descriptor.id)
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn proximity(&self) -> &ProximityTrigger {
        &self.proximity
    }

    pub fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn config(&self) -> &MuseumConfig {
        &self.config
    }
}
