use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec3;
use log::{debug, info, warn};

use crate::error::{AnnotationError, ImageError};
use crate::scene::SceneGraph;
use crate::types::{Material, NodeId, TextureData};

/// Text shown by an annotation widget
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationContent {
    pub title: String,
    pub description: String,
    pub owner_name: String,
    pub image_ref: Option<String>,
}

/// Progress of the image bound to a slot's surface
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImageBinding {
    #[default]
    Empty,
    Pending(String),
    Bound(String),
    Failed(String),
}

/// On-screen hotspot anchored at a surface's world-space center
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationWidget {
    pub index: usize,
    pub anchor: Vec3,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationSlot {
    pub slot_id: String,
    pub surface: NodeId,
    pub widget: AnnotationWidget,
    pub content: Option<AnnotationContent>,
    pub image: ImageBinding,
}

/// Scene-scoped map from slot id to widget and target surface
#[derive(Debug)]
pub struct AnnotationRegistry {
    slots: BTreeMap<String, AnnotationSlot>,
    visible: bool,
}

impl Default for AnnotationRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AnnotationRegistry {
    pub fn new(visible: bool) -> Self {
        Self {
            slots: BTreeMap::new(),
            visible,
        }
    }

    /// Creates an empty slot and its widget, and blanks the surface's material
    pub fn register(
        &mut self,
        slot_id: &str,
        surface: NodeId,
        graph: &mut SceneGraph,
    ) -> Result<&AnnotationSlot, AnnotationError> {
        let Some(bounds) = graph.surface(surface).and_then(|s| s.bounds) else {
            warn!(target: "museum::annotations", "skipping {}: surface has no geometry", slot_id);
            return Err(AnnotationError::MissingGeometry(slot_id.to_string()));
        };

        graph.set_material(surface, Material::blank_canvas());

        let slot = AnnotationSlot {
            slot_id: slot_id.to_string(),
            surface,
            widget: AnnotationWidget {
                index: self.slots.len(),
                anchor: bounds.center(),
                opacity: self.opacity(),
            },
            content: None,
            image: ImageBinding::Empty,
        };

        debug!(target: "museum::annotations", "registered {} at {:?}", slot_id, slot.widget.anchor);
        self.slots.insert(slot_id.to_string(), slot);
        self.slots
            .get(slot_id)
            .ok_or_else(|| AnnotationError::UnknownSlot(slot_id.to_string()))
    }

    pub fn set_content(
        &mut self,
        slot_id: &str,
        title: &str,
        description: &str,
        owner_name: &str,
        image_ref: Option<&str>,
    ) -> Result<(), AnnotationError> {
        let slot = self.slot_mut(slot_id)?;
        slot.content = Some(AnnotationContent {
            title: title.to_string(),
            description: description.to_string(),
            owner_name: owner_name.to_string(),
            image_ref: image_ref.map(str::to_string),
        });
        Ok(())
    }

    /// Marks `url` as the image the slot is waiting for; returns the target surface
    pub fn begin_image(&mut self, slot_id: &str, url: &str) -> Result<NodeId, AnnotationError> {
        let slot = self.slot_mut(slot_id)?;
        slot.image = ImageBinding::Pending(url.to_string());
        Ok(slot.surface)
    }

    /// Applies a fetched image, or the error visual, to the slot's surface.
    ///
    /// Results for a url the slot is no longer waiting on are dropped.
    pub fn complete_image(
        &mut self,
        slot_id: &str,
        url: &str,
        result: Result<TextureData, ImageError>,
        graph: &mut SceneGraph,
    ) -> Result<(), AnnotationError> {
        let slot = self.slot_mut(slot_id)?;
        if slot.image != ImageBinding::Pending(url.to_string()) {
            debug!(target: "museum::annotations", "dropping superseded image {} for {}", url, slot_id);
            return Ok(());
        }

        match result {
            Ok(texture) => {
                info!(
                    target: "museum::annotations",
                    "bound {}x{} image to {}",
                    texture.width,
                    texture.height,
                    slot_id
                );
                graph.set_material(slot.surface, Material::image(Rc::new(texture)));
                slot.image = ImageBinding::Bound(url.to_string());
            }
            Err(err) => {
                warn!(target: "museum::annotations", "image for {} failed: {}", slot_id, err);
                graph.set_material(slot.surface, Material::load_error());
                slot.image = ImageBinding::Failed(url.to_string());
            }
        }
        Ok(())
    }

    /// Shows or hides every widget without creating or destroying any
    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
        let opacity = self.opacity();
        for slot in self.slots.values_mut() {
            slot.widget.opacity = opacity;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Destroys every widget and slot, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.slots.len();
        self.slots.clear();
        removed
    }

    pub fn get(&self, slot_id: &str) -> Option<&AnnotationSlot> {
        self.slots.get(slot_id)
    }

    pub fn slot_for_surface(&self, surface: NodeId) -> Option<&AnnotationSlot> {
        self.slots.values().find(|s| s.surface == surface)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationSlot> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn opacity(&self) -> f32 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }

    fn slot_mut(&mut self, slot_id: &str) -> Result<&mut AnnotationSlot, AnnotationError> {
        self.slots.get_mut(slot_id).ok_or_else(|| {
            warn!(target: "museum::annotations", "unknown annotation slot {}", slot_id);
            AnnotationError::UnknownSlot(slot_id.to_string())
        })
    }
}
