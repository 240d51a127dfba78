use crate::types::SceneId;

/// Payload handed to the upload UI when an annotation widget is activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub slot_id: String,
    pub scene_id: SceneId,
}

/// Museum UI - loading indicator, toasts, upload modal and scene menu
pub trait MuseumUi {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    /// Load progress in percent, 0..=100
    fn set_progress(&mut self, percent: f32);

    fn toast(&mut self, message: &str);

    /// `aspect_ratio` is the on-screen width/height of the target frame
    fn open_upload(&mut self, aspect_ratio: f32, request: UploadRequest);

    fn set_menu_visible(&mut self, _visible: bool) {}
}
