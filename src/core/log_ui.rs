use log::{info, warn};

use crate::traits::{MuseumUi, UploadRequest};

/// Headless UI that reports through the log
#[derive(Debug, Default)]
pub struct LogUi {
    loading: bool,
    last_percent: Option<u32>,
}

impl LogUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl MuseumUi for LogUi {
    fn show_loading(&mut self) {
        self.loading = true;
        self.last_percent = None;
        info!(target: "museum::ui", "loading...");
    }

    fn hide_loading(&mut self) {
        self.loading = false;
        info!(target: "museum::ui", "loading done");
    }

    fn set_progress(&mut self, percent: f32) {
        // Only whole-percent changes are worth a line
        let whole = percent.clamp(0.0, 100.0) as u32;
        if self.last_percent != Some(whole) {
            self.last_percent = Some(whole);
            info!(target: "museum::ui", "progress {}%", whole);
        }
    }

    fn toast(&mut self, message: &str) {
        warn!(target: "museum::ui", "{}", message);
    }

    fn open_upload(&mut self, aspect_ratio: f32, request: UploadRequest) {
        info!(
            target: "museum::ui",
            "upload requested for {} in {} (aspect {:.3})",
            request.slot_id,
            request.scene_id,
            aspect_ratio
        );
    }

    fn set_menu_visible(&mut self, visible: bool) {
        info!(target: "museum::ui", "menu {}", if visible { "shown" } else { "hidden" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_flag_follows_calls() {
        let mut ui = LogUi::new();
        ui.show_loading();
        ui.set_progress(42.7);
        assert!(ui.is_loading());
        assert_eq!(ui.last_percent, Some(42));
        ui.hide_loading();
        assert!(!ui.is_loading());
    }
}
