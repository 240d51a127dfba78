/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    Shift,
    Escape,
    MouseLeft,
}

/// Controller - held button state sampled by the player every sub-step
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

/// Discrete museum actions produced by an input adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MuseumInput {
    /// Pointer click at window pixel coordinates
    Pick { x: f32, y: f32 },
    AnnotationsVisible(bool),
    ToggleMenu,
    Resize { width: f32, height: f32 },
}

/// Plain pressed-button list, used by scripted tours and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonSet {
    pressed: Vec<Button>,
}

impl ButtonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(buttons: &[Button]) -> Self {
        let mut set = Self::new();
        buttons.iter().for_each(|&b| set.press(b));
        set
    }

    pub fn press(&mut self, button: Button) {
        if !self.pressed.contains(&button) {
            self.pressed.push(button);
        }
    }

    pub fn release(&mut self, button: Button) {
        self.pressed.retain(|&b| b != button);
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl Controller for ButtonSet {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed
    }
}
