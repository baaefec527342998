//! Edit mode gate.

/// Boolean gate for layout editing.
///
/// While enabled, interactive layout changes are accepted and widget hosts
/// draw their remove control. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditModeController {
    enabled: bool,
}

impl EditModeController {
    /// Creates a controller with editing disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether editing is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flips the gate and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Sets the gate.
    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
