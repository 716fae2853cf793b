//! Volume state
//!
//! Volume is a float in [0, 1] with an independent mute flag. Muting never
//! alters the stored level; the effective output gain is what the audio
//! driver applies to the output resource.

/// Volume level with independent mute
#[derive(Debug, Clone)]
pub struct Volume {
    /// Stored level in [0, 1]
    level: f32,

    /// Mute state (preserves the level)
    muted: bool,
}

impl Volume {
    /// Create a volume control, clamping the level into [0, 1]
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set the level, clamping into [0, 1]
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    /// Stored level, unaffected by mute
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain to apply to the output resource: 0 when muted, else the level
    pub fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
