//! Haptic alert patterns

use super::{Capabilities, Capability};

/// Vibration patterns, alternating on/off durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VibrationPattern {
    Default,
    Warning,
    Critical,
    Success,
    Error,
    Heartbeat,
    Custom(Vec<u32>),
}

impl VibrationPattern {
    /// Looks up a named pattern, falling back to [`VibrationPattern::Default`]
    pub fn named(name: &str) -> Self {
        match name {
            "warning" => VibrationPattern::Warning,
            "critical" => VibrationPattern::Critical,
            "success" => VibrationPattern::Success,
            "error" => VibrationPattern::Error,
            "heartbeat" => VibrationPattern::Heartbeat,
            _ => VibrationPattern::Default,
        }
    }

    pub fn durations(&self) -> &[u32] {
        match self {
            VibrationPattern::Default => &[200, 100, 200],
            VibrationPattern::Warning => &[300, 150, 300, 150, 300],
            VibrationPattern::Critical => &[500, 200, 500, 200, 500],
            VibrationPattern::Success => &[100, 50, 100],
            VibrationPattern::Error => &[1000],
            VibrationPattern::Heartbeat => &[
                100, 30, 100, 30, 100, 200, 200, 30, 200, 30, 200, 200, 100, 30, 100, 30, 100,
            ],
            VibrationPattern::Custom(durations) => durations,
        }
    }
}

/// Platform vibration motor
pub trait Vibrator: Send + Sync {
    fn vibrate(&self, durations: &[u32]);
}

impl Capabilities {
    /// Plays `pattern`; does nothing on devices without vibration
    pub fn vibrate(&self, pattern: &VibrationPattern) {
        if let Capability::Available(vibrator) = &self.vibration {
            vibrator.vibrate(pattern.durations());
        }
    }
}
