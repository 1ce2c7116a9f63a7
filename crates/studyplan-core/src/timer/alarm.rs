//! Alarm modes and expiry directives.
//!
//! The core never touches an audio or vibration device. Expiry produces an
//! [`AlarmDirective`] describing what the presentation layer should do,
//! followed by a fixed delay before the continue-or-stop prompt.

use serde::{Deserialize, Serialize};

/// On/off vibration waveform in milliseconds, starting with a 0 ms lead-in.
pub const VIBRATION_PATTERN_MS: [u64; 8] = [0, 500, 200, 500, 200, 500, 200, 500];

/// Delay between the alarm firing and the continue-or-stop prompt.
pub const POST_ALARM_DELAY_MS: u64 = 4000;

/// How the timer signals expiry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMode {
    #[default]
    Sound,
    Vibrate,
    Silent,
}

impl AlarmMode {
    /// Fixed 3-cycle rotation. A single control toggles through all modes,
    /// regardless of which of the three icons was activated.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            AlarmMode::Sound => AlarmMode::Vibrate,
            AlarmMode::Vibrate => AlarmMode::Silent,
            AlarmMode::Silent => AlarmMode::Sound,
        }
    }

    /// The directive to hand the presentation layer on expiry.
    pub fn directive(self) -> AlarmDirective {
        match self {
            AlarmMode::Sound => AlarmDirective::SoundPulse,
            AlarmMode::Vibrate => AlarmDirective::Vibrate {
                pattern_ms: VIBRATION_PATTERN_MS.to_vec(),
            },
            AlarmMode::Silent => AlarmDirective::Silence,
        }
    }
}

impl std::str::FromStr for AlarmMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sound" => Ok(AlarmMode::Sound),
            "vibrate" => Ok(AlarmMode::Vibrate),
            "silent" => Ok(AlarmMode::Silent),
            other => Err(format!("unknown alarm mode '{other}'")),
        }
    }
}

/// Rendering directive emitted when a countdown expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlarmDirective {
    /// Play the alarm sound once.
    SoundPulse,
    /// Vibrate with the given on/off waveform.
    Vibrate { pattern_ms: Vec<u64> },
    /// Do nothing.
    Silence,
}
