/// Engine tuning: reveal speed, dialogue box size, mouth and voice cadence.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::voice::VoiceId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Mouth flap timing and sprite pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouthConfig {
    /// Shortest time a mouth frame stays up, in seconds.
    pub min_duration: f64,
    /// Longest time a mouth frame stays up, in seconds.
    pub max_duration: f64,
    /// Number of open-mouth sprites. A closed mouth is extra.
    pub sprite_count: u32,
    /// How many recent frames sit out before they can come up again.
    pub cooldown: usize,
}

impl Default for MouthConfig {
    fn default() -> Self {
        Self {
            min_duration: 0.08,
            max_duration: 0.15,
            sprite_count: 3,
            cooldown: 1,
        }
    }
}

/// Voice babble timing and clip layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub voice: VoiceId,
    /// Gap after a speed-1 piece, in seconds.
    pub piece_duration: f64,
    pub num_speeds: u32,
    pub pieces_per_style: u32,
    /// How many recent pieces sit out before they can play again.
    pub piece_cooldown: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice: VoiceId(1),
            piece_duration: 0.2,
            num_speeds: 3,
            pieces_per_style: 8,
            piece_cooldown: 2,
        }
    }
}

/// Everything the dialogue engine can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between revealed characters.
    pub char_duration: f64,
    /// Seconds between revealed characters while fire is held.
    pub fast_char_duration: f64,
    /// Dialogue box width in characters.
    pub max_line_length: usize,
    /// Dialogue box height in lines, including the row for the marker.
    pub max_visible_lines: usize,
    /// Appended to a page that has a follow-up page.
    pub continued_marker: String,
    pub mouth: MouthConfig,
    pub voice: VoiceConfig,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            char_duration: 0.04,
            fast_char_duration: 0.0,
            max_line_length: 28,
            max_visible_lines: 17,
            continued_marker: "\n< Continued... >".to_string(),
            mouth: MouthConfig::default(),
            voice: VoiceConfig::default(),
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall the engine or drain a sampler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.max_line_length == 0 {
            return invalid("max_line_length must be at least 1".to_string());
        }
        if self.max_visible_lines < 2 {
            return invalid(format!(
                "max_visible_lines must be at least 2 (one row is kept for the marker), got {}",
                self.max_visible_lines
            ));
        }
        if !(self.char_duration >= 0.0 && self.fast_char_duration >= 0.0) {
            return invalid("character durations must be non-negative".to_string());
        }

        let mouth = &self.mouth;
        if !(mouth.min_duration >= 0.0 && mouth.min_duration <= mouth.max_duration) {
            return invalid(format!(
                "mouth durations must satisfy 0 <= min <= max, got {}..{}",
                mouth.min_duration, mouth.max_duration
            ));
        }
        // Sampler pools hold i32 ids.
        if i32::try_from(mouth.sprite_count).is_err() {
            return invalid(format!(
                "mouth sprite_count {} is too large",
                mouth.sprite_count
            ));
        }
        // The closed mouth is one more frame in the pool.
        if mouth.cooldown > mouth.sprite_count as usize {
            return invalid(format!(
                "mouth cooldown {} needs more than {} frames",
                mouth.cooldown,
                mouth.sprite_count + 1
            ));
        }

        let voice = &self.voice;
        if voice.num_speeds == 0 {
            return invalid("voice needs at least one speed".to_string());
        }
        if i32::try_from(voice.pieces_per_style).is_err() {
            return invalid(format!(
                "voice pieces_per_style {} is too large",
                voice.pieces_per_style
            ));
        }
        if voice.piece_cooldown >= voice.pieces_per_style as usize {
            return invalid(format!(
                "voice piece cooldown {} needs more than {} pieces",
                voice.piece_cooldown, voice.pieces_per_style
            ));
        }
        if !(voice.piece_duration > 0.0) {
            return invalid("voice piece_duration must be positive".to_string());
        }

        Ok(())
    }
}
