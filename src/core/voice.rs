/// Voice babble: clip naming, the fail-fast clip bank, and the cadence
/// scheduler that picks which piece to play while the character talks.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::bucket::CooldownSampler;
use crate::core::config::VoiceConfig;
use crate::schema::section::VoiceStyle;

/// Number of recorded voices shipped with the game.
pub const VOICE_COUNT: u8 = 11;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("failed to load voice clip: {path}")]
    MissingClip { path: String },
    #[error("voice bank needs at least one voice")]
    NoVoices,
}

/// Newtype wrapper for recorded voice numbers (1-based, as in the asset names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoiceId(pub u8);

impl VoiceId {
    /// Every voice in the shipped asset set.
    pub fn all() -> impl Iterator<Item = VoiceId> {
        (1..=VOICE_COUNT).map(VoiceId)
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self(1)
    }
}

/// Identifies one recorded babble piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceClipKey {
    pub voice: VoiceId,
    /// 1-based; higher is faster.
    pub speed: u32,
    pub style: VoiceStyle,
    pub piece: u32,
}

impl VoiceClipKey {
    /// Resource path of the clip, without extension:
    /// `voices/voc3/voc3_speed2_narrow_07`.
    pub fn asset_path(&self) -> String {
        format!(
            "voices/voc{voice}/voc{voice}_speed{speed}_{style}_{piece:02}",
            voice = self.voice.0,
            speed = self.speed,
            style = self.style.asset_name(),
            piece = self.piece,
        )
    }

    /// Every clip one voice needs under `config`, in bank order.
    pub fn layout(voice: VoiceId, config: &VoiceConfig) -> impl Iterator<Item = VoiceClipKey> {
        let pieces = config.pieces_per_style;
        (1..=config.num_speeds).flat_map(move |speed| {
            VoiceStyle::ALL.into_iter().flat_map(move |style| {
                (0..pieces).map(move |piece| VoiceClipKey {
                    voice,
                    speed,
                    style,
                    piece,
                })
            })
        })
    }
}

impl fmt::Display for VoiceClipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_path())
    }
}

/// Resolves clip keys into whatever handle the audio backend plays.
pub trait VoiceClipProvider {
    type Clip;

    fn load(&self, key: &VoiceClipKey) -> Option<Self::Clip>;
}

/// Resolves clips to files under a root directory, e.g.
/// `<root>/voices/voc1/voc1_speed1_normal_00.wav`.
#[derive(Debug, Clone)]
pub struct FileClipProvider {
    pub root: PathBuf,
    pub extension: String,
}

impl FileClipProvider {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

impl VoiceClipProvider for FileClipProvider {
    type Clip = PathBuf;

    fn load(&self, key: &VoiceClipKey) -> Option<PathBuf> {
        let path = self
            .root
            .join(format!("{}.{}", key.asset_path(), self.extension));
        path.is_file().then_some(path)
    }
}

/// Every clip for a set of voices, loaded up front.
///
/// Construction fails on the first missing clip, so a bank that exists can
/// serve any key inside its layout.
#[derive(Debug, Clone)]
pub struct VoiceBank<C> {
    voices: Vec<VoiceId>,
    num_speeds: u32,
    pieces_per_style: u32,
    clips: Vec<C>,
}

impl<C> VoiceBank<C> {
    pub fn load<P>(
        provider: &P,
        voices: impl IntoIterator<Item = VoiceId>,
        config: &VoiceConfig,
    ) -> Result<Self, VoiceError>
    where
        P: VoiceClipProvider<Clip = C>,
    {
        let voices: Vec<VoiceId> = voices.into_iter().collect();
        if voices.is_empty() {
            return Err(VoiceError::NoVoices);
        }

        let mut clips = Vec::with_capacity(
            voices.len()
                * config.num_speeds as usize
                * VoiceStyle::ALL.len()
                * config.pieces_per_style as usize,
        );
        for &voice in &voices {
            for key in VoiceClipKey::layout(voice, config) {
                let clip = provider.load(&key).ok_or_else(|| VoiceError::MissingClip {
                    path: key.asset_path(),
                })?;
                clips.push(clip);
            }
        }

        log::info!(
            "Loaded {} voice clips for {} voice(s)",
            clips.len(),
            voices.len()
        );

        Ok(Self {
            voices,
            num_speeds: config.num_speeds,
            pieces_per_style: config.pieces_per_style,
            clips,
        })
    }

    /// Look up a clip; `None` if the key lies outside the loaded layout.
    pub fn get(&self, key: &VoiceClipKey) -> Option<&C> {
        let voice_index = self.voices.iter().position(|v| *v == key.voice)?;
        if key.speed == 0 || key.speed > self.num_speeds || key.piece >= self.pieces_per_style {
            return None;
        }
        let style_index = VoiceStyle::ALL.iter().position(|s| *s == key.style)?;

        let styles = VoiceStyle::ALL.len();
        let pieces = self.pieces_per_style as usize;
        let speeds = self.num_speeds as usize;
        let index = ((voice_index * speeds + (key.speed as usize - 1)) * styles + style_index)
            * pieces
            + key.piece as usize;
        self.clips.get(index)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Decides when the next babble piece plays and which one.
///
/// Faster speeds shorten the gap to the next piece: speed 1 waits one
/// piece duration, speed 2 two thirds of it, speed 3 half.
#[derive(Debug, Clone)]
pub struct VoiceSynth {
    voice: VoiceId,
    style: VoiceStyle,
    piece_duration: f64,
    num_speeds: u32,
    next_play_time: f64,
    pieces: CooldownSampler,
}

impl VoiceSynth {
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            voice: config.voice,
            style: VoiceStyle::Normal,
            piece_duration: config.piece_duration,
            num_speeds: config.num_speeds,
            next_play_time: 0.0,
            pieces: CooldownSampler::with_range(
                config.piece_cooldown,
                0,
                i32::try_from(config.pieces_per_style).unwrap_or(i32::MAX),
            ),
        }
    }

    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    pub fn style(&self) -> VoiceStyle {
        self.style
    }

    pub fn set_style(&mut self, style: VoiceStyle) {
        self.style = style;
    }

    pub fn next_play_time(&self) -> f64 {
        self.next_play_time
    }

    /// Gap before the next piece after playing one at `speed`.
    pub fn gap_for_speed(&self, speed: u32) -> f64 {
        self.piece_duration / (speed as f64 / 2.0 + 0.5)
    }

    /// Advance to `now`. Returns the clip to play, if one is due.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        talking: bool,
        rng: &mut R,
    ) -> Option<VoiceClipKey> {
        if !talking || now < self.next_play_time {
            return None;
        }

        let speed = rng.gen_range(1..=self.num_speeds);
        let piece = self.pieces.take(rng) as u32;
        self.next_play_time = now + self.gap_for_speed(speed);

        Some(VoiceClipKey {
            voice: self.voice,
            speed,
            style: self.style,
            piece,
        })
    }
}
