/// Output side of the engine: the effects a tick produces and the sink
/// trait a frontend implements to show them.
use serde::{Deserialize, Serialize};

use crate::core::voice::VoiceClipKey;
use crate::schema::section::Affect;

/// A one-shot sound the frontend should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// The selection arrow moved.
    Select,
    /// The selection arrow hit the top or bottom of the list.
    Invalid,
    /// An option was picked.
    Confirm,
    /// A babble piece.
    Voice(VoiceClipKey),
}

/// A command for the frontend, emitted by `DialogueEngine::tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    SetDisplayedText(String),
    SetOptions(Vec<String>),
    SetHighlightedOption(usize),
    SetFace { affect: Affect, looking_down: bool },
    /// `None` hides the mouth.
    SetMouthSprite(Option<usize>),
    SetArrowVisible(bool),
    PlaySound(SoundCue),
    GameOver,
    Reset,
}

impl Effect {
    /// Forward this effect to a presenter.
    pub fn apply<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        match self {
            Effect::SetDisplayedText(text) => presenter.set_displayed_text(text),
            Effect::SetOptions(options) => presenter.set_options_text(&options_text(options)),
            Effect::SetHighlightedOption(index) => presenter.set_highlighted_option(*index),
            Effect::SetFace {
                affect,
                looking_down,
            } => presenter.set_face(*affect, *looking_down),
            Effect::SetMouthSprite(sprite) => presenter.set_mouth_sprite(*sprite),
            Effect::SetArrowVisible(visible) => presenter.set_arrow_visible(*visible),
            Effect::PlaySound(cue) => presenter.play_sound(*cue),
            Effect::GameOver => presenter.on_game_over(),
            Effect::Reset => presenter.on_reset(),
        }
    }
}

/// Option labels as shown in the options box, one per line.
pub fn options_text(options: &[String]) -> String {
    options.join("\n")
}

/// Frontend sink for engine effects. Called by the engine's caller, never
/// queried by the engine.
pub trait Presenter {
    fn set_displayed_text(&mut self, text: &str);
    fn set_options_text(&mut self, text: &str);
    fn set_highlighted_option(&mut self, index: usize);
    fn set_face(&mut self, affect: Affect, looking_down: bool);
    fn set_mouth_sprite(&mut self, sprite: Option<usize>);
    fn set_arrow_visible(&mut self, visible: bool);
    fn play_sound(&mut self, cue: SoundCue);
    fn on_game_over(&mut self);
    fn on_reset(&mut self);

    /// Apply a batch of effects in order.
    fn present(&mut self, effects: &[Effect]) {
        for effect in effects {
            effect.apply(self);
        }
    }
}
