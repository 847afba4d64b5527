//! WASM bindings for chatterbox: drives the talking head in the web demo.
//!
//! The page owns the clock, the input devices and the audio; it calls
//! `tick` once per animation frame and applies the returned effects.

use wasm_bindgen::prelude::*;

use chatterbox::core::config::EngineConfig;
use chatterbox::core::engine::{DialogueEngine, Phase};
use chatterbox::core::input::InputSample;
use chatterbox::core::voice::VoiceClipKey;
use chatterbox::schema::graph::DialogueGraph;

// ---------------------------------------------------------------------------
// Embedded story data, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const STORY: &str = include_str!("../../assets/story.ron");
    pub const CONFIG: &str = include_str!("../../assets/engine.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct StateInfo<'a> {
    section: usize,
    phase: &'static str,
    page: usize,
    page_count: usize,
    displayed_text: &'a str,
    options: Vec<String>,
    highlighted_option: usize,
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Revealing => "revealing",
        Phase::AwaitingAdvance => "awaiting_advance",
        Phase::AwaitingSelection => "awaiting_selection",
        Phase::Terminal => "terminal",
    }
}

// ---------------------------------------------------------------------------
// DialogueDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct DialogueDemo {
    engine: DialogueEngine,
}

#[wasm_bindgen]
impl DialogueDemo {
    /// Create a demo running the bundled story with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<DialogueDemo, JsError> {
        let graph = DialogueGraph::parse_ron(data::STORY)
            .map_err(|e| JsError::new(&format!("Story parse error: {e}")))?;
        let config = EngineConfig::parse_ron(data::CONFIG)
            .map_err(|e| JsError::new(&format!("Config parse error: {e}")))?;

        let engine = DialogueEngine::builder()
            .with_graph(graph)
            .with_config(config)
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;

        Ok(DialogueDemo { engine })
    }

    /// Advance one frame and return the effects as a JSON array.
    ///
    /// `now` is in seconds. Axis and button values follow the usual
    /// convention: above zero is pressed, negative `vertical` is down.
    pub fn tick(
        &mut self,
        now: f64,
        horizontal: f32,
        vertical: f32,
        fire: f32,
        secondary: f32,
    ) -> Result<String, JsError> {
        let input = InputSample {
            horizontal,
            vertical,
            fire,
            secondary,
        };
        let effects = self.engine.tick(now, input);
        serde_json::to_string(&effects)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Name of the current phase.
    pub fn phase(&self) -> String {
        phase_label(self.engine.phase()).to_string()
    }

    /// Return a JSON snapshot of what the dialogue box should show.
    pub fn state(&self) -> Result<String, JsError> {
        let info = StateInfo {
            section: self.engine.current_section().0,
            phase: phase_label(self.engine.phase()),
            page: self.engine.page_index(),
            page_count: self.engine.page_count(),
            displayed_text: self.engine.displayed_text(),
            options: self.engine.section().option_labels(),
            highlighted_option: self.engine.highlighted_option(),
        };
        serde_json::to_string(&info)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return a JSON array of every voice clip path (without extension)
    /// the configured voice can ask for, so the page can preload them.
    pub fn voice_clips(&self) -> String {
        let voice = &self.engine.config().voice;
        let paths: Vec<String> = VoiceClipKey::layout(voice.voice, voice)
            .map(|key| key.asset_path())
            .collect();
        serde_json::to_string(&paths).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restart the bundled story with a new seed.
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        let new_demo = DialogueDemo::new(seed)?;
        self.engine = new_demo.engine;
        Ok(())
    }
}
