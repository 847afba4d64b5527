/// The dialogue state machine: page-by-page reveal plus the option graph.
///
/// Wires together pagination, the mouth flap, the voice babble and the
/// dialogue graph. The caller drives it with one `tick` per frame and
/// forwards the returned effects to its presenter.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use thiserror::Error;

use crate::core::config::{ConfigError, EngineConfig};
use crate::core::input::{InputEdges, InputSample};
use crate::core::mouth::MouthFlap;
use crate::core::presenter::{Effect, SoundCue};
use crate::core::text_wrap::paginate;
use crate::core::voice::VoiceSynth;
use crate::schema::graph::{DialogueGraph, GraphError};
use crate::schema::section::{DialogueSection, Destination, SectionId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no dialogue graph was provided")]
    MissingGraph,
}

/// Where the engine is within the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Characters of the current page are appearing.
    Revealing,
    /// A page is done and more follow; waiting for fire.
    AwaitingAdvance,
    /// The last page is done; the options are up.
    AwaitingSelection,
    /// The story ended. Only the secondary button does anything.
    Terminal,
}

/// The top-level dialogue engine. Built via `DialogueEngine::builder()`.
pub struct DialogueEngine {
    graph: DialogueGraph,
    config: EngineConfig,
    rng: StdRng,
    mouth: MouthFlap,
    voice: VoiceSynth,
    phase: Phase,
    section: SectionId,
    pages: Vec<String>,
    page_index: usize,
    displayed: String,
    revealed_chars: usize,
    /// Byte offset into the current page matching `revealed_chars`.
    revealed_bytes: usize,
    next_letter_time: f64,
    highlighted: usize,
    previous_input: InputSample,
    effects: Vec<Effect>,
}

/// Builder for constructing a `DialogueEngine`.
pub struct DialogueEngineBuilder {
    story_path: Option<String>,
    config_path: Option<String>,
    seed: Option<u64>,
    /// Directly provided graph (for testing without files).
    graph: Option<DialogueGraph>,
    /// Directly provided config (for testing without files).
    config: Option<EngineConfig>,
}

impl DialogueEngine {
    pub fn builder() -> DialogueEngineBuilder {
        DialogueEngineBuilder {
            story_path: None,
            config_path: None,
            seed: None,
            graph: None,
            config: None,
        }
    }

    fn new(graph: DialogueGraph, config: EngineConfig) -> Self {
        let mut engine = DialogueEngine {
            rng: StdRng::seed_from_u64(config.seed),
            mouth: MouthFlap::new(&config.mouth),
            voice: VoiceSynth::new(&config.voice),
            phase: Phase::Revealing,
            section: graph.root(),
            pages: Vec::new(),
            page_index: 0,
            displayed: String::new(),
            revealed_chars: 0,
            revealed_bytes: 0,
            next_letter_time: 0.0,
            highlighted: 0,
            previous_input: InputSample::default(),
            effects: Vec::new(),
            graph,
            config,
        };
        engine.enter_section(engine.graph.root());
        engine
    }

    /// Advance one frame. `now` is the clock in seconds; `input` is this
    /// frame's raw sample. Returns what the presenter should do.
    pub fn tick(&mut self, now: f64, input: InputSample) -> Vec<Effect> {
        let edges = InputEdges::between(&self.previous_input, &input);

        match self.phase {
            Phase::Revealing => self.reveal(now, &input),
            Phase::AwaitingAdvance => {
                if edges.fire {
                    self.advance_page();
                }
            }
            Phase::AwaitingSelection => self.select(&edges),
            Phase::Terminal => {
                if edges.secondary {
                    self.restart();
                }
            }
        }

        let talking = self.phase == Phase::Revealing;
        if let Some(key) = self.voice.update(now, talking, &mut self.rng) {
            self.effects.push(Effect::PlaySound(SoundCue::Voice(key)));
        }

        // Edges for the next tick compare against this tick's sample.
        self.previous_input = input;
        std::mem::take(&mut self.effects)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_section(&self) -> SectionId {
        self.section
    }

    pub fn section(&self) -> &DialogueSection {
        &self.graph[self.section]
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text currently in the dialogue box, marker included.
    pub fn displayed_text(&self) -> &str {
        &self.displayed
    }

    /// Characters of the current page shown so far.
    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    pub fn highlighted_option(&self) -> usize {
        self.highlighted
    }

    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn enter_section(&mut self, id: SectionId) {
        let section = &self.graph[id];
        self.section = id;
        self.pages = paginate(
            &section.text,
            self.config.max_line_length,
            self.config.max_visible_lines,
        );
        self.page_index = 0;
        self.highlighted = 0;
        self.phase = Phase::Revealing;
        self.voice.set_style(section.voice_style);

        log::debug!(
            "Entering section {} ({} page(s), {:?}, {})",
            id,
            self.pages.len(),
            section.voice_style,
            section.affect.tag()
        );

        self.effects.push(Effect::SetFace {
            affect: section.affect,
            looking_down: section.looking_down,
        });
        self.effects.push(Effect::SetOptions(Vec::new()));
        self.effects.push(Effect::SetArrowVisible(false));
        self.effects.push(Effect::SetMouthSprite(None));
        self.clear_page();
    }

    fn clear_page(&mut self) {
        self.displayed.clear();
        self.revealed_chars = 0;
        self.revealed_bytes = 0;
        self.next_letter_time = 0.0;
        self.effects.push(Effect::SetDisplayedText(String::new()));
    }

    fn reveal(&mut self, now: f64, input: &InputSample) {
        let page_len = self.pages[self.page_index].len();

        if self.revealed_bytes < page_len {
            if let Some(frame) = self.mouth.update(now, &mut self.rng) {
                self.effects.push(Effect::SetMouthSprite(frame));
            }

            if now >= self.next_letter_time {
                if let Some(c) = self.pages[self.page_index][self.revealed_bytes..].chars().next() {
                    self.displayed.push(c);
                    self.revealed_chars += 1;
                    self.revealed_bytes += c.len_utf8();
                    self.effects
                        .push(Effect::SetDisplayedText(self.displayed.clone()));
                }

                let delay = if input.fire_held() {
                    self.config.fast_char_duration
                } else {
                    self.config.char_duration
                };
                self.next_letter_time = now + delay;
            }
        }

        if self.revealed_bytes >= page_len {
            self.finish_page();
        }
    }

    fn finish_page(&mut self) {
        self.effects.push(Effect::SetMouthSprite(None));

        if self.page_index + 1 < self.pages.len() {
            self.displayed.push_str(&self.config.continued_marker);
            self.effects
                .push(Effect::SetDisplayedText(self.displayed.clone()));
            self.phase = Phase::AwaitingAdvance;
        } else {
            self.phase = Phase::AwaitingSelection;
            self.highlighted = 0;
            let labels = self.graph[self.section].option_labels();
            self.effects.push(Effect::SetOptions(labels));
            self.effects.push(Effect::SetHighlightedOption(0));
            self.effects.push(Effect::SetArrowVisible(true));
        }
    }

    fn advance_page(&mut self) {
        self.page_index += 1;
        log::debug!(
            "Section {} page {}/{}",
            self.section,
            self.page_index + 1,
            self.pages.len()
        );
        self.clear_page();
        self.phase = Phase::Revealing;
    }

    fn select(&mut self, edges: &InputEdges) {
        let option_count = self.graph[self.section].options.len();

        if edges.down {
            if self.highlighted + 1 < option_count {
                self.move_highlight(self.highlighted + 1);
            } else {
                self.effects.push(Effect::PlaySound(SoundCue::Invalid));
            }
        }

        if edges.up {
            if self.highlighted > 0 {
                self.move_highlight(self.highlighted - 1);
            } else {
                self.effects.push(Effect::PlaySound(SoundCue::Invalid));
            }
        }

        if edges.fire {
            self.commit();
        }
    }

    fn move_highlight(&mut self, index: usize) {
        self.highlighted = index;
        self.effects.push(Effect::SetHighlightedOption(index));
        self.effects.push(Effect::PlaySound(SoundCue::Select));
    }

    fn commit(&mut self) {
        let option = &self.graph[self.section].options[self.highlighted];
        let destination = option.destination;
        log::debug!(
            "Section {} picked option {} ({:?})",
            self.section,
            self.highlighted,
            option.label
        );

        self.effects.push(Effect::PlaySound(SoundCue::Confirm));
        match destination {
            Destination::Section(next) => self.enter_section(next),
            Destination::GameOver => {
                log::debug!("Game over from section {}", self.section);
                self.phase = Phase::Terminal;
                self.effects.push(Effect::SetArrowVisible(false));
                self.effects.push(Effect::GameOver);
            }
        }
    }

    fn restart(&mut self) {
        log::debug!("Restarting from the root section");
        self.effects.push(Effect::Reset);
        self.enter_section(self.graph.root());
    }
}

impl DialogueEngineBuilder {
    /// Load the dialogue graph from a RON story file.
    pub fn story(mut self, path: &str) -> Self {
        self.story_path = Some(path.to_string());
        self
    }

    /// Load tuning from a RON config file.
    pub fn config_file(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    /// Override the config's seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide a graph directly (for testing without files).
    pub fn with_graph(mut self, graph: DialogueGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Provide a config directly (for testing without files).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<DialogueEngine, EngineError> {
        let graph = match (self.graph, self.story_path) {
            (Some(graph), _) => graph,
            (None, Some(path)) => DialogueGraph::load_from_ron(Path::new(&path))?,
            (None, None) => return Err(EngineError::MissingGraph),
        };

        let mut config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => EngineConfig::load_from_ron(Path::new(&path))?,
            (None, None) => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;

        for id in graph.endless() {
            log::warn!("Section {} can never reach an ending", id);
        }

        Ok(DialogueEngine::new(graph, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::section::Affect;

    fn two_section_graph() -> DialogueGraph {
        DialogueGraph::new(vec![
            DialogueSection::new("Hi.")
                .affect(Affect::Googly)
                .option("Again", Destination::Section(SectionId(1)))
                .option("Quit", Destination::GameOver),
            DialogueSection::new("Bye.").option("Back", Destination::Section(SectionId(0))),
        ])
        .unwrap()
    }

    fn build_test_engine() -> DialogueEngine {
        DialogueEngine::builder()
            .seed(42)
            .with_graph(two_section_graph())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_requires_graph() {
        assert!(matches!(
            DialogueEngine::builder().build(),
            Err(EngineError::MissingGraph)
        ));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.max_visible_lines = 0;
        let result = DialogueEngine::builder()
            .with_graph(two_section_graph())
            .with_config(config)
            .build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn builder_with_seed() {
        let engine = build_test_engine();
        assert_eq!(engine.config().seed, 42);
    }

    #[test]
    fn builder_missing_story_file() {
        let result = DialogueEngine::builder()
            .story("tests/fixtures/no_such_story.ron")
            .build();
        assert!(matches!(result, Err(EngineError::Graph(GraphError::Io(_)))));
    }

    #[test]
    fn starts_revealing_root() {
        let mut engine = build_test_engine();
        assert_eq!(engine.phase(), Phase::Revealing);
        assert_eq!(engine.current_section(), SectionId(0));
        assert_eq!(engine.pages(), &["Hi.".to_string()]);

        let effects = engine.tick(0.0, InputSample::default());
        assert!(effects.contains(&Effect::SetFace {
            affect: Affect::Googly,
            looking_down: false
        }));
        assert!(effects.contains(&Effect::SetDisplayedText("H".to_string())));
    }

    #[test]
    fn one_character_per_tick_even_when_late() {
        let mut engine = build_test_engine();
        engine.tick(0.0, InputSample::default());
        // Far past the next letter time, still one character.
        engine.tick(10.0, InputSample::default());
        assert_eq!(engine.displayed_text(), "Hi");
        assert_eq!(engine.revealed_chars(), 2);
    }

    #[test]
    fn single_page_goes_to_selection() {
        let mut engine = build_test_engine();
        let mut now = 0.0;
        let mut effects = Vec::new();
        for _ in 0..3 {
            effects = engine.tick(now, InputSample::default());
            now += 0.05;
        }
        assert_eq!(engine.phase(), Phase::AwaitingSelection);
        assert_eq!(engine.displayed_text(), "Hi.");
        assert!(effects.contains(&Effect::SetOptions(vec![
            "Again".to_string(),
            "Quit".to_string()
        ])));
        assert!(effects.contains(&Effect::SetArrowVisible(true)));
        assert!(effects.contains(&Effect::SetMouthSprite(None)));
    }
}
