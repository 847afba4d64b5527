/// Autoplay example: plays the demo story headless with scripted choices.
///
/// A short run: greeting, "who are you?", the bucket, then goodbye.
///
/// Run with: cargo run --example autoplay

use chatterbox::core::engine::{DialogueEngine, Phase};
use chatterbox::core::input::InputSample;
use chatterbox::core::presenter::{Presenter, SoundCue};
use chatterbox::schema::section::Affect;

const FRAME: f64 = 1.0 / 60.0;

/// Counts what a real frontend would animate and play.
#[derive(Default)]
struct Transcript {
    face: String,
    mouth_frames: usize,
    babble: usize,
    cues: Vec<SoundCue>,
    ended: bool,
}

impl Presenter for Transcript {
    fn set_displayed_text(&mut self, _text: &str) {}
    fn set_options_text(&mut self, _text: &str) {}
    fn set_highlighted_option(&mut self, _index: usize) {}

    fn set_face(&mut self, affect: Affect, looking_down: bool) {
        self.face = format!(
            "{}{}",
            affect.tag(),
            if looking_down { ", looking down" } else { "" }
        );
    }

    fn set_mouth_sprite(&mut self, sprite: Option<usize>) {
        if sprite.is_some() {
            self.mouth_frames += 1;
        }
    }

    fn set_arrow_visible(&mut self, _visible: bool) {}

    fn play_sound(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Voice(_) => self.babble += 1,
            other => self.cues.push(other),
        }
    }

    fn on_game_over(&mut self) {
        self.ended = true;
    }

    fn on_reset(&mut self) {
        self.ended = false;
    }
}

struct Player {
    engine: DialogueEngine,
    transcript: Transcript,
    now: f64,
}

impl Player {
    fn frame(&mut self, input: InputSample) {
        self.now += FRAME;
        let effects = self.engine.tick(self.now, input);
        self.transcript.present(&effects);
    }

    fn press(&mut self, input: InputSample) {
        self.frame(input);
        self.frame(InputSample::default());
    }
}

fn main() {
    env_logger::init();

    let engine = DialogueEngine::builder()
        .story("assets/story.ron")
        .config_file("assets/engine.ron")
        .seed(2026)
        .build()
        .expect("Failed to build engine");

    let mut player = Player {
        engine,
        transcript: Transcript::default(),
        now: 0.0,
    };

    // Option index picked at each choice, in order.
    let mut choices = [1, 0, 1].into_iter();

    println!("=== Autoplay ===\n");

    loop {
        while player.engine.phase() == Phase::Revealing {
            player.frame(InputSample::default());
        }

        match player.engine.phase() {
            Phase::AwaitingAdvance => {
                println!("[{}]\n{}\n", player.transcript.face, player.engine.displayed_text());
                player.press(InputSample::default().with_fire());
            }
            Phase::AwaitingSelection => {
                println!("[{}]\n{}\n", player.transcript.face, player.engine.displayed_text());
                let labels = player.engine.section().option_labels();
                let Some(choice) = choices.next() else {
                    println!("(out of scripted choices)");
                    break;
                };
                for (i, label) in labels.iter().enumerate() {
                    let marker = if i == choice { '>' } else { ' ' };
                    println!("  {} {}", marker, label);
                }
                println!();

                for _ in 0..choice {
                    player.press(InputSample::default().with_down());
                }
                player.press(InputSample::default().with_fire());
            }
            Phase::Terminal => {
                println!("--- The End ---");
                break;
            }
            Phase::Revealing => unreachable!("reveal loop above runs until the page is done"),
        }
    }

    let t = &player.transcript;
    println!(
        "\n{:.1}s of dialogue, {} babble pieces, {} mouth frames, {} UI sounds, ended: {}",
        player.now,
        t.babble,
        t.mouth_frames,
        t.cues.len(),
        t.ended
    );
}
