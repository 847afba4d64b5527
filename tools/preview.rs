/// Preview: play a dialogue story in the terminal.
///
/// Usage: preview --story <path> [--config <path>] [--seed <n>] [--voices <dir>]
///
/// Commands:
///   <enter>, next   press fire (advance a page, confirm an option)
///   up, w           move the arrow up
///   down, s         move the arrow down
///   reset, r        press the secondary button (restart after the end)
///   where           show the current section and phase
///   help            list commands
///   quit            exit

use chatterbox::core::engine::{DialogueEngine, Phase};
use chatterbox::core::input::InputSample;
use chatterbox::core::presenter::{Presenter, SoundCue};
use chatterbox::core::voice::{FileClipProvider, VoiceBank};
use chatterbox::schema::section::Affect;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

/// Simulated frame length in seconds.
const FRAME: f64 = 1.0 / 60.0;
/// Cap on frames simulated while a page reveals.
const MAX_REVEAL_FRAMES: usize = 1_000_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut story_path = None;
    let mut config_path = None;
    let mut voices_dir = None;
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--story" if i + 1 < args.len() => {
                i += 1;
                story_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--voices" if i + 1 < args.len() => {
                i += 1;
                voices_dir = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                match args[i].parse::<u64>() {
                    Ok(s) => seed = Some(s),
                    Err(_) => {
                        eprintln!("Invalid seed: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(story_path) = story_path else {
        eprintln!("ERROR: --story is required");
        print_usage();
        process::exit(1);
    };

    let mut builder = DialogueEngine::builder().story(&story_path);
    if let Some(ref path) = config_path {
        builder = builder.config_file(path);
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let mut presenter = TerminalPresenter::default();
    if let Some(ref dir) = voices_dir {
        let voice_config = &engine.config().voice;
        let provider = FileClipProvider::new(dir.as_str(), "wav");
        match VoiceBank::load(&provider, [voice_config.voice], voice_config) {
            Ok(bank) => {
                println!("Loaded {} voice clips from {}", bank.len(), dir);
                presenter.bank = Some(bank);
            }
            Err(e) => {
                eprintln!("ERROR: {}", e);
                process::exit(1);
            }
        }
    }

    println!(
        "Loaded {} sections from {} (seed {})",
        engine.graph().len(),
        story_path,
        engine.config().seed
    );
    println!("Type 'help' for commands.");

    let mut session = Session {
        engine,
        presenter,
        now: 0.0,
    };
    session.settle();
    session.presenter.render();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match line.trim().to_lowercase().as_str() {
            "" | "next" | "n" => session.press(InputSample::default().with_fire()),
            "up" | "w" => session.press(InputSample::default().with_up()),
            "down" | "s" => session.press(InputSample::default().with_down()),
            "reset" | "r" => session.press(InputSample::default().with_secondary()),
            "where" => {
                println!(
                    "Section {}, page {}/{}, {:?}",
                    session.engine.current_section(),
                    session.engine.page_index() + 1,
                    session.engine.page_count(),
                    session.engine.phase()
                );
                continue;
            }
            "help" | "h" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            other => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", other);
                continue;
            }
        }
        session.presenter.render();
    }
}

/// The engine plus a simulated clock.
struct Session {
    engine: DialogueEngine,
    presenter: TerminalPresenter,
    now: f64,
}

impl Session {
    fn step(&mut self, input: InputSample) {
        self.now += FRAME;
        let effects = self.engine.tick(self.now, input);
        self.presenter.present(&effects);
    }

    /// Hold `input` for one frame, release it, then let the page finish.
    fn press(&mut self, input: InputSample) {
        self.step(input);
        self.step(InputSample::default());
        self.settle();
    }

    fn settle(&mut self) {
        let mut frames = 0;
        while self.engine.phase() == Phase::Revealing && frames < MAX_REVEAL_FRAMES {
            self.step(InputSample::default());
            frames += 1;
        }
    }
}

#[derive(Default)]
struct TerminalPresenter {
    text: String,
    options: Vec<String>,
    highlighted: usize,
    arrow: bool,
    face: String,
    mouth_moves: usize,
    babble: usize,
    last_clip: Option<PathBuf>,
    bank: Option<VoiceBank<PathBuf>>,
    game_over: bool,
}

impl TerminalPresenter {
    fn render(&mut self) {
        println!();
        println!("[{}]", self.face);
        for line in self.text.lines() {
            println!("  {}", line);
        }
        if self.arrow {
            println!();
            for (i, option) in self.options.iter().enumerate() {
                let marker = if i == self.highlighted { '>' } else { ' ' };
                println!("  {} {}", marker, option);
            }
        }
        if self.babble > 0 {
            match self.last_clip.take() {
                Some(clip) => println!(
                    "  ({} babble pieces, last {}; mouth moved {} times)",
                    self.babble,
                    clip.display(),
                    self.mouth_moves
                ),
                None => println!(
                    "  ({} babble pieces; mouth moved {} times)",
                    self.babble, self.mouth_moves
                ),
            }
        }
        if self.game_over {
            println!("  THE END. Type 'reset' to play again.");
        }
        self.babble = 0;
        self.mouth_moves = 0;
    }
}

impl Presenter for TerminalPresenter {
    fn set_displayed_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_options_text(&mut self, text: &str) {
        self.options = text.lines().map(str::to_string).collect();
    }

    fn set_highlighted_option(&mut self, index: usize) {
        self.highlighted = index;
    }

    fn set_face(&mut self, affect: Affect, looking_down: bool) {
        self.face = if looking_down {
            format!("{} (looking down)", affect.tag())
        } else {
            affect.tag().to_string()
        };
    }

    fn set_mouth_sprite(&mut self, sprite: Option<usize>) {
        if sprite.is_some() {
            self.mouth_moves += 1;
        }
    }

    fn set_arrow_visible(&mut self, visible: bool) {
        self.arrow = visible;
    }

    fn play_sound(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Select => println!("  *blip*"),
            SoundCue::Invalid => println!("  *bonk*"),
            SoundCue::Confirm => println!("  *ding*"),
            SoundCue::Voice(key) => {
                self.babble += 1;
                if let Some(ref bank) = self.bank {
                    self.last_clip = bank.get(&key).cloned();
                }
            }
        }
    }

    fn on_game_over(&mut self) {
        self.game_over = true;
    }

    fn on_reset(&mut self) {
        self.game_over = false;
        println!("  -- reset --");
    }
}

fn print_usage() {
    println!("Preview: play a dialogue story in the terminal.");
    println!();
    println!("Usage: preview --story <path> [--config <path>] [--seed <n>] [--voices <dir>]");
    println!();
    println!("  --story <path>    Story file (RON)");
    println!("  --config <path>   Engine config file (RON, optional)");
    println!("  --seed <n>        Override the config's RNG seed");
    println!("  --voices <dir>    Voice clip directory; every clip must be present (optional)");
}

fn print_help() {
    println!("Commands:");
    println!("  <enter>, next   Press fire (advance a page, confirm an option)");
    println!("  up, w           Move the arrow up");
    println!("  down, s         Move the arrow down");
    println!("  reset, r        Press the secondary button (restart after the end)");
    println!("  where           Show the current section and phase");
    println!("  help            Show this help");
    println!("  quit            Exit");
}
