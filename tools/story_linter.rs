/// Story Linter: validates a dialogue story and flags layout problems.
///
/// Usage: story_linter <story.ron> [--config <path>]

use chatterbox::core::config::EngineConfig;
use chatterbox::core::text_wrap::{paginate, wrap_lines};
use chatterbox::schema::graph::DialogueGraph;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <story.ron> [--config <path>]");
        process::exit(0);
    }

    let story_path = &args[1];
    let mut config_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--config" && i + 1 < args.len() {
            i += 1;
            config_path = Some(args[i].clone());
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => match EngineConfig::load_from_ron(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: Failed to load config: {}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    // Structural errors (bad destinations, dead-end sections) fail the load.
    let graph = match DialogueGraph::load_from_ron(Path::new(story_path)) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded {} sections", graph.len());

    let warnings = lint_story(&graph, &config);

    println!("\n=== Story Lint Report ===\n");

    if warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    println!("\nSummary: 0 errors, {} warnings", warnings.len());
}

fn lint_story(graph: &DialogueGraph, config: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let reachable = graph.reachable();
    for (id, _) in graph.iter() {
        if !reachable.contains(&id) {
            warnings.push(format!("Section {} is unreachable from the start", id));
        }
    }

    for id in graph.endless() {
        warnings.push(format!("Section {} can never reach an ending", id));
    }

    for (id, section) in graph.iter() {
        // Words wider than the box overflow it; the wrapper never splits them.
        for line in wrap_lines(&section.text, config.max_line_length) {
            if line.chars().count() > config.max_line_length {
                warnings.push(format!(
                    "Section {}: '{}' is wider than the {}-character box",
                    id,
                    line.trim(),
                    config.max_line_length
                ));
            }
        }

        let pages = paginate(&section.text, config.max_line_length, config.max_visible_lines);
        if pages.len() > 1 {
            println!("  Section {}: {} pages", id, pages.len());
        }

        if section.options.len() > config.max_visible_lines {
            warnings.push(format!(
                "Section {} has {} options but the box shows {} lines",
                id,
                section.options.len(),
                config.max_visible_lines
            ));
        }

        let mut labels = FxHashSet::default();
        for option in &section.options {
            if option.label.trim().is_empty() {
                warnings.push(format!("Section {} has an option with an empty label", id));
            } else if !labels.insert(option.label.as_str()) {
                warnings.push(format!(
                    "Section {} offers '{}' more than once",
                    id, option.label
                ));
            }
            if option.label.chars().count() > config.max_line_length {
                warnings.push(format!(
                    "Section {}: option '{}' is wider than the {}-character box",
                    id, option.label, config.max_line_length
                ));
            }
        }
    }

    warnings
}
