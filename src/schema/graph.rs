/// The dialogue graph is an immutable, validated table of sections.
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::ops::Index;
use std::path::Path;
use thiserror::Error;

use super::section::{Affect, DialogueOption, DialogueSection, Destination, SectionId, VoiceStyle};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("dialogue graph has no sections")]
    Empty,
    #[error("section {section} option {option} points to {destination}, which is neither a section nor -1")]
    InvalidDestination {
        section: SectionId,
        option: usize,
        destination: i64,
    },
    #[error("section {section} has no options")]
    NoOptions { section: SectionId },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// All sections of a story, indexed by dense id. Section 0 is the root.
///
/// Every destination is checked when the graph is built, so walking it
/// never meets a dangling id.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    sections: Vec<DialogueSection>,
}

// Story files spell destinations as plain integers with -1 for game over,
// so sections go through these before validation.

#[derive(Debug, Deserialize)]
struct RonOption {
    label: String,
    destination: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Section")]
struct RonSection {
    text: String,
    #[serde(default)]
    affect: Affect,
    #[serde(default)]
    looking_down: bool,
    #[serde(default)]
    voice_style: VoiceStyle,
    options: Vec<RonOption>,
}

impl DialogueGraph {
    /// Build a graph, checking that it is non-empty, that every section
    /// offers a choice, and that every destination resolves.
    pub fn new(sections: Vec<DialogueSection>) -> Result<DialogueGraph, GraphError> {
        if sections.is_empty() {
            return Err(GraphError::Empty);
        }

        for (index, section) in sections.iter().enumerate() {
            let id = SectionId(index);
            if section.options.is_empty() {
                return Err(GraphError::NoOptions { section: id });
            }
            for (option_index, option) in section.options.iter().enumerate() {
                if let Destination::Section(target) = option.destination {
                    if target.0 >= sections.len() {
                        return Err(GraphError::InvalidDestination {
                            section: id,
                            option: option_index,
                            destination: option.destination.to_raw(),
                        });
                    }
                }
            }
        }

        Ok(DialogueGraph { sections })
    }

    /// Load a graph from a RON story file.
    pub fn load_from_ron(path: &Path) -> Result<DialogueGraph, GraphError> {
        let contents = std::fs::read_to_string(path)?;
        let graph = Self::parse_ron(&contents)?;
        log::info!(
            "Loaded {} dialogue sections from {}",
            graph.len(),
            path.display()
        );
        Ok(graph)
    }

    /// Parse a graph from a RON string: a list of `Section(..)` entries.
    pub fn parse_ron(input: &str) -> Result<DialogueGraph, GraphError> {
        let raw: Vec<RonSection> = ron::from_str(input)?;
        let mut sections = Vec::with_capacity(raw.len());

        for (index, ron_section) in raw.into_iter().enumerate() {
            let mut options = Vec::with_capacity(ron_section.options.len());
            for (option_index, option) in ron_section.options.into_iter().enumerate() {
                let destination = Destination::from_raw(option.destination).ok_or_else(|| {
                    GraphError::InvalidDestination {
                        section: SectionId(index),
                        option: option_index,
                        destination: option.destination,
                    }
                })?;
                options.push(DialogueOption {
                    label: option.label,
                    destination,
                });
            }
            sections.push(DialogueSection {
                text: ron_section.text,
                affect: ron_section.affect,
                looking_down: ron_section.looking_down,
                voice_style: ron_section.voice_style,
                options,
            });
        }

        Self::new(sections)
    }

    pub fn root(&self) -> SectionId {
        SectionId(0)
    }

    pub fn get(&self, id: SectionId) -> Option<&DialogueSection> {
        self.sections.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &DialogueSection)> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| (SectionId(i), section))
    }

    /// Sections the player can reach from the root.
    pub fn reachable(&self) -> FxHashSet<SectionId> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            for option in &self.sections[id.0].options {
                if let Destination::Section(next) = option.destination {
                    if !seen.contains(&next) {
                        stack.push(next);
                    }
                }
            }
        }
        seen
    }

    /// Sections from which no sequence of choices ends the story.
    pub fn endless(&self) -> Vec<SectionId> {
        // Walk backwards from every section that can end the story.
        let mut can_end: FxHashSet<SectionId> = self
            .iter()
            .filter(|(_, section)| section.can_end_story())
            .map(|(id, _)| id)
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (id, section) in self.iter() {
                if can_end.contains(&id) {
                    continue;
                }
                let leads_out = section.options.iter().any(|o| match o.destination {
                    Destination::Section(next) => can_end.contains(&next),
                    Destination::GameOver => true,
                });
                if leads_out {
                    can_end.insert(id);
                    changed = true;
                }
            }
        }

        self.iter()
            .map(|(id, _)| id)
            .filter(|id| !can_end.contains(id))
            .collect()
    }
}

impl Index<SectionId> for DialogueGraph {
    type Output = DialogueSection;

    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph. Ids taken from the
    /// graph's own destinations always do.
    fn index(&self, id: SectionId) -> &DialogueSection {
        &self.sections[id.0]
    }
}
