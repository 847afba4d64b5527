use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype wrapper for section ids: dense indices into the dialogue graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub usize);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The character's eye expression while a section is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Affect {
    #[default]
    Normal,
    Googly,
    Angry,
    Shifty,
    Surprised,
}

impl Affect {
    /// Returns the tag string for this affect (e.g., "affect:shifty").
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Normal => "affect:normal",
            Self::Googly => "affect:googly",
            Self::Angry => "affect:angry",
            Self::Shifty => "affect:shifty",
            Self::Surprised => "affect:surprised",
        }
    }
}

/// Delivery of the babble voice; selects a family of recorded pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceStyle {
    Wide,
    #[default]
    Normal,
    Narrow,
    Monotone,
    Low,
    High,
}

impl VoiceStyle {
    pub const ALL: [VoiceStyle; 6] = [
        Self::Wide,
        Self::Normal,
        Self::Narrow,
        Self::Monotone,
        Self::Low,
        Self::High,
    ];

    /// Name used in voice clip file names.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Normal => "normal",
            Self::Narrow => "narrow",
            Self::Monotone => "monotone",
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Where picking an option leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Section(SectionId),
    /// Ends the story.
    GameOver,
}

impl Destination {
    /// Authored story files mark the end of the story with `-1`.
    pub const GAME_OVER_SENTINEL: i64 = -1;

    /// Decode an authored destination. Negative values other than the
    /// sentinel are not destinations at all.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            Self::GAME_OVER_SENTINEL => Some(Self::GameOver),
            n => usize::try_from(n).ok().map(|i| Self::Section(SectionId(i))),
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Self::Section(id) => id.0 as i64,
            Self::GameOver => Self::GAME_OVER_SENTINEL,
        }
    }
}

/// One labelled choice at the end of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub label: String,
    pub destination: Destination,
}

impl DialogueOption {
    pub fn new(label: impl Into<String>, destination: Destination) -> Self {
        Self {
            label: label.into(),
            destination,
        }
    }
}

/// A node of the dialogue graph: what the character says, how they look
/// while saying it, and the choices offered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueSection {
    pub text: String,
    pub affect: Affect,
    pub looking_down: bool,
    pub voice_style: VoiceStyle,
    pub options: Vec<DialogueOption>,
}

impl DialogueSection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            affect: Affect::default(),
            looking_down: false,
            voice_style: VoiceStyle::default(),
            options: Vec::new(),
        }
    }

    pub fn affect(mut self, affect: Affect) -> Self {
        self.affect = affect;
        self
    }

    pub fn looking_down(mut self, looking_down: bool) -> Self {
        self.looking_down = looking_down;
        self
    }

    pub fn voice_style(mut self, style: VoiceStyle) -> Self {
        self.voice_style = style;
        self
    }

    pub fn option(mut self, label: impl Into<String>, destination: Destination) -> Self {
        self.options.push(DialogueOption::new(label, destination));
        self
    }

    /// Labels in display order.
    pub fn option_labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.label.clone()).collect()
    }

    /// True if some option ends the story.
    pub fn can_end_story(&self) -> bool {
        self.options
            .iter()
            .any(|o| o.destination == Destination::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_builder() {
        let section = DialogueSection::new("Well, hello.")
            .affect(Affect::Shifty)
            .looking_down(true)
            .voice_style(VoiceStyle::Low)
            .option("Hi!", Destination::Section(SectionId(1)))
            .option("Bye.", Destination::GameOver);

        assert_eq!(section.text, "Well, hello.");
        assert_eq!(section.affect, Affect::Shifty);
        assert!(section.looking_down);
        assert_eq!(section.voice_style, VoiceStyle::Low);
        assert_eq!(section.option_labels(), vec!["Hi!", "Bye."]);
        assert!(section.can_end_story());
    }

    #[test]
    fn section_defaults() {
        let section = DialogueSection::new("");
        assert_eq!(section.affect, Affect::Normal);
        assert_eq!(section.voice_style, VoiceStyle::Normal);
        assert!(!section.looking_down);
        assert!(section.options.is_empty());
        assert!(!section.can_end_story());
    }

    #[test]
    fn destination_sentinel() {
        assert_eq!(Destination::from_raw(-1), Some(Destination::GameOver));
        assert_eq!(
            Destination::from_raw(4),
            Some(Destination::Section(SectionId(4)))
        );
        assert_eq!(Destination::from_raw(-2), None);
        assert_eq!(Destination::GameOver.to_raw(), -1);
        assert_eq!(Destination::Section(SectionId(3)).to_raw(), 3);
    }

    #[test]
    fn wide_destination_never_aliases_a_small_id() {
        let raw = 1_i64 << 32;
        match Destination::from_raw(raw) {
            Some(destination) => assert_eq!(destination.to_raw(), raw),
            // usize is 32 bits wide here.
            None => assert!(usize::try_from(raw).is_err()),
        }
    }

    #[test]
    fn affect_tags() {
        assert_eq!(Affect::Normal.tag(), "affect:normal");
        assert_eq!(Affect::Surprised.tag(), "affect:surprised");
    }

    #[test]
    fn voice_style_asset_names() {
        let names: Vec<&str> = VoiceStyle::ALL.iter().map(|s| s.asset_name()).collect();
        assert_eq!(
            names,
            vec!["wide", "normal", "narrow", "monotone", "low", "high"]
        );
    }
}
