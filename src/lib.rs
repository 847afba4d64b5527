//! Chatterbox is the dialogue core of a talking-head visual novel.
//!
//! Wraps and pages text for a fixed-size dialogue box, reveals it one
//! character at a time while a babble voice and a flapping mouth play,
//! and walks a branching graph of choices until the story ends.

pub mod core;
pub mod schema;
