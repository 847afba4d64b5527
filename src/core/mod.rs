pub mod bucket;
pub mod config;
pub mod engine;
pub mod input;
pub mod mouth;
pub mod presenter;
pub mod text_wrap;
pub mod voice;
