pub mod graph;
pub mod section;
