// File: ./src/model/mod.rs
pub mod display;
pub mod item;
pub mod parser;

pub use item::{ActionKind, Metadata, TableKind, TaskUpdate, TrackerItem};
