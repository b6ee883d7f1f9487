pub mod action;
pub mod config;
pub mod style;
pub mod testing;
pub mod vertex_cover;

pub use crate::config::JudgeConfig;
