pub mod app;
pub mod config;
pub mod effects;
pub mod export;
pub mod spectrum;
pub mod style;
pub mod track;
