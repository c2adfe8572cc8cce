pub mod config;
pub mod slider;
pub mod ui;
