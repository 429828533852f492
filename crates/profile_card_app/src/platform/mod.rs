pub mod app;
pub mod cli;
pub mod config;
pub mod effects;
pub mod input;
pub mod ui;

pub use app::run_app;
