pub mod app;
mod board;
pub mod catalog;
mod debug_tools;
mod dialogs;
mod game;
mod hud;
pub mod rules;
mod scene;
mod state;

pub const LOG_DOMAIN: &str = "concord";
