//! Christmas Adventures game library crate.

pub mod app;
pub mod asset;
pub mod audio;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod geometry;
pub mod gui;
pub mod level;
pub mod logging;
pub mod platform;
pub mod render;
pub mod screens;
pub mod session;
pub mod settings;
pub mod systems;
pub mod timing;
