pub mod app;
pub mod config;
pub mod extension;
pub mod protocol;
pub mod runner;
pub mod services;
pub mod shared;
pub mod tui;
