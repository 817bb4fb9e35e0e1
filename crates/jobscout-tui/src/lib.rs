// Terminal UI implementation using ratatui

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, AppEvent, Command, InputMode, Tab, View};
pub use runner::run_tui;
