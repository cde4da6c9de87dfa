pub mod args;
pub mod cli;
pub mod components;
pub mod format;
pub mod prompt;
pub mod theme;
pub mod tray;
