//! UI layer for desktop GUI: the two-pane app shell.

pub mod app;

pub use app::DesktopGuiApp;
