//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Patient form for the 13 clinical parameters
//! - Assessment report with risk tier, insights and precautions

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::ClinicalTheme;
