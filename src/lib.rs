pub mod cli;
pub mod color;
pub mod grid;
pub mod input;
pub mod model;
pub mod palette_type;
pub mod pipeline;
pub mod prefs;
pub mod tps;
pub mod tui;
pub mod type_selector;
