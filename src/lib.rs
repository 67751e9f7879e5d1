pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod math;
pub mod measurement;
pub mod mode;
pub mod offline;
pub mod overlay;
pub mod persistence;
pub mod picking;
pub mod render;
pub mod route;

pub use config::EditorConfig;
pub use editor::MapEditor;
pub use error::{Result, WaymarkError};
