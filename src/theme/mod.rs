//! Theme module - theme resolution, built-in theme and asset copying

pub mod builtin;
mod loader;

pub use loader::{ThemeLoader, LAYOUTS_DIR};
