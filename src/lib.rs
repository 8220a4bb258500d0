pub mod combo;
pub mod config;
pub mod dance;
pub mod definitions;
pub mod devices;
pub mod event;
pub mod keycode;
pub mod keymap;
pub mod resolver;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
