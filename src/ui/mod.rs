//! User interface layer
//!
//! The grid application, its focus and edit controller, and the pieces
//! that tie them to the terminal.

pub mod actions;
pub mod cell_handles;
pub mod column_resize;
pub mod focus_controller;
pub mod focus_ring;
pub mod grid_app;
pub mod grid_renderer;
pub mod rendering;
