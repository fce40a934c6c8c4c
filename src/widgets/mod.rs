//! Overlay widgets drawn on top of the grid

pub mod debug_widget;
pub mod help_widget;
