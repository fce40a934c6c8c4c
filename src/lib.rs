pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod ui;
pub mod widgets;

pub use error::{GridError, GridResult};
