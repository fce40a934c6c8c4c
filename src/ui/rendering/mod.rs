pub mod grid_render_context;

pub use grid_render_context::{EditOverlay, GridRenderContext, GridRenderContextBuilder};
