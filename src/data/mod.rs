//! Data layer for the grid
//!
//! `DataTable` holds the schema and rows, `GridStore` wraps it with the
//! mutation API and event dispatch, and `DataView` is the visible-column
//! projection everything else reads through.

pub mod data_provider;
pub mod data_view;
pub mod datatable;
pub mod events;
