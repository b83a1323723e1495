//! Layer state and overlay publishing for masked map presentations.
//!
//! A [`LayerStateMachine`] owns the current mask and at most one published
//! overlay. Keyboard-style commands reach it through a [`CommandDispatcher`].

pub mod catalog;
pub mod command;
pub mod config;
pub mod display;
pub mod source;
pub mod state;

pub use catalog::ShapeCatalog;
pub use command::{Command, CommandDispatcher};
pub use config::MaskConfig;
pub use display::{ImageOverlay, InMemoryDisplay, MapDisplay, OverlayHandle};
pub use source::{placeholder_raster, HeatmapSource, RasterSource, VectorSource};
pub use state::{LayerState, LayerStateMachine, MaskState, TransitionReport};
