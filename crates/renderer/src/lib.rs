//! Renderer-side consumers of loaded assets and world state.
//!
//! Kept independent of any graphics API: the model walker drives a
//! [`PolygonSink`], the mini map produces an [`OverlayFrame`] of batches.

pub mod immediate;
pub mod overlay;

pub use immediate::{DrawStats, PolygonSink, draw_model};
pub use overlay::{Field2DOverlay, OverlayConfig, OverlayFrame, OverlayPoint, PointBatch};
