//! Rendering boundary
//!
//! The simulation never draws. A renderer implements [`Surface`] and
//! [`SurfaceSync`] mirrors the world onto it after each tick.

pub mod surface;
pub mod sync;

pub use surface::{Geometry, HeadlessSurface, ShapeHandle, Style, Surface, SurfaceStats};
pub use sync::{SurfaceSync, appearance, sprite_path};
