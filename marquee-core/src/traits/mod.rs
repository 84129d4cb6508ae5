//! Hardware abstraction traits
//!
//! These traits define the interface between the display logic and the
//! board: something that can put text on the matrix, and something that
//! knows the wall clock time.

pub mod clock;
pub mod renderer;

pub use clock::{NoClock, WallClock};
pub use renderer::ScrollRenderer;
