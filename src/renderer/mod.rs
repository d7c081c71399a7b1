//! Frame composition behind an abstract surface
//!
//! The projector turns a ray batch into sky, ground and wall layers using
//! only `RenderSurface` calls. Whatever presents the pixels (a window, or
//! the software framebuffer used by tests and headless runs) lives behind
//! that trait.

pub mod projector;
pub mod surface;

pub use projector::Projector;
pub use surface::{FrameBuffer, RenderSurface, Rgb, Viewport};
