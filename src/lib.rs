//! # galaxygen - Procedural Spiral Galaxies
//!
//! Generates spiral galaxy point clouds from a small set of tweakable
//! parameters and displays them in an interactive wgpu viewer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxygen::{GalaxyParams, Viewer};
//!
//! fn main() -> Result<(), galaxygen::ViewerError> {
//!     Viewer::new()
//!         .with_params(GalaxyParams {
//!             branches: 5,
//!             spin: 2.0,
//!             ..Default::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Generation
//!
//! [`galaxy::generate`] is a pure function: [`GalaxyParams`] in, a
//! [`PointCloud`] of parallel position/color buffers out. Each point lands
//! on one of `branches` spiral arms, twisted by `spin` proportionally to its
//! radial distance, scattered by a power-shaped jitter, and colored by a
//! center-to-edge gradient. Randomness is injected, so seeded runs are
//! bit-reproducible (see [`galaxy::generate_seeded`]).
//!
//! ### Rendering
//!
//! The generator never touches the GPU. A [`PointCloudRenderer`] accepts a
//! finished cloud, releases the previous one, and tracks the viewport;
//! [`GpuRenderer`] implements it with instanced billboard points and
//! additive blending. The field is static between regenerations - nothing
//! animates but the camera.
//!
//! ### The Panel
//!
//! With the `egui` feature (on by default), the viewer shows a tweak panel
//! for every parameter. Edits regenerate the galaxy when editing finishes,
//! never mid-drag.

pub mod camera;
pub mod error;
pub mod galaxy;
#[cfg(feature = "egui")]
pub mod panel;
pub mod renderer;
pub mod viewer;

pub use camera::Camera;
pub use error::{GpuError, InvalidParameterError, ViewerError};
pub use galaxy::{generate, generate_seeded, hex_color, GalaxyParams, PointCloud};
pub use glam::Vec3;
pub use renderer::{GpuRenderer, Overlay, PointCloudRenderer};
pub use viewer::Viewer;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use galaxygen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::error::{GpuError, InvalidParameterError, ViewerError};
    pub use crate::galaxy::{generate, generate_seeded, hex_color, GalaxyParams, PointCloud};
    pub use crate::renderer::{GpuRenderer, PointCloudRenderer};
    pub use crate::viewer::Viewer;
    pub use crate::Vec3;
}
