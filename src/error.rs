//! Error types for galaxygen.
//!
//! The generator has exactly one failure mode, a rejected parameter; the
//! viewer adds the usual GPU and windowing failures around it.

use std::fmt;

/// A parameter outside the domain [`crate::galaxy::generate`] can work with.
///
/// Raised synchronously before any buffer is allocated. The panel clamps its
/// widgets to valid ranges, so this is a defensive path for programmatic
/// callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidParameterError {
    /// `count` must be at least 1.
    Count(u32),
    /// `branches` must be at least 1; branch assignment takes an index
    /// modulo this value.
    Branches(u32),
    /// `radius` must be finite and positive, or the color interpolation
    /// factor is undefined.
    Radius(f32),
}

impl fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidParameterError::Count(n) => {
                write!(f, "count must be at least 1, got {}", n)
            }
            InvalidParameterError::Branches(n) => {
                write!(f, "branches must be at least 1, got {}", n)
            }
            InvalidParameterError::Radius(r) => {
                write!(f, "radius must be finite and positive, got {}", r)
            }
        }
    }
}

impl std::error::Error for InvalidParameterError {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The initial parameters were rejected by the generator.
    InvalidParameter(InvalidParameterError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to run event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::InvalidParameter(e) => write!(f, "Invalid galaxy parameters: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::InvalidParameter(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<InvalidParameterError> for ViewerError {
    fn from(e: InvalidParameterError) -> Self {
        ViewerError::InvalidParameter(e)
    }
}
