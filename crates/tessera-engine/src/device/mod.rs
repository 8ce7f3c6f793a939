//! GPU device + surface management.
//!
//! - [`Gpu`]: device bound to a window surface; acquires, submits and presents frames
//! - [`HeadlessGpu`]: device without a surface; renders into textures and reads them back
//!
//! Both are built from the same [`GpuInit`] and the same adapter/device setup.

mod context;
mod frame;
mod headless;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::GpuFrame;
pub use headless::{HeadlessGpu, padded_bytes_per_row};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
