//! The seam between the platform runtime and the frame orchestrator.
//!
//! The runtime owns the window, GPU and clock and calls into an [`App`]; the
//! app draws through [`FrameCtx::render`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
