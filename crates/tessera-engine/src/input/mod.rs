//! Input subsystem.
//!
//! The runtime feeds window and device events into [`InputState`]; apps read it
//! through `FrameCtx::input`.

mod state;

pub use state::InputState;
