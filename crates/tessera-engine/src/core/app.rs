use winit::keyboard::KeyCode;

use super::ctx::FrameCtx;

/// Whether the runtime keeps going after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives. The viewer is the one implementation.
///
/// Every callback runs on the event-loop thread, in event order; `on_frame`
/// runs once per redraw.
pub trait App {
    /// A physical key went down (repeats included). Held keys are also
    /// visible through `FrameCtx::input`.
    fn on_key(&mut self, key: KeyCode) -> AppControl {
        let _ = key;
        AppControl::Continue
    }

    /// The drawable area changed, in physical pixels. May be zero while minimized.
    fn on_resize(&mut self, size: (u32, u32)) {
        let _ = size;
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
