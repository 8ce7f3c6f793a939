//! Debug statistics shown in the window title while enabled (F3).

use crate::camera::FlyCamera;

/// Frames between title refreshes.
pub const REFRESH_FRAMES: u64 = 30;

#[derive(Debug, Default)]
pub struct DebugStats {
    enabled: bool,
    /// Exponential moving average of frame time, seconds.
    frame_time: f32,
}

impl DebugStats {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn record_frame(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.frame_time = if self.frame_time == 0.0 {
            dt
        } else {
            self.frame_time * 0.9 + dt * 0.1
        };
    }

    pub fn fps(&self) -> f32 {
        if self.frame_time > 0.0 { 1.0 / self.frame_time } else { 0.0 }
    }

    /// Title for the window: `base` alone while disabled.
    pub fn title(&self, base: &str, camera: &FlyCamera) -> String {
        if !self.enabled {
            return base.to_string();
        }
        let p = camera.position;
        let r = camera.rotation;
        format!(
            "{base} | {:.0} fps | pos [{:.2}, {:.2}, {:.2}] | rot [{:.2}, {:.2}]",
            self.fps(),
            p.x,
            p.y,
            p.z,
            r.x,
            r.y
        )
    }
}
