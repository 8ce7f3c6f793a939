use glam::Vec2;
use winit::keyboard::KeyCode;

use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::input::InputState;
use tessera_engine::render::{FrameRenderer, SamplerConfig};

use crate::camera::{Axis, FlyCamera, Movement};
use crate::resources::SceneResources;
use crate::stats::{DebugStats, REFRESH_FRAMES};
use crate::world::World;

pub const TITLE: &str = "tessera viewer";

/// Windowed viewer.
///
/// Tab toggles mouse look (grabs the cursor), WASD / Space / Left Shift fly,
/// F3 toggles the stats in the title, Escape exits.
pub struct ViewerApp {
    renderer: FrameRenderer,
    world: World,
    sampler: SamplerConfig,
    camera: FlyCamera,
    stats: DebugStats,
    mouse_look: bool,
    pending_grab: Option<bool>,
    title_dirty: bool,
    resources: Option<SceneResources>,
}

impl ViewerApp {
    pub fn new(
        renderer: FrameRenderer,
        world: World,
        sampler: SamplerConfig,
        camera: FlyCamera,
    ) -> Self {
        Self {
            renderer,
            world,
            sampler,
            camera,
            stats: DebugStats::default(),
            mouse_look: false,
            pending_grab: None,
            title_dirty: false,
            resources: None,
        }
    }

    fn steer(&mut self, input: &InputState, dt: f32) {
        if self.mouse_look {
            let (dx, dy) = input.mouse_delta();
            self.camera.rotate(Vec2::new(dx, dy));
        }

        let movement = Movement::from_axes(|axis| match axis {
            Axis::Forward => (input.key_down(KeyCode::KeyW), input.key_down(KeyCode::KeyS)),
            Axis::Right => (input.key_down(KeyCode::KeyD), input.key_down(KeyCode::KeyA)),
            Axis::Up => (
                input.key_down(KeyCode::Space),
                input.key_down(KeyCode::ShiftLeft),
            ),
        });
        if !movement.is_idle() {
            self.camera.translate(movement, dt);
        }
    }
}

impl App for ViewerApp {
    fn on_key(&mut self, key: KeyCode) -> AppControl {
        match key {
            KeyCode::Escape => {
                log::info!("escape pressed, exiting");
                return AppControl::Exit;
            }
            KeyCode::Tab => {
                self.mouse_look = !self.mouse_look;
                self.pending_grab = Some(self.mouse_look);
                log::debug!("mouse look {}", if self.mouse_look { "on" } else { "off" });
            }
            KeyCode::F3 => {
                let enabled = self.stats.toggle();
                self.title_dirty = true;
                log::info!("debug stats {}", if enabled { "shown" } else { "hidden" });
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, size: (u32, u32)) {
        self.renderer.resize(size);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.resources.is_none() {
            match SceneResources::new(
                ctx.gpu.device(),
                ctx.gpu.queue(),
                &self.world,
                self.renderer.shading(),
                self.sampler,
            ) {
                Ok(r) => self.resources = Some(r),
                Err(e) => {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
        }

        if let Some(grab) = self.pending_grab.take() {
            ctx.runtime.set_cursor_grab(grab);
        }

        self.steer(ctx.input, ctx.time.dt);
        self.stats.record_frame(ctx.time.dt);

        let refresh = self.stats.enabled() && ctx.time.frame_index % REFRESH_FRAMES == 0;
        if self.title_dirty || refresh {
            ctx.runtime.set_title(self.stats.title(TITLE, &self.camera));
            self.title_dirty = false;
        }

        let Some(resources) = self.resources.as_mut() else {
            return AppControl::Exit;
        };
        let view_proj = self.camera.view_proj(ctx.window.aspect_ratio());
        resources.camera.write(ctx.gpu.queue(), view_proj);

        let renderer = &mut self.renderer;
        let resources = &*resources;
        ctx.render(|rctx, target| {
            resources.draw(|frame| renderer.render(rctx, target, frame));
        })
    }
}
