use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::InputState;
use crate::time::FrameClock;

/// Window options.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Requests an app can make from `on_frame`; applied once the frame is done.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    /// Locks (or confines) and hides the cursor so mouse motion can steer a
    /// camera; `false` releases it.
    pub fn set_cursor_grab(&mut self, grab: bool) {
        self.commands.push(Command::SetCursorGrab(grab));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

#[derive(Debug)]
enum Command {
    SetTitle(String),
    SetCursorGrab(bool),
    Exit,
}

/// Single-window event loop driving an [`App`].
pub struct Runtime;

impl Runtime {
    /// Runs until the window closes or the app exits.
    ///
    /// Fails if the event loop cannot start or the window / GPU cannot be set
    /// up; per-frame surface errors never end up here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState {
            config,
            gpu_init,
            app,
            input: InputState::default(),
            entry: None,
            fatal: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.fatal.map_or(Ok(()), Err)
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }

    fn set_cursor_grab(&self, grab: bool) {
        self.with_window(|w| {
            let result = if grab {
                w.set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| w.set_cursor_grab(CursorGrabMode::Confined))
            } else {
                w.set_cursor_grab(CursorGrabMode::None)
            };
            if let Err(err) = result {
                log::warn!("cursor grab ({grab}) not applied: {err}");
            }
            w.set_cursor_visible(!grab);
        });
    }
}

struct RuntimeState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    input: InputState,
    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
}

impl<A: App> RuntimeState<A> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        // GPU resources go before the loop tears the display connection down.
        self.entry = None;
        event_loop.exit();
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };
        entry.resize(size);
        entry.request_redraw();
        self.app.on_resize((size.width, size.height));
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else { return };

        let app = &mut self.app;
        let input = &self.input;
        let mut runtime = RuntimeCtx::default();
        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
                input,
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });
        self.input.end_frame();

        if control == AppControl::Exit {
            runtime.exit();
        }

        for command in runtime.commands {
            match command {
                Command::SetTitle(title) => entry.with_window(|w| w.set_title(&title)),
                Command::SetCursorGrab(grab) => entry.set_cursor_grab(grab),
                Command::Exit => {
                    log::debug!("exit requested by app");
                    self.shutdown(event_loop);
                    return;
                }
            }
        }
    }
}

impl<A: App> ApplicationHandler for RuntimeState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match WindowEntry::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(entry) => {
                log::debug!("window {:?} opened", entry.id());
                entry.request_redraw();
                self.entry = Some(entry);
                self.input.set_focused(true);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the camera animates with frame time.
        if let Some(entry) = self.entry.as_ref() {
            entry.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(size) => self.resized(size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resized(size);
                }
            }

            WindowEvent::Focused(focused) => self.input.set_focused(focused),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.input.key_pressed(code);
                    if self.app.on_key(code) == AppControl::Exit {
                        self.shutdown(event_loop);
                    }
                }
                ElementState::Released => self.input.key_released(code),
            },

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.add_mouse_motion(dx, dy);
        }
    }
}
