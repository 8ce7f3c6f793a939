use anyhow::{Context, Result};

/// Device and surface setup options, shared by [`Gpu`](super::Gpu) and
/// [`HeadlessGpu`](super::HeadlessGpu).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB presentation format when the surface offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    /// Retry with the software adapter when no hardware adapter is found.
    /// Headless tests rely on this on CI machines.
    pub allow_fallback_adapter: bool,

    /// The renderer needs no optional features.
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Surface latency hint.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            allow_fallback_adapter: true,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Everything but the surface: instance, adapter, device and queue.
pub(crate) struct GpuCore {
    /// Outlives every surface created from it.
    pub _instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuCore {
    pub fn new_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Picks an adapter (compatible with `surface` when given) and opens a device on it.
    pub async fn request(
        instance: wgpu::Instance,
        init: &GpuInit,
        surface: Option<&wgpu::Surface<'_>>,
        label: &str,
    ) -> Result<Self> {
        let adapter = request_adapter(&instance, init, surface).await?;
        let (device, queue) = request_device(&adapter, init, label).await?;
        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }
}

/// Requests an adapter, optionally retrying with the software fallback adapter.
async fn request_adapter(
    instance: &wgpu::Instance,
    init: &GpuInit,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> Result<wgpu::Adapter> {
    let primary = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: init.power_preference,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await;

    match primary {
        Ok(adapter) => Ok(adapter),
        Err(err) if init.allow_fallback_adapter => {
            log::warn!("no hardware adapter ({err}); trying fallback adapter");
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::LowPower,
                    compatible_surface,
                    force_fallback_adapter: true,
                })
                .await
                .context("failed to find a suitable GPU adapter")
        }
        Err(err) => Err(err).context("failed to find a suitable GPU adapter"),
    }
}

/// Creates the logical device and queue for `adapter`.
async fn request_device(
    adapter: &wgpu::Adapter,
    init: &GpuInit,
    label: &str,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    let info = adapter.get_info();
    log::info!("using adapter {:?} ({:?})", info.name, info.backend);

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(label),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}
