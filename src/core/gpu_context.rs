use std::sync::Arc;

use log::{debug, info};
use wgpu::{Adapter, Device, DeviceDescriptor, Instance, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::error::GpuError;

type Result<T> = std::result::Result<T, GpuError>;

/// What a validation scope guarded, so a failure maps to the matching error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTarget {
    Shader,
    Pipeline,
    Texture,
}

impl ValidationTarget {
    fn error(self, label: &str, message: String) -> GpuError {
        let label = label.to_string();
        match self {
            ValidationTarget::Shader => GpuError::Shader { label, message },
            ValidationTarget::Pipeline => GpuError::Pipeline { label, message },
            ValidationTarget::Texture => GpuError::Texture { label, message },
        }
    }
}

/// Keep `value` unless the scope reported an error
fn check_scope<T>(
    target: ValidationTarget,
    label: &str,
    value: T,
    error: Option<String>,
) -> Result<T> {
    match error {
        Some(message) => Err(target.error(label, message)),
        None => Ok(value),
    }
}

/// Device, queue and the window surface they present to
pub struct GpuContext {
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

impl GpuContext {
    /// Create a GPU context presenting to `window`
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = Self::request_device(&adapter).await?;
        let config = Self::create_surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface(&self) -> &Surface<'static> {
        &self.surface
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface. Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-apply the current configuration after the surface was lost
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Compile WGSL, turning validation failures into an error instead of a panic
    pub fn create_shader(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
        let module = self.validated(ValidationTarget::Shader, label, |device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })?;
        debug!("Compiled shader {}", label);
        Ok(module)
    }

    /// Run `create` inside a validation error scope. Anything wgpu rejects
    /// while it runs comes back as an error for `target` instead of reaching
    /// the uncaptured-error handler.
    pub fn validated<T>(
        &self,
        target: ValidationTarget,
        label: &str,
        create: impl FnOnce(&Device) -> T,
    ) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = create(&self.device);
        let error = pollster::block_on(self.device.pop_error_scope());
        check_scope(target, label, value, error.map(|e| e.to_string()))
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> Result<Adapter> {
        Ok(instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await?)
    }

    /// Request device and queue
    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        Ok(adapter
            .request_device(&DeviceDescriptor {
                label: Some("GPU Context Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await?)
    }

    fn create_surface_config(
        surface: &Surface,
        adapter: &Adapter,
        width: u32,
        height: u32,
    ) -> Result<SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::NoSurfaceFormat)?;

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_scope_keeps_value() {
        let value = check_scope(ValidationTarget::Pipeline, "Blit Pipeline", 7, None);
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn pipeline_failure_names_label_and_cause() {
        let err = check_scope(
            ValidationTarget::Pipeline,
            "Raymarch Pipeline",
            (),
            Some("entry point `vs_main` not found".to_string()),
        )
        .unwrap_err();

        match &err {
            GpuError::Pipeline { label, message } => {
                assert_eq!(label, "Raymarch Pipeline");
                assert!(message.contains("vs_main"));
            }
            other => panic!("expected pipeline error, got {:?}", other),
        }
        assert!(err.to_string().contains("Raymarch Pipeline"));
    }

    #[test]
    fn each_target_maps_to_its_error() {
        let fail = |target| check_scope(target, "x", (), Some("bad".to_string())).unwrap_err();

        assert!(matches!(fail(ValidationTarget::Shader), GpuError::Shader { .. }));
        assert!(matches!(fail(ValidationTarget::Pipeline), GpuError::Pipeline { .. }));
        assert!(matches!(fail(ValidationTarget::Texture), GpuError::Texture { .. }));
    }
}
