//! Offscreen scene rendering, blit to the window surface, and the HUD overlay.

pub mod blit;
pub mod framebuffer;
pub mod hud;
pub mod mesh;
pub mod raymarch;

use std::path::PathBuf;

use log::info;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::assets;
use crate::camera::FlyCamera;
use crate::cli::{Cli, Variant};
use crate::core::gpu_context::GpuContext;
use crate::error::GpuError;

use blit::BlitPass;
use framebuffer::Framebuffer;
use hud::{Hud, HudStats};
use mesh::MeshPass;
use raymarch::RaymarchPass;

/// Everything a scene pass reads each frame
pub struct SceneFrame<'a> {
    pub camera: &'a FlyCamera,
    /// Seconds since startup
    pub time: f32,
    pub resolution: [f32; 2],
}

/// A scene drawn into the offscreen framebuffer
pub trait ScenePass {
    fn name(&self) -> &str;

    /// Upload per-frame uniforms
    fn prepare(&mut self, queue: &wgpu::Queue, frame: &SceneFrame<'_>);

    /// Record draw calls into a pass targeting the framebuffer
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Renderer settings taken from the command line
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub variant: Variant,
    pub texture: Option<PathBuf>,
    pub shader: Option<PathBuf>,
    pub hud: bool,
}

impl From<&Cli> for RendererConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            variant: cli.variant,
            texture: cli.texture.clone(),
            shader: cli.shader.clone(),
            hud: !cli.no_ui,
        }
    }
}

pub struct Renderer {
    gpu: GpuContext,
    framebuffer: Framebuffer,
    blit: BlitPass,
    scene: Box<dyn ScenePass>,
    hud: Option<Hud>,
}

impl Renderer {
    pub fn new(gpu: GpuContext, window: &Window, config: &RendererConfig) -> Result<Self, GpuError> {
        let (width, height) = gpu.size();
        let framebuffer = Framebuffer::new(gpu.device(), width, height);
        let blit = BlitPass::new(&gpu, framebuffer.color_view())?;

        let scene: Box<dyn ScenePass> = match config.variant {
            Variant::Raymarch => {
                let source = assets::raymarch_shader_or_default(config.shader.as_deref())?;
                Box::new(RaymarchPass::new(&gpu, &source)?)
            }
            Variant::Mesh => {
                let max_dimension = gpu.device().limits().max_texture_dimension_2d;
                let texture = assets::texture_or_default(config.texture.as_deref(), max_dimension)?;
                Box::new(MeshPass::new(&gpu, &texture)?)
            }
        };

        let hud = config
            .hud
            .then(|| Hud::new(window, gpu.device(), gpu.surface_format()));

        info!(
            "Renderer initialized: scene={} size={}x{} hud={}",
            scene.name(),
            width,
            height,
            hud.is_some()
        );

        Ok(Self {
            gpu,
            framebuffer,
            blit,
            scene,
            hud,
        })
    }

    /// Resize surface and framebuffer. Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.gpu.resize(width, height);
        self.framebuffer = Framebuffer::new(self.gpu.device(), width, height);
        self.blit
            .set_source(self.gpu.device(), self.framebuffer.color_view());
    }

    /// Recover from a lost or outdated surface
    pub fn reconfigure(&self) {
        self.gpu.reconfigure();
    }

    /// Let the HUD see the event first. Returns true when it was consumed.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        match &mut self.hud {
            Some(hud) => hud.handle_event(window, event),
            None => false,
        }
    }

    pub fn render(
        &mut self,
        camera: &FlyCamera,
        window: &Window,
        time: f32,
        fps: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let (width, height) = self.framebuffer.dimensions();
        let frame = SceneFrame {
            camera,
            time,
            resolution: [width as f32, height as f32],
        };
        self.scene.prepare(self.gpu.queue(), &frame);

        let output = self.gpu.surface().get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        // Scene pass - into the offscreen framebuffer
        {
            let mut pass = self.framebuffer.begin_pass(&mut encoder);
            self.scene.draw(&mut pass);
        }

        // Blit pass - framebuffer to swapchain
        self.blit.draw(&mut encoder, &view);

        // HUD pass - overlay on the swapchain image
        let mut command_buffers = Vec::new();
        if let Some(hud) = &mut self.hud {
            let stats = HudStats {
                fps,
                position: camera.position(),
                yaw: camera.yaw(),
                pitch: camera.pitch(),
                scene: self.scene.name(),
            };
            command_buffers = hud.draw(&self.gpu, &mut encoder, &view, window, stats);
        }

        command_buffers.push(encoder.finish());
        self.gpu.queue().submit(command_buffers);
        output.present();
        Ok(())
    }
}
