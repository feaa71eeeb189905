use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use fly_demo::cli::Cli;
use fly_demo::core::{Clock, FpsCounter, GpuContext, InputHandler, Signal, WinitController};
use fly_demo::renderer::{Renderer, RendererConfig};
use fly_demo::FlyCamera;

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: FlyCamera,
    controller: WinitController,
    clock: Clock,
    fps: FpsCounter,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli) -> Self {
        let clock = Clock::new();
        let camera = FlyCamera::new(cli.camera_settings(), cli.projection(), clock.elapsed());

        Self {
            cli,
            window: None,
            renderer: None,
            camera,
            controller: WinitController::new(),
            clock,
            fps: FpsCounter::default(),
            startup_error: None,
        }
    }

    fn window_attributes(&self, event_loop: &ActiveEventLoop) -> winit::window::WindowAttributes {
        let size = PhysicalSize::new(self.cli.width, self.cli.height);
        let mut attributes = Window::default_attributes()
            .with_title("Fly Demo")
            .with_inner_size(size);

        // Centre on the primary monitor when one is reported
        if let Some(monitor) = event_loop.primary_monitor() {
            let origin = monitor.position();
            let screen = monitor.size();
            let x = origin.x + (screen.width as i32 - size.width as i32) / 2;
            let y = origin.y + (screen.height as i32 - size.height as i32) / 2;
            attributes = attributes.with_position(PhysicalPosition::new(x.max(origin.x), y.max(origin.y)));
        }

        attributes
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(self.window_attributes(event_loop))
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))
            .context("failed to initialize GPU")?;
        let (width, height) = gpu.size();
        self.camera.set_aspect(width, height);

        let renderer = Renderer::new(gpu, &window, &RendererConfig::from(&self.cli))
            .context("failed to initialize renderer")?;

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        if let Some(fps) = self.fps.frame(delta) {
            info!("FPS: {:.1}", fps);
        }

        let elapsed = self.clock.elapsed();
        self.camera.on_frame(elapsed);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        match renderer.render(&self.camera, window, elapsed as f32, self.fps.fps()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            error!("{:#}", e);
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        if self.controller.process_event(&event, &mut self.camera) == Signal::Quit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
                self.camera.set_aspect(size.width, size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    cli.validate().context("invalid command line")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);

    info!("Fly Demo - Controls: WASD to move, right-drag to look, Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
