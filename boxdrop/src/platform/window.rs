// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Native window platform
//!
//! Uses `winit` for the window and event loop and `wgpu` to draw. The
//! window, surface and device all exist once graphics are configured, so a
//! missing display or adapter is reported by configure and not by run. Each
//! frame's quads are collected as triangles and drawn in a single render
//! pass on present. The event loop is driven through a short-lived
//! `Trampoline` that borrows the engine's callback receiver for the
//! duration of [`Platform::run`].

use crate::config::{EngineConfig, ScreenMode};
use crate::coords::{PixelPoint, ScreenState};
use crate::error::EngineError;
use crate::input::{ButtonState, Key, MouseButton};
use crate::platform::{Callbacks, Platform};
use crate::render::{Canvas, Color};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as LogicalKey, NamedKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Quads the vertex buffer holds before it has to grow
const INITIAL_QUADS: usize = 256;
/// Two triangles per quad
const VERTICES_PER_QUAD: usize = 6;

/// A `winit` window drawn with `wgpu`
#[derive(Default)]
pub struct WindowPlatform {
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
}

impl WindowPlatform {
    /// Create an unconfigured platform
    pub fn new() -> Self {
        WindowPlatform::default()
    }
}

impl Platform for WindowPlatform {
    fn configure_graphics(
        &mut self,
        mode: ScreenMode,
        config: &EngineConfig,
    ) -> Result<ScreenState, EngineError> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::Graphics(e.to_string()))?;

        let mut attributes = Window::default_attributes()
            .with_title(config.window_title.clone())
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height));
        if mode == ScreenMode::FullScreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        // opened before run so display and adapter errors surface here
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| EngineError::Graphics(e.to_string()))?;
        let window = Arc::new(window);
        let canvas = GpuCanvas::new(window.clone())?;

        let size = window.inner_size();
        let mut screen = config.nominal_screen();
        screen.resize(size.width, size.height);
        info!(?mode, width = size.width, height = size.height, "window opened");

        self.event_loop = Some(event_loop);
        self.window = Some(window);
        self.canvas = Some(canvas);
        Ok(screen)
    }

    fn run(&mut self, callbacks: &mut dyn Callbacks) -> Result<u64, EngineError> {
        let (Some(event_loop), Some(window), Some(canvas)) =
            (self.event_loop.take(), self.window.take(), self.canvas.take())
        else {
            return Err(EngineError::Graphics("window platform was not configured".to_string()));
        };

        let mut trampoline = Trampoline {
            callbacks,
            window: Some(window),
            canvas: Some(canvas),
            started: false,
            cursor: (0.0, 0.0),
            next_tick: Instant::now(),
            ticks: 0,
            error: None,
        };

        let result = event_loop.run_app(&mut trampoline);

        self.window = trampoline.window.take();
        self.canvas = trampoline.canvas.take();

        if let Some(err) = trampoline.error.take() {
            return Err(err);
        }
        result.map_err(|e| EngineError::Graphics(e.to_string()))?;
        Ok(trampoline.ticks)
    }

    fn teardown(&mut self) {
        if let Some(window) = &self.window {
            window.set_fullscreen(None);
        }
        // surface before window
        self.canvas = None;
        if self.window.take().is_some() {
            info!("window closed");
        }
    }

    fn name(&self) -> &str {
        "window"
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
}

/// Collects one frame of quads and draws them on present
struct GpuCanvas {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    clear: Color,
    vertices: Vec<Vertex>,
}

impl GpuCanvas {
    fn new(window: Arc<Window>) -> Result<Self, EngineError> {
        pollster::block_on(Self::create(window))
    }

    async fn create(window: Arc<Window>) -> Result<Self, EngineError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EngineError::Graphics(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| EngineError::Graphics("no compatible graphics adapter".to_string()))?;
        info!(adapter = ?adapter.get_info().name, "graphics adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("boxdrop device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| EngineError::Graphics(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| EngineError::Graphics("surface supports no texture format".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("quad.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let capacity = INITIAL_QUADS * VERTICES_PER_QUAD;
        let vertex_buffer = create_vertex_buffer(&device, capacity);

        Ok(GpuCanvas {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            capacity,
            clear: Color::BLACK,
            vertices: Vec::with_capacity(capacity),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn to_ndc(&self, point: PixelPoint) -> [f32; 2] {
        [
            point.x / self.config.width as f32 * 2.0 - 1.0,
            1.0 - point.y / self.config.height as f32 * 2.0,
        ]
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quad vertices"),
        size: (std::mem::size_of::<Vertex>() * vertices) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn channels(color: Color) -> [f32; 3] {
    [
        f32::from(color.r) / 255.0,
        f32::from(color.g) / 255.0,
        f32::from(color.b) / 255.0,
    ]
}

impl Canvas for GpuCanvas {
    fn clear(&mut self, color: Color) {
        self.clear = color;
        self.vertices.clear();
    }

    fn fill_quad(&mut self, corners: &[PixelPoint; 4], color: Color) {
        let color = channels(color);
        let [a, b, c, d] = corners.map(|p| self.to_ndc(p));
        for position in [a, b, c, a, c, d] {
            self.vertices.push(Vertex { position, color });
        }
    }

    fn present(&mut self) -> Result<(), EngineError> {
        if self.vertices.len() > self.capacity {
            self.capacity = self.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.capacity);
            debug!(vertices = self.capacity, "vertex buffer grown");
        }
        if !self.vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("frame skipped: surface timed out");
                return Ok(());
            }
            Err(err) => return Err(EngineError::Present(err.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let [r, g, b] = channels(self.clear);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !self.vertices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..self.vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Forwards `winit` events to the engine callbacks
struct Trampoline<'a> {
    callbacks: &'a mut dyn Callbacks,
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    started: bool,
    cursor: (f64, f64),
    next_tick: Instant,
    ticks: u64,
    error: Option<EngineError>,
}

impl Trampoline<'_> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        error!(%err, "leaving event loop");
        self.error = Some(err);
        event_loop.exit();
    }

    fn check_shutdown(&self, event_loop: &ActiveEventLoop) {
        if self.callbacks.shutdown_requested() {
            debug!("shutdown requested");
            event_loop.exit();
        }
    }

    fn start(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        self.callbacks.reshape(size.width, size.height);
        window.request_redraw();
        self.next_tick = Instant::now() + self.callbacks.timer_period();
        self.started = true;
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(());
        };
        self.callbacks.timer(canvas)?;
        self.ticks += 1;

        self.next_tick = next_deadline(self.next_tick, self.callbacks.timer_period(), Instant::now());
        Ok(())
    }
}

/// Deadline for the tick after one due at `previous`
///
/// Stays on the fixed grid while on time. Once the grid has fallen behind
/// `now`, the next tick is one period from now, so missed ticks are dropped
/// rather than fired back to back.
fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Instant {
    let next = previous + period;
    if next < now {
        now + period
    } else {
        next
    }
}

impl ApplicationHandler for Trampoline<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.started {
            self.start();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                debug!("close requested");
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.resize(size.width, size.height);
                }
                self.callbacks.reshape(size.width, size.height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Back => MouseButton::Other(3),
                    winit::event::MouseButton::Forward => MouseButton::Other(4),
                    winit::event::MouseButton::Other(code) => MouseButton::Other(code),
                };
                let state = match state {
                    ElementState::Pressed => ButtonState::Pressed,
                    ElementState::Released => ButtonState::Released,
                };
                self.callbacks.mouse(button, state, self.cursor.0, self.cursor.1);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let key = match &event.logical_key {
                    LogicalKey::Named(NamedKey::Escape) => Key::Escape,
                    LogicalKey::Character(text) => {
                        text.chars().next().map_or(Key::Other, Key::Character)
                    }
                    _ => Key::Other,
                };
                self.callbacks.keyboard(key, self.cursor.0, self.cursor.1);
            }
            WindowEvent::RedrawRequested => {
                if let Some(canvas) = self.canvas.as_mut() {
                    if let Err(err) = self.callbacks.display(canvas) {
                        self.fail(event_loop, err);
                        return;
                    }
                }
            }
            _ => {}
        }

        self.check_shutdown(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.started || event_loop.exiting() {
            return;
        }

        if Instant::now() >= self.next_tick {
            if let Err(err) = self.tick() {
                self.fail(event_loop, err);
                return;
            }
            self.check_shutdown(event_loop);
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(16);

    #[test]
    fn test_deadline_on_schedule_advances_one_period() {
        let start = Instant::now();
        let now = start + Duration::from_millis(3);

        assert_eq!(next_deadline(start, PERIOD, now), start + PERIOD);
    }

    #[test]
    fn test_deadline_exactly_due_stays_on_grid() {
        let start = Instant::now();
        let now = start + PERIOD;

        assert_eq!(next_deadline(start, PERIOD, now), start + PERIOD);
    }

    #[test]
    fn test_deadline_behind_schedule_skips_catch_up() {
        let start = Instant::now();
        // five periods late
        let now = start + PERIOD * 5;
        let next = next_deadline(start, PERIOD, now);

        assert_eq!(next, now + PERIOD);
        assert!(next > now);
    }

    #[test]
    fn test_deadlines_after_stall_are_spaced_by_period() {
        let start = Instant::now();
        let now = start + Duration::from_millis(500);
        let first = next_deadline(start, PERIOD, now);
        let second = next_deadline(first, PERIOD, first);

        assert_eq!(second - first, PERIOD);
    }
}
