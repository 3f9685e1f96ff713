//! Editor application: winit event loop, wgpu scene rendering and egui panels
//!
//! Each frame runs strictly in order: buffered input is applied to the
//! editor state, the UI runs (and may edit the selection), then the scene and
//! the UI are drawn and presented.

use crate::gizmo::{GizmoMode, TransformGizmo};
use crate::panels::{camera_panel, entity_editor, EntityEditorResponse, RenderStats};
use crate::state::{EditorState, IndicatorHandles};
use anyhow::{Context, Result};
use std::sync::Arc;
use vista_core::ViewerConfig;
use vista_import::load_model;
use vista_render::{RenderContext, SceneRenderer};
use vista_runtime::{FrameClock, MOUSE_LEFT, MOUSE_MIDDLE, MOUSE_RIGHT};
use vista_scene::{MeshHandle, ShaderHandle};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

/// Open the editor window and run until it is closed
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Handles resolved once at startup
#[derive(Debug, Clone, Copy)]
struct Handles {
    model: MeshHandle,
    basic: ShaderHandle,
    indicators: IndicatorHandles,
}

/// Everything that exists only once the window does
struct Gpu {
    context: RenderContext,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    handles: Handles,
}

struct ViewerApp {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    init_error: Option<anyhow::Error>,

    state: EditorState,
    clock: FrameClock,
    gizmo: TransformGizmo,
    stats: RenderStats,
    egui_ctx: egui::Context,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            state: EditorState::new(&config),
            config,
            window: None,
            gpu: None,
            init_error: None,
            clock: FrameClock::new(),
            gizmo: TransformGizmo::new(),
            stats: RenderStats::new(),
            egui_ctx: egui::Context::default(),
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create editor window")?,
        );
        self.window = Some(window.clone());

        let context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize render context")?;
        self.state.resize(context.size.width, context.size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &context.device,
            context.surface_format(),
            None,
            1,
            false,
        );

        let mut renderer = SceneRenderer::new(
            &context.device,
            &context.queue,
            context.surface_format(),
            self.config.assets.shader_dir.clone(),
            self.config.window.clear_color,
        );

        let device = &context.device;
        let basic = renderer.compile_shader(device, "basic.vert.wgsl", "basic.frag.wgsl");
        let green = renderer.compile_shader(device, "basic.vert.wgsl", "green.frag.wgsl");
        let red = renderer.compile_shader(device, "basic.vert.wgsl", "red.frag.wgsl");

        let model = renderer.upload_model(device, &context.queue, &load_model(&self.config.assets.model));
        let indicator = match &self.config.assets.indicator_model {
            Some(path) => renderer.upload_model(device, &context.queue, &load_model(path)),
            None => renderer.upload_sphere(device),
        };

        self.gpu = Some(Gpu {
            context,
            renderer,
            egui_winit,
            egui_renderer,
            handles: Handles {
                model,
                basic,
                indicators: IndicatorHandles {
                    mesh: indicator,
                    idle: green,
                    selected: red,
                },
            },
        });

        Ok(())
    }

    /// One frame: input, UI, scene, present
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let delta_time = self.clock.tick();

        // The gizmo's state from last frame decides whether a click is a pick
        self.state.gizmo_active = self.gizmo.wants_pointer();
        self.state.update(delta_time);
        if self.state.exit_requested() {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let state = &mut self.state;
        let gizmo = &mut self.gizmo;
        let stats = &self.stats;
        let mut editor = EntityEditorResponse::default();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            editor = entity_editor(ctx, state, gizmo);

            egui::Window::new("Camera")
                .default_pos([16.0, 240.0])
                .default_open(false)
                .resizable(false)
                .show(ctx, |ui| {
                    camera_panel(ui, &mut state.camera);
                });

            egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    stats.ui(ui, state.scene.len());
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::from_rgb(180, 180, 200),
                        mode_label(state.gizmo_mode),
                    );
                });
            });
        });

        self.state.panel_open = editor.open;
        if editor.add_model {
            self.state
                .spawn_entity(gpu.handles.model, gpu.handles.basic);
        }

        let items = self.state.draw_items(&gpu.handles.indicators);
        self.stats.draw_items = items.len();
        self.stats.record_frame();

        let context = &gpu.context;
        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        gpu.renderer.render(
            &context.device,
            &context.queue,
            &mut encoder,
            &view,
            &context.depth.view,
            self.state.view_projection(),
            &items,
        );

        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&context.device, &context.queue, *id, image_delta);
        }

        let egui_commands = gpu.egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            gpu.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(
            egui_commands
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );

        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize editor: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // egui sees every event first; presses it claims never reach the editor
        let consumed = match (&mut self.gpu, &self.window) {
            (Some(gpu), Some(window)) => gpu.egui_winit.on_window_event(window, &event).consumed,
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size);
                }
                self.state.resize(new_size.width, new_size.height);
            }

            WindowEvent::Focused(false) => {
                self.state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let input = &mut self.state.input;
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if !consumed => input.process_key_down(code),
                        ElementState::Released => input.process_key_up(code),
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let input = &mut self.state.input;
                if let Some(id) = mouse_button_id(button) {
                    match state {
                        ElementState::Pressed if !consumed => input.process_mouse_button_down(id),
                        ElementState::Released => input.process_mouse_button_up(id),
                        _ => {}
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.state.input.process_mouse_move(position.x, position.y);
            }

            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(pos) => pos.y / 100.0,
                };
                self.state.input.process_scroll(lines);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn mouse_button_id(button: MouseButton) -> Option<u32> {
    match button {
        MouseButton::Left => Some(MOUSE_LEFT),
        MouseButton::Right => Some(MOUSE_RIGHT),
        MouseButton::Middle => Some(MOUSE_MIDDLE),
        _ => None,
    }
}

fn mode_label(mode: GizmoMode) -> &'static str {
    match mode {
        GizmoMode::Translate => "Translate",
        GizmoMode::Rotate => "Rotate",
        GizmoMode::Scale => "Scale",
    }
}
