//! Editor state shared by the frame loop, the panels and the renderer

use crate::gizmo::GizmoMode;
use glam::{Mat4, Vec3};
use vista_core::{pick_radius, Camera, ViewerConfig, Viewport};
use vista_render::{DepthMode, DrawItem};
use vista_runtime::{Action, CameraController, InputState, MOUSE_LEFT};
use vista_scene::{spawn_transform, Entity, MeshHandle, Scene, ShaderHandle};

/// Handles used to draw the pick indicators
#[derive(Debug, Clone, Copy)]
pub struct IndicatorHandles {
    pub mesh: MeshHandle,
    pub idle: ShaderHandle,
    pub selected: ShaderHandle,
}

/// Everything one frame of the editor reads and mutates.
///
/// Owned by the frame loop and handed to each stage in turn; nothing here is
/// global.
pub struct EditorState {
    pub camera: Camera,
    pub viewport: Viewport,
    pub scene: Scene,
    pub input: InputState,
    pub controller: CameraController,
    pub gizmo_mode: GizmoMode,
    /// Indicator sphere scale; picking uses a radius 10% larger
    pub picker_size: f32,
    pub spawn_distance: f32,
    pub spawn_scale: f32,
    /// Whether the entity editor was expanded last frame
    pub panel_open: bool,
    /// Set by the UI while the gizmo owns the pointer
    pub gizmo_active: bool,
    exit_requested: bool,
}

impl EditorState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            viewport: Viewport::new(config.window.width as f32, config.window.height as f32),
            scene: Scene::new(),
            input: InputState::new(),
            controller: CameraController::new(),
            gizmo_mode: GizmoMode::Translate,
            picker_size: config.editor.picker_size,
            spawn_distance: config.editor.spawn_distance,
            spawn_scale: config.editor.spawn_scale,
            panel_open: true,
            gizmo_active: false,
            exit_requested: false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width as f32, height as f32);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Apply all input buffered since the last frame, then clear it.
    pub fn update(&mut self, delta_time: f32) {
        if self.input.is_action_triggered(Action::Exit) {
            self.exit_requested = true;
        }

        self.controller
            .update(&self.input, &mut self.camera, delta_time);

        if self.input.is_action_triggered(Action::GizmoTranslate) {
            self.gizmo_mode = GizmoMode::Translate;
        }
        if self.input.is_action_triggered(Action::GizmoRotate) {
            self.gizmo_mode = GizmoMode::Rotate;
        }
        if self.input.is_action_triggered(Action::GizmoScale) {
            self.gizmo_mode = GizmoMode::Scale;
        }

        if self.input.is_mouse_button_just_released(MOUSE_LEFT) && !self.gizmo_active {
            if let Some((x, y)) = self.input.mouse_position() {
                self.pick_at(x as f32, y as f32);
            }
        }

        self.scene.clamp_selection();
        self.input.end_frame();
    }

    /// Select the nearest entity under a pixel. Returns the hit, if any.
    pub fn pick_at(&mut self, screen_x: f32, screen_y: f32) -> Option<usize> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return None;
        }
        let ray = self.camera.screen_ray(screen_x, screen_y, self.viewport);
        self.scene.pick(&ray, pick_radius(self.picker_size))
    }

    /// Spawn in front of the camera. The new entity is not selected.
    pub fn spawn_entity(&mut self, mesh: MeshHandle, shader: ShaderHandle) -> usize {
        let transform = spawn_transform(&self.camera, self.spawn_distance, self.spawn_scale);
        let index = self.scene.spawn(Entity::new(transform, mesh, shader));
        log::info!("Added entity {} ({} total)", index, self.scene.len());
        index
    }

    pub fn view_projection(&self) -> Mat4 {
        self.camera.view_projection_matrix(self.viewport)
    }

    /// Entities first, then one overlay indicator per entity while the
    /// editor panel is open.
    pub fn draw_items(&self, indicators: &IndicatorHandles) -> Vec<DrawItem> {
        let entities = self.scene.entities();
        let mut items: Vec<DrawItem> = entities
            .iter()
            .map(|e| DrawItem {
                mesh: e.mesh,
                shader: e.shader,
                transform: e.transform,
                depth: DepthMode::Tested,
            })
            .collect();

        if self.panel_open {
            let selected = self.scene.selected_index();
            let scale = Vec3::splat(self.picker_size);
            items.extend(entities.iter().enumerate().map(|(i, e)| DrawItem {
                mesh: indicators.mesh,
                shader: if Some(i) == selected {
                    indicators.selected
                } else {
                    indicators.idle
                },
                transform: Mat4::from_scale_rotation_translation(
                    scale,
                    glam::Quat::IDENTITY,
                    e.position(),
                ),
                depth: DepthMode::Overlay,
            }));
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    const EPS: f32 = 1e-4;

    fn state() -> EditorState {
        EditorState::new(&ViewerConfig::default())
    }

    fn handles() -> IndicatorHandles {
        IndicatorHandles {
            mesh: MeshHandle(9),
            idle: ShaderHandle(1),
            selected: ShaderHandle(2),
        }
    }

    #[test]
    fn test_spawn_in_front_of_camera() {
        let mut state = state();
        let index = state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        assert_eq!(index, 0);

        let entity = state.scene.get(0).unwrap();
        // Default camera at (0,0,3) looking down -Z
        assert!((entity.position() - Vec3::ZERO).length() < EPS);
        assert!((entity.transform.x_axis.length() - 0.3).abs() < EPS);
    }

    #[test]
    fn test_click_center_picks_entity() {
        let mut state = state();
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.camera.position.x = 5.0;
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.camera.position.x = 0.0;
        assert_eq!(state.scene.selected_index(), Some(0));

        state.camera.position.x = 5.0;
        state.input.process_mouse_move(640.0, 360.0);
        state.input.process_mouse_button_down(MOUSE_LEFT);
        state.input.process_mouse_button_up(MOUSE_LEFT);
        state.update(0.0);

        assert_eq!(state.scene.selected_index(), Some(1));
    }

    #[test]
    fn test_gizmo_drag_suppresses_pick() {
        let mut state = state();
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.camera.position.x = 5.0;
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));

        state.gizmo_active = true;
        state.input.process_mouse_move(640.0, 360.0);
        state.input.process_mouse_button_down(MOUSE_LEFT);
        state.input.process_mouse_button_up(MOUSE_LEFT);
        state.update(0.0);

        assert_eq!(state.scene.selected_index(), Some(0));
    }

    #[test]
    fn test_release_without_press_does_not_pick() {
        let mut state = state();
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.camera.position.x = 5.0;
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));

        state.input.process_mouse_move(640.0, 360.0);
        state.input.process_mouse_button_up(MOUSE_LEFT);
        state.update(0.0);

        assert_eq!(state.scene.selected_index(), Some(0));
    }

    #[test]
    fn test_digits_switch_gizmo_mode() {
        let mut state = state();
        state.input.process_key_down(KeyCode::Digit2);
        state.update(0.0);
        assert_eq!(state.gizmo_mode, GizmoMode::Rotate);

        state.input.process_key_up(KeyCode::Digit2);
        state.input.process_key_down(KeyCode::Digit3);
        state.update(0.0);
        assert_eq!(state.gizmo_mode, GizmoMode::Scale);

        state.input.process_key_down(KeyCode::Digit1);
        state.update(0.0);
        assert_eq!(state.gizmo_mode, GizmoMode::Translate);
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut state = state();
        assert!(!state.exit_requested());
        state.input.process_key_down(KeyCode::Escape);
        state.update(0.0);
        assert!(state.exit_requested());
    }

    #[test]
    fn test_update_clears_frame_input() {
        let mut state = state();
        state.input.process_scroll(2.0);
        state.update(0.0);
        assert!((state.camera.fov - 43.0).abs() < EPS);

        state.update(0.0);
        assert!((state.camera.fov - 43.0).abs() < EPS);
    }

    #[test]
    fn test_draw_items_with_panel_open() {
        let mut state = state();
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.camera.position.x = 5.0;
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.scene.select(1);

        let items = state.draw_items(&handles());
        assert_eq!(items.len(), 4);
        assert!(items[..2].iter().all(|i| i.depth == DepthMode::Tested));
        assert!(items[2..].iter().all(|i| i.depth == DepthMode::Overlay));
        assert_eq!(items[2].shader, ShaderHandle(1));
        assert_eq!(items[3].shader, ShaderHandle(2));
        assert_eq!(items[3].mesh, MeshHandle(9));
        assert!((items[3].transform.w_axis.x - 5.0).abs() < EPS);
        assert!((items[3].transform.x_axis.x - 0.1).abs() < EPS);
    }

    #[test]
    fn test_draw_items_with_panel_closed() {
        let mut state = state();
        state.spawn_entity(MeshHandle(0), ShaderHandle(0));
        state.panel_open = false;
        let items = state.draw_items(&handles());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].depth, DepthMode::Tested);
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut state = state();
        state.resize(800, 600);
        assert_eq!(state.viewport, Viewport::new(800.0, 600.0));
        state.resize(800, 0);
        assert!(state.pick_at(10.0, 10.0).is_none());
    }
}
