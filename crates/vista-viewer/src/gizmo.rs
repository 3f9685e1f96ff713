//! Transform gizmo: translate/rotate/scale handles drawn as an egui overlay
//!
//! The selected entity's origin is projected to screen space and the handles
//! are painted around it on the foreground layer. A drag produces a
//! `GizmoDelta`, which is applied to the entity's matrix: translation and
//! scale through the decomposed `Trs`, rotation about the world axes.

use glam::{Mat4, Vec3};
use vista_core::{decompose, recompose, Trs};

const X_COLOR: egui::Color32 = egui::Color32::from_rgb(214, 67, 67);
const Y_COLOR: egui::Color32 = egui::Color32::from_rgb(67, 172, 67);
const Z_COLOR: egui::Color32 = egui::Color32::from_rgb(67, 118, 214);
const X_HOVER: egui::Color32 = egui::Color32::from_rgb(255, 100, 100);
const Y_HOVER: egui::Color32 = egui::Color32::from_rgb(100, 220, 100);
const Z_HOVER: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const PLANE_ALPHA: u8 = 50;

const HANDLE_LENGTH: f32 = 80.0;
const ARROW_HEAD_SIZE: f32 = 10.0;
const HIT_THRESHOLD: f32 = 8.0;
const RING_RADIUS: f32 = 60.0;
const RING_SEGMENTS: usize = 48;
const SCALE_CUBE_SIZE: f32 = 6.0;
const PLANE_SIZE: f32 = 24.0;
const DEGREES_PER_PIXEL: f32 = 0.5;
const SCALE_PER_PIXEL: f32 = 0.005;

/// Which component the gizmo edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Which axis or plane the user is interacting with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GizmoAxis {
    X,
    Y,
    Z,
    XY,
    XZ,
    YZ,
}

impl GizmoAxis {
    const SINGLE: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];
    const PLANES: [(GizmoAxis, usize, usize); 3] = [
        (GizmoAxis::XY, 0, 1),
        (GizmoAxis::XZ, 0, 2),
        (GizmoAxis::YZ, 1, 2),
    ];

    fn indices(self) -> &'static [usize] {
        match self {
            GizmoAxis::X => &[0],
            GizmoAxis::Y => &[1],
            GizmoAxis::Z => &[2],
            GizmoAxis::XY => &[0, 1],
            GizmoAxis::XZ => &[0, 2],
            GizmoAxis::YZ => &[1, 2],
        }
    }
}

/// Change produced by one frame of dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoDelta {
    pub translation: Vec3,
    pub rotation_deg: Vec3,
    /// Multiplicative; `Vec3::ONE` leaves scale unchanged
    pub scale: Vec3,
}

impl Default for GizmoDelta {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_deg: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl GizmoDelta {
    /// Translation and scale edit the components directly. Rotation turns
    /// the entity about the world axes the rings are drawn around.
    pub fn apply(&self, matrix: &Mat4) -> Mat4 {
        let trs = decompose(matrix);
        let local = recompose(&Trs {
            translation: Vec3::ZERO,
            rotation_deg: trs.rotation_deg,
            scale: trs.scale * self.scale,
        });
        let r = self.rotation_deg;
        let world_rotation = Mat4::from_rotation_z(r.z.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_x(r.x.to_radians());
        Mat4::from_translation(trs.translation + self.translation) * world_rotation * local
    }
}

/// Per-frame camera data the gizmo projects with
#[derive(Debug, Clone, Copy)]
pub struct GizmoView {
    /// OpenGL-style view-projection
    pub view_proj: Mat4,
    pub camera_position: Vec3,
}

/// Interactive manipulator for the selected entity
#[derive(Debug, Default)]
pub struct TransformGizmo {
    hovered_axis: Option<GizmoAxis>,
    active_axis: Option<GizmoAxis>,
    last_mouse_pos: Option<egui::Pos2>,
}

impl TransformGizmo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active_axis.is_some()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered_axis.is_some()
    }

    /// Whether the gizmo claims the pointer this frame
    pub fn wants_pointer(&self) -> bool {
        self.is_dragging() || self.is_hovered()
    }

    /// Drop any in-flight drag, e.g. when the selection changes
    pub fn reset(&mut self) {
        self.hovered_axis = None;
        self.active_axis = None;
        self.last_mouse_pos = None;
    }

    /// Draw the handles around `entity_pos` and handle interaction.
    /// Returns a delta when the user dragged this frame.
    pub fn draw(
        &mut self,
        ctx: &egui::Context,
        mode: GizmoMode,
        view: &GizmoView,
        entity_pos: Vec3,
    ) -> Option<GizmoDelta> {
        let screen = ctx.screen_rect();
        let Some(center) = project_point(&view.view_proj, entity_pos, screen) else {
            self.reset();
            return None;
        };

        let cam_dist = view.camera_position.distance(entity_pos);
        let scale_factor = (cam_dist / 10.0).clamp(0.3, 3.0);
        let axis_dirs = axis_screen_dirs(&view.view_proj, entity_pos, center, screen);

        let pointer_pos = ctx.input(|i| i.pointer.hover_pos());
        let primary_down = ctx.input(|i| i.pointer.primary_down());
        let primary_pressed = ctx.input(|i| i.pointer.primary_pressed());
        let primary_released = ctx.input(|i| i.pointer.primary_released());

        if self.active_axis.is_none() {
            self.hovered_axis = match pointer_pos {
                // Panels take precedence over handles underneath them
                Some(pos) if !ctx.is_pointer_over_area() => {
                    hit_test(mode, center, pos, &axis_dirs, scale_factor)
                }
                _ => None,
            };
        }

        if primary_pressed && self.hovered_axis.is_some() {
            self.active_axis = self.hovered_axis;
            self.last_mouse_pos = pointer_pos;
        }

        let mut result = None;
        if let (Some(axis), Some(current), true) = (self.active_axis, pointer_pos, primary_down) {
            if let Some(last) = self.last_mouse_pos {
                let mouse_delta = current - last;
                if mouse_delta.length() > 0.0 {
                    result = Some(compute_delta(
                        mode,
                        axis,
                        mouse_delta,
                        &axis_dirs,
                        cam_dist,
                        screen.height(),
                    ));
                }
            }
            self.last_mouse_pos = Some(current);
        }

        if primary_released && self.active_axis.is_some() {
            self.active_axis = None;
            self.last_mouse_pos = None;
        }

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("transform_gizmo"),
        ));
        match mode {
            GizmoMode::Translate => self.draw_translate(&painter, center, &axis_dirs, scale_factor),
            GizmoMode::Rotate => self.draw_rotate(&painter, center, &axis_dirs, scale_factor),
            GizmoMode::Scale => self.draw_scale(&painter, center, &axis_dirs, scale_factor),
        }

        if self.wants_pointer() {
            ctx.set_cursor_icon(egui::CursorIcon::Grab);
        }

        result
    }

    fn highlighted(&self, axis: GizmoAxis) -> bool {
        self.active_axis == Some(axis) || self.hovered_axis == Some(axis)
    }

    fn draw_translate(
        &self,
        painter: &egui::Painter,
        center: egui::Pos2,
        axis_dirs: &[egui::Vec2; 3],
        scale: f32,
    ) {
        let length = HANDLE_LENGTH * scale;
        let head = ARROW_HEAD_SIZE * scale;
        let plane_len = PLANE_SIZE * scale;

        for (plane_axis, a, b) in GizmoAxis::PLANES {
            let c = AXIS_COLORS[a];
            let alpha = if self.highlighted(plane_axis) {
                PLANE_ALPHA + 40
            } else {
                PLANE_ALPHA
            };
            let da = axis_dirs[a] * plane_len;
            let db = axis_dirs[b] * plane_len;
            painter.add(egui::Shape::convex_polygon(
                vec![center, center + da, center + da + db, center + db],
                egui::Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), alpha),
                egui::Stroke::NONE,
            ));
        }

        for (i, axis) in GizmoAxis::SINGLE.into_iter().enumerate() {
            let dir = axis_dirs[i];
            let end = center + dir * length;
            let (color, width) = self.axis_style(axis, i);
            painter.line_segment([center, end], egui::Stroke::new(width, color));

            let perp = egui::vec2(-dir.y, dir.x);
            painter.add(egui::Shape::convex_polygon(
                vec![end + dir * head, end + perp * head * 0.4, end - perp * head * 0.4],
                color,
                egui::Stroke::NONE,
            ));
        }

        painter.circle_filled(center, 3.0, egui::Color32::WHITE);
    }

    fn draw_rotate(
        &self,
        painter: &egui::Painter,
        center: egui::Pos2,
        axis_dirs: &[egui::Vec2; 3],
        scale: f32,
    ) {
        let radius = RING_RADIUS * scale;
        for (i, axis) in GizmoAxis::SINGLE.into_iter().enumerate() {
            let (color, width) = self.axis_style(axis, i);
            let ring = ring_points(center, axis_dirs, i, radius);
            painter.add(egui::Shape::line(ring, egui::Stroke::new(width - 0.5, color)));
        }

        painter.circle_filled(center, 3.0, egui::Color32::WHITE);
    }

    fn draw_scale(
        &self,
        painter: &egui::Painter,
        center: egui::Pos2,
        axis_dirs: &[egui::Vec2; 3],
        scale: f32,
    ) {
        let length = HANDLE_LENGTH * scale;
        let cube = SCALE_CUBE_SIZE * scale;
        for (i, axis) in GizmoAxis::SINGLE.into_iter().enumerate() {
            let end = center + axis_dirs[i] * length;
            let (color, width) = self.axis_style(axis, i);
            painter.line_segment([center, end], egui::Stroke::new(width, color));
            painter.rect_filled(
                egui::Rect::from_center_size(end, egui::vec2(cube, cube)),
                0.0,
                color,
            );
        }

        painter.rect_filled(
            egui::Rect::from_center_size(center, egui::vec2(6.0, 6.0)),
            0.0,
            egui::Color32::WHITE,
        );
    }

    fn axis_style(&self, axis: GizmoAxis, index: usize) -> (egui::Color32, f32) {
        if self.highlighted(axis) {
            (AXIS_HOVER_COLORS[index], 3.0)
        } else {
            (AXIS_COLORS[index], 2.0)
        }
    }
}

const AXIS_COLORS: [egui::Color32; 3] = [X_COLOR, Y_COLOR, Z_COLOR];
const AXIS_HOVER_COLORS: [egui::Color32; 3] = [X_HOVER, Y_HOVER, Z_HOVER];

fn hit_test(
    mode: GizmoMode,
    center: egui::Pos2,
    mouse: egui::Pos2,
    axis_dirs: &[egui::Vec2; 3],
    scale: f32,
) -> Option<GizmoAxis> {
    let length = HANDLE_LENGTH * scale;
    let axis_hit = || {
        GizmoAxis::SINGLE.into_iter().enumerate().find_map(|(i, axis)| {
            let end = center + axis_dirs[i] * length;
            (point_to_segment_dist(mouse, center, end) < HIT_THRESHOLD).then_some(axis)
        })
    };

    match mode {
        GizmoMode::Translate => {
            let plane_len = PLANE_SIZE * scale;
            GizmoAxis::PLANES
                .into_iter()
                .find_map(|(plane_axis, a, b)| {
                    let plane_center =
                        center + (axis_dirs[a] + axis_dirs[b]) * plane_len * 0.5;
                    ((mouse - plane_center).length() < plane_len * 0.5).then_some(plane_axis)
                })
                .or_else(axis_hit)
        }
        GizmoMode::Rotate => {
            let radius = RING_RADIUS * scale;
            GizmoAxis::SINGLE
                .into_iter()
                .enumerate()
                .map(|(i, axis)| {
                    let ring = ring_points(center, axis_dirs, i, radius);
                    let dist = ring
                        .windows(2)
                        .map(|seg| point_to_segment_dist(mouse, seg[0], seg[1]))
                        .fold(f32::INFINITY, f32::min);
                    (axis, dist)
                })
                .filter(|(_, dist)| *dist < HIT_THRESHOLD)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(axis, _)| axis)
        }
        GizmoMode::Scale => axis_hit(),
    }
}

/// Turn a mouse movement into a component delta for the active axis
fn compute_delta(
    mode: GizmoMode,
    axis: GizmoAxis,
    mouse_delta: egui::Vec2,
    axis_dirs: &[egui::Vec2; 3],
    cam_dist: f32,
    viewport_height: f32,
) -> GizmoDelta {
    let pixel_to_world = cam_dist / viewport_height.max(1.0) * 2.0;
    let mut delta = GizmoDelta::default();

    for &i in axis.indices() {
        let dir = axis_dirs[i];
        match mode {
            GizmoMode::Translate => {
                delta.translation[i] = mouse_delta.dot(dir) * pixel_to_world;
            }
            GizmoMode::Rotate => {
                let perp = egui::vec2(-dir.y, dir.x);
                delta.rotation_deg[i] = mouse_delta.dot(perp) * DEGREES_PER_PIXEL;
            }
            GizmoMode::Scale => {
                let factor = 1.0 + mouse_delta.dot(dir) * SCALE_PER_PIXEL;
                delta.scale[i] = factor.clamp(0.01, 100.0);
            }
        }
    }

    delta
}

/// Screen directions of the world axes at `origin`, through the full projection
fn axis_screen_dirs(
    view_proj: &Mat4,
    origin: Vec3,
    center: egui::Pos2,
    viewport: egui::Rect,
) -> [egui::Vec2; 3] {
    [Vec3::X, Vec3::Y, Vec3::Z].map(|axis| {
        project_point(view_proj, origin + axis, viewport)
            .map(|tip| tip - center)
            .filter(|d| d.length() > 1e-6)
            .map(|d| d.normalized())
            .unwrap_or(egui::Vec2::ZERO)
    })
}

/// Ring around axis `index`, spanned by the screen directions of the other two
fn ring_points(
    center: egui::Pos2,
    axis_dirs: &[egui::Vec2; 3],
    index: usize,
    radius: f32,
) -> Vec<egui::Pos2> {
    let dir_a = axis_dirs[(index + 1) % 3];
    let dir_b = axis_dirs[(index + 2) % 3];
    (0..=RING_SEGMENTS)
        .map(|j| {
            let angle = (j as f32 / RING_SEGMENTS as f32) * std::f32::consts::TAU;
            center + dir_a * (angle.cos() * radius) + dir_b * (angle.sin() * radius)
        })
        .collect()
}

/// Project a world point to screen coordinates; `None` behind the camera
pub fn project_point(view_proj: &Mat4, point: Vec3, viewport: egui::Rect) -> Option<egui::Pos2> {
    let clip = *view_proj * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some(egui::pos2(
        viewport.left() + (ndc_x + 1.0) * 0.5 * viewport.width(),
        viewport.top() + (1.0 - ndc_y) * 0.5 * viewport.height(),
    ))
}

fn point_to_segment_dist(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq < 1e-12 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::{Camera, Viewport};

    const EPS: f32 = 1e-4;

    fn screen() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0))
    }

    fn view_proj() -> Mat4 {
        Camera::default().view_projection_matrix(Viewport::new(1280.0, 720.0))
    }

    #[test]
    fn test_project_point_center_and_behind() {
        let vp = view_proj();
        let center = project_point(&vp, Vec3::ZERO, screen()).unwrap();
        assert!((center.x - 640.0).abs() < EPS);
        assert!((center.y - 360.0).abs() < EPS);

        // Camera at z = 3 looking down -Z
        assert!(project_point(&vp, Vec3::new(0.0, 0.0, 10.0), screen()).is_none());
    }

    #[test]
    fn test_axis_dirs_for_front_view() {
        let vp = view_proj();
        let center = project_point(&vp, Vec3::ZERO, screen()).unwrap();
        let dirs = axis_screen_dirs(&vp, Vec3::ZERO, center, screen());
        assert!((dirs[0] - egui::vec2(1.0, 0.0)).length() < EPS);
        // Screen y grows downward
        assert!((dirs[1] - egui::vec2(0.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_translate_hit_test() {
        let dirs = [egui::vec2(1.0, 0.0), egui::vec2(0.0, -1.0), egui::vec2(0.0, 0.0)];
        let center = egui::pos2(100.0, 100.0);
        let hit = hit_test(GizmoMode::Translate, center, egui::pos2(160.0, 102.0), &dirs, 1.0);
        assert_eq!(hit, Some(GizmoAxis::X));
        let miss = hit_test(GizmoMode::Translate, center, egui::pos2(300.0, 300.0), &dirs, 1.0);
        assert_eq!(miss, None);
    }

    #[test]
    fn test_rotate_hit_test_picks_nearest_ring() {
        let dirs = [egui::vec2(1.0, 0.0), egui::vec2(0.0, -1.0), egui::vec2(0.0, 0.0)];
        let center = egui::pos2(0.0, 0.0);
        // Z ring is a full circle; X and Y rings collapse onto the screen axes
        let hit = hit_test(GizmoMode::Rotate, center, egui::pos2(41.7, 41.7), &dirs, 1.0);
        assert_eq!(hit, Some(GizmoAxis::Z));
    }

    #[test]
    fn test_translate_delta_follows_axis() {
        let dirs = [egui::vec2(1.0, 0.0), egui::vec2(0.0, -1.0), egui::vec2(0.0, 0.0)];
        let delta = compute_delta(
            GizmoMode::Translate,
            GizmoAxis::X,
            egui::vec2(36.0, 10.0),
            &dirs,
            10.0,
            720.0,
        );
        assert!((delta.translation.x - 1.0).abs() < EPS);
        assert_eq!(delta.translation.y, 0.0);
        assert_eq!(delta.scale, Vec3::ONE);
    }

    #[test]
    fn test_scale_delta_is_multiplicative() {
        let dirs = [egui::vec2(1.0, 0.0), egui::vec2(0.0, -1.0), egui::vec2(0.0, 0.0)];
        let delta = compute_delta(
            GizmoMode::Scale,
            GizmoAxis::Y,
            egui::vec2(0.0, -100.0),
            &dirs,
            10.0,
            720.0,
        );
        assert!((delta.scale.y - 1.5).abs() < EPS);

        let matrix = Trs::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 2.0, 1.0)).to_matrix();
        let applied = decompose(&delta.apply(&matrix));
        assert!((applied.scale.y - 3.0).abs() < EPS);
        assert!((applied.scale.x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_delta_translates_and_rotates() {
        let matrix = Trs::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 45.0, 0.0), Vec3::ONE)
            .to_matrix();
        let delta = GizmoDelta {
            translation: Vec3::new(0.5, 0.0, 0.0),
            rotation_deg: Vec3::new(0.0, 45.0, 0.0),
            scale: Vec3::ONE,
        };
        let edited = delta.apply(&matrix);
        assert!((edited.w_axis.x - 1.5).abs() < EPS);
        // 90 degrees about Y maps +X to -Z
        assert!((edited.x_axis.z + 1.0).abs() < EPS);
    }

    #[test]
    fn test_x_ring_rotates_about_world_x() {
        let matrix = Trs::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 90.0), Vec3::ONE).to_matrix();
        let delta = GizmoDelta {
            rotation_deg: Vec3::new(30.0, 0.0, 0.0),
            ..Default::default()
        };
        let edited = delta.apply(&matrix);

        let rotation = Mat4::from_rotation_x(30f32.to_radians());
        let expected = rotation * matrix;
        for (a, b) in edited.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert!((a - b).abs() < EPS);
        }
        // Entity +Y starts on world -X, which stays fixed
        assert!((edited.y_axis.truncate() - Vec3::new(-1.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_rotate_keeps_mirrored_entity() {
        let matrix = Trs::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(-1.0, 1.0, 1.0)).to_matrix();
        let delta = GizmoDelta {
            rotation_deg: Vec3::new(0.0, 0.0, 90.0),
            ..Default::default()
        };
        let edited = delta.apply(&matrix);
        let expected = Mat4::from_rotation_z(90f32.to_radians()) * matrix;
        for (a, b) in edited.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_point_to_segment_degenerate() {
        let a = egui::pos2(1.0, 1.0);
        assert!((point_to_segment_dist(egui::pos2(4.0, 5.0), a, a) - 5.0).abs() < EPS);
    }
}
