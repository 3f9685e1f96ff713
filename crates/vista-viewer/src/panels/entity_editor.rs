//! Entity editor window: selection info, gizmo mode, TRS fields, spawn button

use crate::gizmo::{GizmoMode, GizmoView, TransformGizmo};
use crate::state::EditorState;
use glam::Vec3;
use vista_core::{decompose, recompose, Trs};

/// What the window reported this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityEditorResponse {
    /// False when the window is collapsed
    pub open: bool,
    pub add_model: bool,
}

/// Show the window and, while it is expanded, the gizmo over the selection
pub fn entity_editor(
    ctx: &egui::Context,
    state: &mut EditorState,
    gizmo: &mut TransformGizmo,
) -> EntityEditorResponse {
    let mut add_model = false;

    let shown = egui::Window::new("Entity editor")
        .default_pos([16.0, 16.0])
        .resizable(false)
        .show(ctx, |ui| {
            state.scene.clamp_selection();
            let mode = &mut state.gizmo_mode;
            if let Some(index) = state.scene.selected_index() {
                ui.label(format!("Selected entity: {}", index));

                ui.horizontal(|ui| {
                    ui.radio_value(mode, GizmoMode::Translate, "Translate");
                    ui.radio_value(mode, GizmoMode::Rotate, "Rotate");
                    ui.radio_value(mode, GizmoMode::Scale, "Scale");
                });

                if let Some(entity) = state.scene.selected_mut() {
                    let mut trs = decompose(&entity.transform);
                    if trs_fields(ui, &mut trs) {
                        entity.transform = recompose(&trs);
                    }
                }
            }

            ui.separator();
            if ui.button("Add model").clicked() {
                add_model = true;
            }
        });

    let open = shown.is_some_and(|response| response.inner.is_some());

    let selected_pos = state.scene.selected().map(|e| e.position());
    match selected_pos {
        Some(position) if open => {
            let view = GizmoView {
                view_proj: state.view_projection(),
                camera_position: state.camera.position,
            };
            if let Some(delta) = gizmo.draw(ctx, state.gizmo_mode, &view, position) {
                if let Some(entity) = state.scene.selected_mut() {
                    entity.transform = delta.apply(&entity.transform);
                }
            }
        }
        _ => gizmo.reset(),
    }

    EntityEditorResponse { open, add_model }
}

/// Tr / Rt / Sc rows. Returns true when any field was edited.
fn trs_fields(ui: &mut egui::Ui, trs: &mut Trs) -> bool {
    let mut changed = false;
    changed |= vec3_row(ui, "Tr", &mut trs.translation, 0.01, 3);
    changed |= vec3_row(ui, "Rt", &mut trs.rotation_deg, 0.1, 1);
    changed |= vec3_row(ui, "Sc", &mut trs.scale, 0.01, 3);
    changed
}

fn vec3_row(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64, decimals: usize) -> bool {
    ui.horizontal(|ui| {
        let mut changed = false;
        for component in [&mut value.x, &mut value.y, &mut value.z] {
            changed |= ui
                .add(
                    egui::DragValue::new(component)
                        .speed(speed)
                        .fixed_decimals(decimals),
                )
                .changed();
        }
        ui.label(label);
        changed
    })
    .inner
}
