//! Camera panel: numeric widgets bound to the camera pose

use vista_core::Camera;

/// Edit position, yaw, pitch and fov in place. Returns true when anything changed.
pub fn camera_panel(ui: &mut egui::Ui, camera: &mut Camera) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        for value in [
            &mut camera.position.x,
            &mut camera.position.y,
            &mut camera.position.z,
        ] {
            changed |= ui.add(egui::DragValue::new(value).speed(0.05)).changed();
        }
        ui.label("Position");
    });

    ui.horizontal(|ui| {
        changed |= ui
            .add(egui::DragValue::new(&mut camera.yaw).speed(0.5).suffix("°"))
            .changed();
        ui.label("Yaw");
    });

    ui.horizontal(|ui| {
        changed |= ui
            .add(
                egui::DragValue::new(&mut camera.pitch)
                    .speed(0.5)
                    .range(-89.0..=89.0)
                    .suffix("°"),
            )
            .changed();
        ui.label("Pitch");
    });

    ui.horizontal(|ui| {
        changed |= ui
            .add(
                egui::DragValue::new(&mut camera.fov)
                    .speed(0.5)
                    .range(1.0..=180.0)
                    .suffix("°"),
            )
            .changed();
        ui.label("Fov");
    });

    if changed {
        camera.recompute_basis();
    }
    changed
}
