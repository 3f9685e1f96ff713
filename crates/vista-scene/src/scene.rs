//! Ordered entity store with a clamped selection index

use crate::entity::Entity;
use vista_core::{pick_radius, Ray, Sphere};

/// Entities in insertion order plus the currently selected index.
///
/// The selection is only meaningful while the store is non-empty; it is kept
/// inside `[0, len - 1]` by `select` and `clamp_selection`.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
    selected: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return its index. Does not change the selection.
    pub fn spawn(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        let index = self.entities.len() - 1;
        log::debug!("Spawned entity {}", index);
        index
    }

    /// Select `index`, clamped into range. No-op on an empty store.
    pub fn select(&mut self, index: usize) {
        if self.entities.is_empty() {
            return;
        }
        self.selected = index.min(self.entities.len() - 1);
    }

    /// Re-clamp the selection after the store changed
    pub fn clamp_selection(&mut self) {
        if self.entities.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.entities.len() {
            self.selected = self.entities.len() - 1;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.entities.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected(&self) -> Option<&Entity> {
        self.selected_index().and_then(|i| self.entities.get(i))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Entity> {
        let index = self.selected_index()?;
        self.entities.get_mut(index)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Pick spheres of the given radius centered on every entity, in store order
    pub fn pick_spheres(&self, radius: f32) -> Vec<Sphere> {
        self.entities
            .iter()
            .map(|e| Sphere::new(e.position(), radius))
            .collect()
    }

    /// Select the nearest entity hit by `ray`. A miss leaves the selection alone.
    pub fn pick(&mut self, ray: &Ray, radius: f32) -> Option<usize> {
        let hit = ray.pick_nearest(&self.pick_spheres(radius));
        match hit {
            Some(index) => {
                log::debug!("Picked entity {}", index);
                self.select(index);
            }
            None => log::debug!("Pick missed"),
        }
        hit
    }

    /// Pick with the radius derived from an indicator size
    pub fn pick_with_size(&mut self, ray: &Ray, picker_size: f32) -> Option<usize> {
        self.pick(ray, pick_radius(picker_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{MeshHandle, ShaderHandle};
    use glam::{Mat4, Vec3};
    use vista_core::{screen_point_to_ray, Camera, Viewport};

    fn entity_at(x: f32, y: f32, z: f32) -> Entity {
        Entity::new(
            Mat4::from_translation(Vec3::new(x, y, z)),
            MeshHandle(0),
            ShaderHandle(0),
        )
    }

    fn line_scene() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(entity_at(0.0, 0.0, 0.0));
        scene.spawn(entity_at(5.0, 0.0, 0.0));
        scene.spawn(entity_at(10.0, 0.0, 0.0));
        scene
    }

    #[test]
    fn test_empty_scene() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.selected_index(), None);
        assert!(scene.selected().is_none());
        scene.select(3);
        assert_eq!(scene.selected_index(), None);
        assert!(scene.selected_mut().is_none());
    }

    #[test]
    fn test_spawn_does_not_select() {
        let mut scene = Scene::new();
        assert_eq!(scene.spawn(entity_at(0.0, 0.0, 0.0)), 0);
        assert_eq!(scene.spawn(entity_at(1.0, 0.0, 0.0)), 1);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.selected_index(), Some(0));
    }

    #[test]
    fn test_select_clamps() {
        let mut scene = line_scene();
        scene.select(1);
        assert_eq!(scene.selected_index(), Some(1));
        scene.select(99);
        assert_eq!(scene.selected_index(), Some(2));
        assert_eq!(scene.selected().unwrap().position(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_selected_mut_writes_back() {
        let mut scene = line_scene();
        scene.select(2);
        scene.selected_mut().unwrap().transform = Mat4::from_translation(Vec3::Y);
        assert_eq!(scene.get(2).unwrap().position(), Vec3::Y);
    }

    #[test]
    fn test_pick_selects_middle_entity() {
        let mut scene = line_scene();
        // Straight down onto (5, 0, 0) from above
        let ray = Ray::new(Vec3::new(5.0, 10.0, 0.0), Vec3::NEG_Y);
        assert_eq!(scene.pick(&ray, pick_radius(0.1)), Some(1));
        assert_eq!(scene.selected_index(), Some(1));
    }

    #[test]
    fn test_pick_miss_keeps_selection() {
        let mut scene = line_scene();
        scene.select(2);
        let ray = Ray::new(Vec3::new(2.5, 10.0, 0.0), Vec3::NEG_Y);
        assert_eq!(scene.pick_with_size(&ray, 0.1), None);
        assert_eq!(scene.selected_index(), Some(2));
    }

    #[test]
    fn test_pick_through_camera() {
        let mut scene = line_scene();
        let camera = Camera::new(Vec3::new(5.0, 0.0, 10.0), Vec3::Y, -90.0, 0.0);
        let viewport = Viewport::new(1280.0, 720.0);
        let ray = screen_point_to_ray(
            640.0,
            360.0,
            viewport.width,
            viewport.height,
            camera.view_matrix(),
            camera.projection_matrix(viewport),
        );
        assert_eq!(scene.pick_with_size(&ray, 0.1), Some(1));

        // Top-left corner looks well past every sphere
        scene.select(0);
        let ray = screen_point_to_ray(
            0.0,
            0.0,
            viewport.width,
            viewport.height,
            camera.view_matrix(),
            camera.projection_matrix(viewport),
        );
        assert_eq!(scene.pick_with_size(&ray, 0.1), None);
        assert_eq!(scene.selected_index(), Some(0));
    }

    #[test]
    fn test_clamp_selection() {
        let mut scene = Scene::new();
        scene.clamp_selection();
        assert_eq!(scene.selected_index(), None);
        scene.spawn(entity_at(0.0, 0.0, 0.0));
        scene.clamp_selection();
        assert_eq!(scene.selected_index(), Some(0));
    }
}
