//! Mouse picking via ray-sphere intersection
//!
//! Unprojects a screen point through the inverse view-projection matrix and
//! tests the resulting ray against fixed-radius spheres around each entity.
//! The spheres are a coarse stand-in for mesh bounds.

use glam::{Mat4, Vec3, Vec4};

/// A ray in world space with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Bounding sphere used as a pick target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Pick sphere radius for a given indicator size (10% margin around the indicator)
pub fn pick_radius(picker_size: f32) -> f32 {
    picker_size + picker_size * 0.1
}

/// Build a world-space ray from a pixel coordinate (origin top-left).
///
/// The pixel is placed on the near plane (NDC z = -1), unprojected, and the
/// ray runs from the camera position through it. The camera position is
/// recovered from the view matrix.
pub fn screen_point_to_ray(
    screen_x: f32,
    screen_y: f32,
    viewport_width: f32,
    viewport_height: f32,
    view: Mat4,
    projection: Mat4,
) -> Ray {
    let origin = view.inverse().w_axis.truncate();
    unproject_ray(
        screen_x,
        screen_y,
        viewport_width,
        viewport_height,
        (projection * view).inverse(),
        origin,
    )
}

/// Ray from `origin` through a pixel on the near plane of an already
/// inverted view-projection
pub fn unproject_ray(
    screen_x: f32,
    screen_y: f32,
    viewport_width: f32,
    viewport_height: f32,
    inverse_view_projection: Mat4,
    origin: Vec3,
) -> Ray {
    let ndc_x = 2.0 * screen_x / viewport_width - 1.0;
    let ndc_y = 1.0 - 2.0 * screen_y / viewport_height; // Y flipped

    let near = inverse_view_projection * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let near = near.truncate() / near.w;

    Ray {
        origin,
        direction: (near - origin).normalize(),
    }
}

/// Boolean ray-sphere test.
///
/// A ray starting outside the sphere and pointing away from it misses.
/// Otherwise the discriminant decides; a tangent ray counts as a hit. The ray
/// has no far bound.
pub fn intersect_ray_sphere(origin: Vec3, direction: Vec3, sphere: &Sphere) -> bool {
    let m = origin - sphere.center;
    let b = m.dot(direction);
    let c = m.dot(m) - sphere.radius * sphere.radius;

    if c > 0.0 && b > 0.0 {
        return false;
    }

    let discriminant = b * b - c;
    discriminant >= 0.0
}

/// Index of the hit sphere whose center is closest to `origin`.
///
/// Ties keep the earliest candidate, so the result only depends on input order.
pub fn pick_nearest(origin: Vec3, direction: Vec3, candidates: &[Sphere]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (index, sphere) in candidates.iter().enumerate() {
        if !intersect_ray_sphere(origin, direction, sphere) {
            continue;
        }
        let distance = origin.distance(sphere.center);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    best.map(|(index, _)| index)
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn pick_nearest(&self, candidates: &[Sphere]) -> Option<usize> {
        pick_nearest(self.origin, self.direction, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Viewport};

    #[test]
    fn test_ray_toward_center_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!(intersect_ray_sphere(Vec3::ZERO, Vec3::NEG_Z, &sphere));
    }

    #[test]
    fn test_ray_away_from_center_misses() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!(!intersect_ray_sphere(Vec3::ZERO, Vec3::Z, &sphere));
    }

    #[test]
    fn test_tangent_ray_hits() {
        // Closest approach of the ray to the center is exactly the radius
        let sphere = Sphere::new(Vec3::new(0.0, 1.0, -5.0), 1.0);
        assert!(intersect_ray_sphere(Vec3::ZERO, Vec3::NEG_Z, &sphere));
    }

    #[test]
    fn test_near_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 1.5, -5.0), 1.0);
        assert!(!intersect_ray_sphere(Vec3::ZERO, Vec3::NEG_Z, &sphere));
    }

    #[test]
    fn test_origin_inside_sphere_always_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.5), 1.0);
        assert!(intersect_ray_sphere(Vec3::ZERO, Vec3::NEG_Z, &sphere));
        assert!(intersect_ray_sphere(Vec3::ZERO, Vec3::Z, &sphere));
        assert!(intersect_ray_sphere(Vec3::ZERO, Vec3::X, &sphere));
    }

    #[test]
    fn test_pick_radius() {
        assert!((pick_radius(0.1) - 0.11).abs() < 1e-6);
        assert_eq!(pick_radius(0.0), 0.0);
    }

    #[test]
    fn test_pick_nearest_chooses_closest() {
        let candidates = [
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0),
            Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0),
            Sphere::new(Vec3::new(0.0, 0.0, -6.0), 1.0),
        ];
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::NEG_Z, &candidates), Some(1));
    }

    #[test]
    fn test_pick_nearest_none() {
        let candidates = [Sphere::new(Vec3::new(5.0, 0.0, -3.0), 1.0)];
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::NEG_Z, &candidates), None);
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::NEG_Z, &[]), None);
    }

    #[test]
    fn test_pick_nearest_tie_keeps_first() {
        let candidates = [
            Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0),
            Sphere::new(Vec3::new(0.0, 0.0, -4.0), 2.0),
        ];
        assert_eq!(pick_nearest(Vec3::ZERO, Vec3::NEG_Z, &candidates), Some(0));
    }

    #[test]
    fn test_pick_nearest_deterministic() {
        let camera = Camera::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let ray = screen_point_to_ray(
            640.0,
            360.0,
            viewport.width,
            viewport.height,
            camera.view_matrix(),
            camera.projection_matrix(viewport),
        );
        let candidates: Vec<Sphere> = (0..8)
            .map(|i| Sphere::new(Vec3::new(0.0, 0.0, -(i as f32)), 0.5))
            .collect();
        let first = ray.pick_nearest(&candidates);
        for _ in 0..10 {
            assert_eq!(ray.pick_nearest(&candidates), first);
        }
    }

    #[test]
    fn test_center_pixel_ray_matches_front() {
        let camera = Camera::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let ray = screen_point_to_ray(
            640.0,
            360.0,
            viewport.width,
            viewport.height,
            camera.view_matrix(),
            camera.projection_matrix(viewport),
        );
        assert!((ray.origin - camera.position).length() < 1e-4);
        assert!((ray.direction - camera.front()).length() < 1e-4);
    }

    #[test]
    fn test_corner_pixel_ray_points_up_left() {
        let camera = Camera::default();
        let viewport = Viewport::new(800.0, 600.0);
        let ray = screen_point_to_ray(
            0.0,
            0.0,
            viewport.width,
            viewport.height,
            camera.view_matrix(),
            camera.projection_matrix(viewport),
        );
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.z < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }
}
