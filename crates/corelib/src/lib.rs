//! Core types: math re-exports, bounds, viewport/camera, world snapshot.

pub use glam::{Mat4, Vec3, vec3};

pub mod bounds;
pub mod camera;
pub mod world;

pub use bounds::BoundingBox;
pub use camera::{TopDownCamera, Viewport};
pub use world::{GameState, GameStateListener, Team, WorldSnapshot};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_from_points_matches_extremes() {
        let b = BoundingBox::from_points([
            vec3(0.0, 0.0, 0.0),
            vec3(2.0, 3.0, 1.0),
            vec3(-1.0, 0.0, 5.0),
        ])
        .expect("non-empty");
        assert_eq!(b.min, vec3(-1.0, 0.0, 0.0));
        assert_eq!(b.max, vec3(2.0, 3.0, 5.0));
    }

    #[test]
    fn top_down_pv_is_finite() {
        let cam = camera::TopDownCamera::for_field(180.0, 120.0);
        let a = cam.proj_view().to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
