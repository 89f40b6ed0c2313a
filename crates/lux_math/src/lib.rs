// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat3_rotation_round_trip() {
        let rot = Mat3::from_rotation_y(0.75);
        let v = Vec3::new(1.0, 2.0, 3.0);
        let back = rot.transpose() * (rot * v);
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn test_vec3_indexing() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 2.0);
        assert_eq!(v[2], 3.0);
    }
}
