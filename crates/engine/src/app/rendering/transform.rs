use glam::{Mat4, Vec3};

use crate::content::PathTransform;

/// Compose a partial transform onto `parent`. Order is translate,
/// rotate Z then Y then X (so X reaches points first), pivot offset,
/// scale. Absent properties contribute identity.
pub fn compose(parent: Mat4, transform: &PathTransform) -> Mat4 {
    let mut matrix = parent;
    if let Some(pos) = transform.pos {
        matrix *= Mat4::from_translation(pos);
    }
    if let Some(rot) = transform.rot {
        matrix *= Mat4::from_rotation_z(rot.z);
        matrix *= Mat4::from_rotation_y(rot.y);
        matrix *= Mat4::from_rotation_x(rot.x);
    }
    if let Some(offset) = transform.offset {
        matrix *= Mat4::from_translation(offset);
    }
    if let Some(scale) = transform.scale {
        matrix *= Mat4::from_scale(scale);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_point_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn position_translates_the_origin() {
        let transform = PathTransform::empty().with_pos(Vec3::new(1.0, 2.0, 3.0));
        let matrix = compose(Mat4::IDENTITY, &transform);
        assert_point_close(matrix.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rotation_reaches_points_in_x_then_y_then_z_order() {
        let transform =
            PathTransform::empty().with_rot(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let matrix = compose(Mat4::IDENTITY, &transform);
        // X first lifts +Y onto +Z, which the Z rotation then leaves alone.
        assert_point_close(
            matrix.transform_point3(Vec3::new(0.0, 1.0, 0.0)),
            Vec3::new(0.0, 0.0, 1.0),
        );
    }

    #[test]
    fn offset_rotates_about_a_pivot() {
        let transform = PathTransform::empty()
            .with_pos(Vec3::new(1.0, 0.0, 0.0))
            .with_rot(Vec3::new(0.0, 0.0, FRAC_PI_2))
            .with_offset(Vec3::new(-1.0, 0.0, 0.0));
        let matrix = compose(Mat4::IDENTITY, &transform);
        assert_point_close(
            matrix.transform_point3(Vec3::ZERO),
            Vec3::new(1.0, -1.0, 0.0),
        );
    }

    #[test]
    fn scale_applies_before_the_parent_chain() {
        let parent = compose(
            Mat4::IDENTITY,
            &PathTransform::empty().with_pos(Vec3::new(5.0, 0.0, 0.0)),
        );
        let transform = PathTransform::empty().with_scale(Vec3::splat(2.0));
        let matrix = compose(parent, &transform);
        assert_point_close(
            matrix.transform_point3(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(7.0, 2.0, 2.0),
        );
    }
}
