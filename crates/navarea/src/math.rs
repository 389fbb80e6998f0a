use glam::Vec3;

/// Angle in degrees between a surface normal and world up.
///
/// A zero-length normal yields `0.0`, so degenerate hits count as flat ground.
#[inline]
pub(crate) fn slope_angle_degrees(normal: Vec3) -> f32 {
    let length_squared = normal.length_squared();
    if length_squared < 1.0e-15 {
        return 0.0;
    }
    let cos = (normal.y / length_squared.sqrt()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Bit pattern of a point that treats `0.0` and `-0.0` as the same value.
/// Returns `None` for points with a NaN coordinate, which never compare equal to anything.
#[inline]
pub(crate) fn exact_key(point: Vec3) -> Option<[u32; 3]> {
    if point.is_nan() {
        return None;
    }
    // Adding zero turns -0.0 into +0.0 and leaves every other value untouched.
    let point = point + Vec3::ZERO;
    Some([point.x.to_bits(), point.y.to_bits(), point.z.to_bits()])
}
