// Euler-angle rotation for camera orientation.

use glam::Mat3;

/// Build a rotation from three angles in degrees.
///
/// The rotation about X is applied first, then Y, then Z (extrinsic XYZ),
/// so the resulting matrix is `Rz * Ry * Rx`.
pub fn rotation_from_euler_degrees(angles: [f32; 3]) -> Mat3 {
    let [x, y, z] = angles.map(f32::to_radians);
    Mat3::from_rotation_z(z) * Mat3::from_rotation_y(y) * Mat3::from_rotation_x(x)
}
