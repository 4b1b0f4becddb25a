//! # Primitive Shape Generation
//!
//! Box and plane generators. All shapes are centered at the origin with
//! outward-facing normals and counter-clockwise winding.

use super::GeometryData;

/// Generate a box centered at the origin
///
/// Spans `-width/2..width/2` on X, `-height/2..height/2` on Y and
/// `-depth/2..depth/2` on Z. Each face has its own four vertices so normals
/// stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z],
        // Back face
        [-x, -y, -z], [-x,  y, -z], [ x,  y, -z], [ x, -y, -z],
        // Left face
        [-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z],
        // Right face
        [ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z],
        // Top face
        [-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z],
        // Bottom face
        [-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    let mut data = GeometryData::new();
    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    // Two triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a flat rectangle in the XY plane with its normal along +Z
///
/// Rotate it by -90 degrees about X to lay it flat facing up.
pub fn generate_plane(width: f32, height: f32) -> GeometryData {
    let (x, y) = (width * 0.5, height * 0.5);

    let mut data = GeometryData::new();
    data.vertices = vec![[-x, -y, 0.0], [x, -y, 0.0], [x, y, 0.0], [-x, y, 0.0]];
    data.normals = vec![[0.0, 0.0, 1.0]; 4];
    data.indices = vec![0, 1, 2, 2, 3, 0];
    data
}
