mod frame;

use crate::ColorFrame;
use crate::DepthFrame;
use crate::DepthRange;
use crate::IndexBase;
use crate::Material;
use crate::Mesh;
use crate::ReconstructParams;
use crate::Triangle;

/// Parameters with exactly representable scales so coordinates print cleanly.
pub(crate) fn unit_params() -> ReconstructParams {
    ReconstructParams {
        spacing: 0.5,
        depth_scale: 0.25,
        depth_range: DepthRange::new(500, 1000),
        ..ReconstructParams::default()
    }
}

/// A frame pair whose color encodes the pixel position.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn frames(width: u32, height: u32, depth: &[u16]) -> (DepthFrame, ColorFrame) {
    let pixels = (0..depth.len())
        .map(|i| [i as u8, (i * 2) as u8, (i * 3) as u8, 255])
        .collect();
    (
        DepthFrame::new(width, height, depth.to_vec()).expect("depth frame"),
        ColorFrame::new(width, height, pixels).expect("color frame"),
    )
}

/// Deterministic pseudo random depth in `0..1200`, roughly half of it valid
/// for the default range.
pub(crate) fn noisy_depth(width: u32, height: u32, seed: u32) -> Vec<u16> {
    let mut state = seed.max(1);
    (0..width * height)
        .map(|_| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 1200) as u16
        })
        .collect()
}

/// A one-based mesh built by hand whose first triangle references vertex 0.
pub(crate) fn dangling_mesh() -> Mesh {
    let mut mesh = Mesh::empty(5, Material::default());
    mesh.index_base = IndexBase::One;
    mesh.positions = vec![glam::Vec3::ZERO, glam::Vec3::X];
    mesh.colors = vec![glam::Vec3::ONE; 2];
    mesh.triangles = vec![Triangle([0, 1, 1])];
    mesh
}
