use crate::mesh::Material;

/// Exclusive bounds on raw depth samples, in sensor units (millimeters).
///
/// A sample `d` passes when `min < d < max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthRange {
    /// Samples at or below this value are rejected.
    pub min: u16,
    /// Samples at or above this value are rejected.
    pub max: u16,
}

impl DepthRange {
    /// Constructor
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self::new(500, 1000)
    }
}

/// Numbering of the first vertex.
///
/// In-memory and binary consumers count from zero, face based text formats
/// count from one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexBase {
    /// The first vertex is index 0.
    #[default]
    Zero,
    /// The first vertex is index 1.
    One,
}

impl IndexBase {
    /// Value of the first assigned index.
    #[must_use]
    pub const fn offset(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Parameters controlling how pixels map into world space.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconstructParams {
    /// World units per pixel, applied to both image axes.
    pub spacing: f32,
    /// World units per raw depth unit.
    pub depth_scale: f32,
    /// Depth samples outside this range produce no vertex.
    pub depth_range: DepthRange,
    /// Numbering of the first vertex.
    pub index_base: IndexBase,
    /// Identifier given to the assembled mesh.
    pub mesh_id: u64,
    /// The single material attached to the mesh.
    pub material: Material,
}

impl Default for ReconstructParams {
    fn default() -> Self {
        Self {
            spacing: 0.005,
            depth_scale: 0.0035,
            depth_range: DepthRange::default(),
            index_base: IndexBase::Zero,
            mesh_id: 0,
            material: Material::default(),
        }
    }
}
