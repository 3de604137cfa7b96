use glam::Vec3;

use crate::index::IndexedVertices;
use crate::params::IndexBase;
use crate::params::ReconstructParams;

/// Three vertex indices, in winding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triangle(pub [u32; 3]);

/// A diffuse tint applied to the whole mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Identifier referenced by the mesh.
    pub id: u64,
    /// Diffuse rgb, each channel in `[0, 1]`.
    pub diffuse: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            id: 1,
            diffuse: Vec3::ONE,
        }
    }
}

/// A triangle mesh with per-vertex color.
///
/// `positions` and `colors` are parallel: entry `i` describes the vertex
/// numbered `i + index_base`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Identifier written to the binary container.
    pub id: u64,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex colors, rgb in `[0, 1]`.
    pub colors: Vec<Vec3>,
    /// Triangles referencing vertices by number.
    pub triangles: Vec<Triangle>,
    /// Number of the first vertex.
    pub index_base: IndexBase,
    /// The single material of this mesh.
    pub material: Material,
}

impl Mesh {
    /// A mesh with no vertices and no triangles.
    #[must_use]
    pub fn empty(id: u64, material: Material) -> Self {
        Self {
            id,
            positions: vec![],
            colors: vec![],
            triangles: vec![],
            index_base: IndexBase::Zero,
            material,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Triangles renumbered so the first vertex is 0, whatever `index_base`.
    ///
    /// Only meaningful for a mesh that [`Mesh::is_consistent`]. An index below
    /// the base saturates to 0.
    pub fn zero_based_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let offset = self.index_base.offset();
        self.triangles
            .iter()
            .map(move |t| t.0.map(|i| i.saturating_sub(offset)))
    }

    /// Checks the structural invariants.
    ///
    /// Colors must match positions one to one and every triangle must
    /// reference an existing vertex.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.positions.len() != self.colors.len() {
            return false;
        }
        let first = u64::from(self.index_base.offset());
        let end = first + self.positions.len() as u64;
        self.triangles
            .iter()
            .flat_map(|t| t.0)
            .all(|i| (first..end).contains(&u64::from(i)))
    }
}

/// Combines the output of both sweeps into a mesh.
///
/// The mesh takes its identifier, numbering and material from `params`.
#[must_use]
pub fn assemble(
    vertices: IndexedVertices,
    triangles: Vec<Triangle>,
    params: &ReconstructParams,
) -> Mesh {
    debug_assert_eq!(vertices.positions.len(), vertices.colors.len());
    Mesh {
        id: params.mesh_id,
        positions: vertices.positions,
        colors: vertices.colors,
        triangles,
        index_base: params.index_base,
        material: params.material,
    }
}
