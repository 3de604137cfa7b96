#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::many_single_char_names)]
#![doc = include_str!("../../README.md")]

/// Crate wide error type.
pub mod error;
/// Range test applied to each depth sample.
pub mod filter;
/// Depth and color frames, and the capability that supplies them.
pub mod frame;
/// First sweep: assigns vertex indices to valid pixels.
pub mod index;
/// Load and Save meshes.
pub mod io;
/// Mesh, Material and the final assembly step.
pub mod mesh;
/// Reconstruction parameters.
pub mod params;
/// Second sweep: stitches indexed pixels into triangles.
pub mod tessellate;
#[cfg(test)]
mod test;

use log::debug;
use log::info;

pub use error::Error;
pub use error::Result;
pub use frame::ColorFrame;
pub use frame::DepthFrame;
pub use frame::FramePair;
pub use frame::FrameSource;
pub use mesh::Material;
pub use mesh::Mesh;
pub use mesh::Triangle;
pub use params::DepthRange;
pub use params::IndexBase;
pub use params::ReconstructParams;

use frame::check_dimensions;
use index::index_vertices;
use mesh::assemble;
use tessellate::tessellate;

/// Returns a colored mesh from a registered depth and color frame.
///
/// Main entry point for this library.
///
/// Pixels whose depth falls outside `params.depth_range` produce no vertex,
/// leaving holes in the surface. Frames with no valid pixels (or no pixels at
/// all) yield an empty mesh.
///
/// # Errors
///   [`Error::DimensionMismatch`] when the frames differ in width or height.
///   This is checked before any pixel is visited.
pub fn reconstruct(
    depth: &DepthFrame,
    color: &ColorFrame,
    params: &ReconstructParams,
) -> Result<Mesh> {
    check_dimensions(depth, color)?;

    let vertices = index_vertices(depth, color, params)?;
    debug!(
        "indexed {} of {} pixels",
        vertices.index_map.len(),
        depth.pixel_count()
    );

    let triangles = tessellate(&vertices.index_map, depth.width(), depth.height());
    debug!("tessellated {} triangles", triangles.len());

    let mesh = assemble(vertices, triangles, params);
    info!(
        "reconstructed {}x{} frame: {} vertices, {} triangles",
        depth.width(),
        depth.height(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Pulls one frame pair from `source` and reconstructs it.
///
/// # Errors
///   [`Error::Source`] when the source fails to deliver a capture, otherwise
///   as [`reconstruct`].
pub fn reconstruct_from<S: FrameSource>(
    source: &mut S,
    params: &ReconstructParams,
) -> Result<Mesh> {
    let FramePair { depth, color } = source
        .capture()
        .map_err(|e| Error::Source(Box::new(e)))?;
    reconstruct(&depth, &color, params)
}
