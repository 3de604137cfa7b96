use fxhash::FxHashMap;
use glam::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Error;
use crate::error::Result;
use crate::filter::is_valid;
use crate::frame::ColorFrame;
use crate::frame::DepthFrame;
use crate::frame::check_dimensions;
use crate::frame::linear_index;
use crate::params::IndexBase;
use crate::params::ReconstructParams;

/// Sparse map from linear pixel index (`y * width + x`) to vertex index.
///
/// Only valid pixels have an entry. Entries are written once, in row-major
/// order, and never changed.
#[derive(Clone, Debug, Default)]
pub struct VertexIndexMap {
    entries: FxHashMap<usize, u32>,
}

impl VertexIndexMap {
    /// Vertex index of the pixel at `linear`, `None` if it was rejected.
    #[must_use]
    #[inline]
    pub fn get(&self, linear: usize) -> Option<u32> {
        self.entries.get(&linear).copied()
    }

    /// Number of indexed pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no pixel passed the depth filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(linear pixel index, vertex index)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.entries.iter().map(|(&linear, &index)| (linear, index))
    }
}

impl FromIterator<(usize, u32)> for VertexIndexMap {
    fn from_iter<I: IntoIterator<Item = (usize, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Output of the first sweep.
///
/// `positions[i]` and `colors[i]` belong to the vertex numbered
/// `i + index_base`.
#[derive(Clone, Debug, Default)]
pub struct IndexedVertices {
    /// Pixel to vertex lookup used by the tessellator.
    pub index_map: VertexIndexMap,
    /// World space vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex colors, rgb in `[0, 1]`.
    pub colors: Vec<Vec3>,
}

/// Valid pixels of a single image row.
#[derive(Default)]
struct RowVertices {
    pixels: Vec<usize>,
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

/// Assigns a vertex to every pixel that passes the depth filter.
///
/// Vertex numbers start at `params.index_base` and follow row-major scan
/// order.
///
/// # Errors
///   [`Error::DimensionMismatch`] when the frames differ in size.
///   [`Error::TooManyVertices`] when the count overflows a `u32` index.
pub fn index_vertices(
    depth: &DepthFrame,
    color: &ColorFrame,
    params: &ReconstructParams,
) -> Result<IndexedVertices> {
    check_dimensions(depth, color)?;

    #[cfg(not(feature = "parallel"))]
    let rows = (0..depth.height()).map(|y| sweep_row(depth, color, params, y));

    // Each row numbers its own vertices; merge() renumbers them globally.
    #[cfg(feature = "parallel")]
    let rows: Vec<RowVertices> = (0..depth.height())
        .into_par_iter()
        .map(|y| sweep_row(depth, color, params, y))
        .collect();

    merge(rows, params.index_base)
}

fn sweep_row(
    depth: &DepthFrame,
    color: &ColorFrame,
    params: &ReconstructParams,
    y: u32,
) -> RowVertices {
    let width = depth.width();
    let samples = depth.samples();
    let pixels = color.pixels();

    let mut row = RowVertices::default();
    for x in 0..width {
        let linear = linear_index(x, y, width);
        let d = samples[linear];
        if !is_valid(d, params.depth_range) {
            continue;
        }
        row.pixels.push(linear);
        row.positions.push(vertex_position(x, y, d, params));
        row.colors.push(vertex_color(pixels[linear]));
    }
    row
}

fn merge(
    rows: impl IntoIterator<Item = RowVertices>,
    base: IndexBase,
) -> Result<IndexedVertices> {
    let mut out = IndexedVertices::default();
    for row in rows {
        for linear in row.pixels {
            let count = out.index_map.len();
            let index = u32::try_from(count)
                .ok()
                .and_then(|n| n.checked_add(base.offset()))
                .ok_or(Error::TooManyVertices(count + 1))?;
            out.index_map.entries.insert(linear, index);
        }
        out.positions.extend(row.positions);
        out.colors.extend(row.colors);
    }
    Ok(out)
}

/// Maps pixel `(x, y)` with raw `depth` into world space.
///
/// Image rows grow downwards, so the vertical axis is negated. The top row
/// sits at `+0.0`, never `-0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vertex_position(x: u32, y: u32, depth: u16, params: &ReconstructParams) -> Vec3 {
    Vec3::new(
        x as f32 * params.spacing,
        0.0 - y as f32 * params.spacing,
        f32::from(depth) * params.depth_scale,
    )
}

/// Normalises the rgb channels of an RGBA8 pixel, alpha is dropped.
#[must_use]
pub fn vertex_color([r, g, b, _alpha]: [u8; 4]) -> Vec3 {
    Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0
}
