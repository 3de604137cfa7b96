#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::frame::linear_index;
use crate::index::VertexIndexMap;
use crate::mesh::Triangle;

/// Stitches indexed pixels into triangles.
///
/// Walks every 2x2 cell anchored at `(x, y)` with `x < width - 1` and
/// `y < height - 1`. Each cell is split along the top-left to bottom-right
/// diagonal:
///
/// ```text
///  tl ---- tr
///  |  \  B |
///  | A  \  |
///  bl ---- br
/// ```
///
/// * A is `[tl, br, bl]`, emitted when those three pixels are indexed.
/// * B is `[tl, br, tr]`, emitted when those three pixels are indexed.
///
/// A cell missing `tl` or `br` emits nothing. The other diagonal is never
/// tried.
#[must_use]
#[allow(clippy::let_and_return)]
pub fn tessellate(index_map: &VertexIndexMap, width: u32, height: u32) -> Vec<Triangle> {
    if width < 2 || height < 2 || index_map.is_empty() {
        return vec![];
    }

    #[cfg(not(feature = "parallel"))]
    let triangles = (0..height - 1)
        .flat_map(|y| tessellate_row(index_map, width, y))
        .collect();

    // Ordered collect keeps the row-major triangle order of the serial path.
    #[cfg(feature = "parallel")]
    let triangles = (0..height - 1)
        .into_par_iter()
        .flat_map_iter(|y| tessellate_row(index_map, width, y))
        .collect();

    triangles
}

fn tessellate_row(index_map: &VertexIndexMap, width: u32, y: u32) -> Vec<Triangle> {
    let mut triangles = vec![];
    for x in 0..width - 1 {
        let corner = |dx: u32, dy: u32| index_map.get(linear_index(x + dx, y + dy, width));

        let (Some(tl), Some(br)) = (corner(0, 0), corner(1, 1)) else {
            continue;
        };

        if let Some(bl) = corner(0, 1) {
            triangles.push(Triangle([tl, br, bl]));
        }
        if let Some(tr) = corner(1, 0) {
            triangles.push(Triangle([tl, br, tr]));
        }
    }
    triangles
}
